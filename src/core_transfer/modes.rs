/// Representation type selected with TYPE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransferType {
    /// `TYPE A`: line endings are translated on the wire.
    Ascii,
    /// `TYPE I`: bytes pass through unchanged.
    #[default]
    Binary,
}

impl TransferType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "A" => Some(TransferType::Ascii),
            "I" => Some(TransferType::Binary),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            TransferType::Ascii => "A",
            TransferType::Binary => "I",
        }
    }
}
