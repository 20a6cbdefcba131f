//! Line ending translation for `TYPE A` transfers.
//!
//! Outbound data has every LF expanded to CRLF. Inbound data has CRLF pairs
//! collapsed to LF; since a pair may be split across two reads, the decoder
//! carries a trailing CR over to the next chunk.

/// Appends `input` to `out` with each `\n` written as `\r\n`.
pub fn encode(input: &[u8], out: &mut Vec<u8>) {
    out.reserve(input.len());
    for &byte in input {
        if byte == b'\n' {
            out.push(b'\r');
        }
        out.push(byte);
    }
}

#[derive(Debug, Default)]
pub struct AsciiDecoder {
    pending_cr: bool,
}

impl AsciiDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `input` to `out`, collapsing CRLF to LF.
    pub fn decode(&mut self, input: &[u8], out: &mut Vec<u8>) {
        out.reserve(input.len() + 1);
        for &byte in input {
            if self.pending_cr {
                self.pending_cr = false;
                if byte == b'\n' {
                    out.push(b'\n');
                    continue;
                }
                out.push(b'\r');
            }
            if byte == b'\r' {
                self.pending_cr = true;
            } else {
                out.push(byte);
            }
        }
    }

    /// Flushes a CR that was still waiting for its LF when the stream ended.
    pub fn finish(&mut self, out: &mut Vec<u8>) {
        if std::mem::take(&mut self.pending_cr) {
            out.push(b'\r');
        }
    }
}
