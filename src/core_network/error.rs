use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataChannelError {
    #[error("No data connection established")]
    NotEstablished,

    #[error("Invalid PORT argument: {0}")]
    InvalidPortArgument(String),

    #[error("Failed to connect data channel: {0}")]
    Connect(io::Error),

    #[error("Failed to set up passive listener: {0}")]
    Listen(io::Error),

    #[error("Failed to accept data connection: {0}")]
    Accept(io::Error),

    #[error("Timed out waiting for the data connection")]
    Timeout,
}

impl DataChannelError {
    pub fn to_ftp_response(&self) -> String {
        match self {
            DataChannelError::NotEstablished => "425 Use PORT or PASV first.".to_string(),
            DataChannelError::InvalidPortArgument(_) => "501 Invalid PORT parameters.".to_string(),
            _ => "425 Can't open data connection.".to_string(),
        }
    }
}
