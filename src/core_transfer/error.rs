use std::io;
use thiserror::Error;

/// Failure after the 150 reply was sent; the transfer is abandoned.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Failed to read transfer source: {0}")]
    Read(io::Error),

    #[error("Failed to write transfer destination: {0}")]
    Write(io::Error),

    #[error("Data connection stalled")]
    Timeout,
}

impl TransferError {
    pub fn to_ftp_response(&self) -> String {
        "426 Connection closed; transfer aborted.".to_string()
    }
}
