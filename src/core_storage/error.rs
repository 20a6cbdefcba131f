// Storage errors and their FTP replies
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("File not found or access denied: {name}: {source}")]
    Unavailable { name: String, source: io::Error },

    #[error("Not a regular file: {0}")]
    NotAFile(String),

    #[error("Storage root could not be created: {0}")]
    RootUnavailable(io::Error),

    #[error("Could not create file {name}: {source}")]
    CreateFailed { name: String, source: io::Error },

    #[error("Storage root is not readable: {0}")]
    ListUnavailable(io::Error),
}

impl StorageError {
    pub fn to_ftp_response(&self) -> String {
        match self {
            StorageError::InvalidName(_) => "550 Invalid file name.".to_string(),
            StorageError::Unavailable { .. } => {
                "550 File not found or access denied.".to_string()
            }
            StorageError::NotAFile(_) => "550 Not a regular file.".to_string(),
            StorageError::RootUnavailable(_) => "550 Could not create directory.".to_string(),
            StorageError::CreateFailed { .. } => "550 Could not create file.".to_string(),
            StorageError::ListUnavailable(_) => {
                "450 Requested file action not taken. Directory unavailable.".to_string()
            }
        }
    }
}
