use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to read credentials file {path:?}: {source}")]
    CredentialsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid username pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Failed to hash password: {0}")]
    Hash(String),
}
