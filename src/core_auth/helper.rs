use crate::core_auth::error::AuthError;
use argon2::Argon2;
use log::warn;
use password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use std::fs;
use std::path::Path;

/// Hashes a password into an Argon2id PHC string for the credentials file.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Checks `password` against an Argon2 PHC string or a bcrypt hash.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    if hashed_password.starts_with("$argon2") {
        match PasswordHash::new(hashed_password) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                warn!("Unparsable argon2 hash in credentials file: {}", e);
                false
            }
        }
    } else if hashed_password.starts_with("$2") {
        bcrypt::verify(password, hashed_password).unwrap_or(false)
    } else {
        warn!("Unsupported password hash format in credentials file");
        false
    }
}

pub fn read_passwd_file(path: &Path) -> Result<String, AuthError> {
    fs::read_to_string(path).map_err(|source| AuthError::CredentialsRead {
        path: path.to_path_buf(),
        source,
    })
}
