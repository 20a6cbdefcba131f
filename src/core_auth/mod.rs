pub mod core_auth;
pub mod error;
pub mod helper;

pub use core_auth::{Authenticator, CredentialStore, PasswdEntry};
pub use error::AuthError;
