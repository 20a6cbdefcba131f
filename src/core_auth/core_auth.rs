use crate::constants::USERNAME_REGEX;
use crate::core_auth::error::AuthError;
use crate::core_auth::helper::{read_passwd_file, verify_password};
use log::{info, warn};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

/// Decides whether a username/password pair may log in.
pub trait Authenticator: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// One `username:hash` record of the credentials file.
#[derive(Debug, Clone)]
pub struct PasswdEntry {
    username: String,
    hashed_password: String,
}

impl PasswdEntry {
    pub fn from_line(line: &str) -> Option<Self> {
        let (username, hashed_password) = line.split_once(':')?;
        if username.is_empty() || hashed_password.is_empty() {
            return None;
        }
        Some(PasswdEntry {
            username: username.to_string(),
            hashed_password: hashed_password.trim_end().to_string(),
        })
    }

    pub fn get_hashed_password(&self) -> &str {
        &self.hashed_password
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }
}

/// Credentials loaded from the colon-delimited file at startup.
#[derive(Debug, Default, Clone)]
pub struct CredentialStore {
    entries: HashMap<String, PasswdEntry>,
}

impl CredentialStore {
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        if !path.exists() {
            warn!(
                "Credentials file {:?} not found, every login will be refused",
                path
            );
            return Ok(Self::default());
        }
        let store = Self::parse(&read_passwd_file(path)?)?;
        info!("Loaded {} user(s) from {:?}", store.len(), path);
        Ok(store)
    }

    /// Parses credential records, skipping comments and malformed lines.
    pub fn parse(content: &str) -> Result<Self, AuthError> {
        let username_re = Regex::new(USERNAME_REGEX)?;
        let mut entries = HashMap::new();

        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(entry) = PasswdEntry::from_line(line) else {
                warn!("Skipping malformed credentials line {}", lineno + 1);
                continue;
            };
            if !username_re.is_match(entry.get_username()) {
                warn!(
                    "Skipping credentials line {}: invalid username {:?}",
                    lineno + 1,
                    entry.get_username()
                );
                continue;
            }
            entries.insert(entry.get_username().to_string(), entry);
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Authenticator for CredentialStore {
    fn verify(&self, username: &str, password: &str) -> bool {
        match self.entries.get(username) {
            Some(entry) => verify_password(password, entry.get_hashed_password()),
            None => false,
        }
    }
}
