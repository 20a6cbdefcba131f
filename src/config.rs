use crate::constants::{CONTROL_PORT, DEFAULT_BUFFER_SIZE};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub listen_port: u16,
    pub pasv_bind_address: String,
    /// Address announced in the 227 reply. When unset, the local address of the
    /// control connection is announced instead.
    pub pasv_address: Option<String>,
    pub storage_dir: PathBuf,
    /// Path reported by PWD and the only path CWD/MKD accept.
    pub root_path: String,
    pub credentials_file: PathBuf,
    pub banner: String,
    pub max_sessions: usize,
    pub idle_timeout_secs: u64,
    pub data_timeout_secs: u64,
    pub upload_buffer_size: usize,
    pub download_buffer_size: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from("0.0.0.0"),
            listen_port: CONTROL_PORT,
            pasv_bind_address: String::from("0.0.0.0"),
            pasv_address: None,
            storage_dir: PathBuf::from("storage"),
            root_path: String::from("/storage"),
            credentials_file: PathBuf::from("credentials.txt"),
            banner: String::from("Welcome to FTP Server"),
            max_sessions: 64,
            idle_timeout_secs: 300,
            data_timeout_secs: 30,
            upload_buffer_size: DEFAULT_BUFFER_SIZE,
            download_buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn data_timeout(&self) -> Duration {
        Duration::from_secs(self.data_timeout_secs)
    }

    pub fn listen_ip(&self) -> Result<Ipv4Addr> {
        parse_ipv4("listen_address", &self.listen_address)
    }

    pub fn pasv_bind_ip(&self) -> Result<Ipv4Addr> {
        parse_ipv4("pasv_bind_address", &self.pasv_bind_address)
    }

    pub fn pasv_advertised_ip(&self) -> Result<Option<Ipv4Addr>> {
        self.pasv_address
            .as_deref()
            .map(|addr| parse_ipv4("pasv_address", addr))
            .transpose()
    }
}

fn parse_ipv4(key: &str, value: &str) -> Result<Ipv4Addr> {
    value
        .parse::<Ipv4Addr>()
        .with_context(|| format!("{} is not a valid IPv4 address: {}", key, value))
}

impl Config {
    /// Reads and parses a TOML configuration file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let server = &self.server;
        server.listen_ip()?;
        server.pasv_bind_ip()?;
        server.pasv_advertised_ip()?;

        if server.max_sessions == 0 {
            bail!("max_sessions must be greater than zero");
        }
        if server.idle_timeout_secs == 0 || server.data_timeout_secs == 0 {
            bail!("idle_timeout_secs and data_timeout_secs must be greater than zero");
        }
        if server.upload_buffer_size == 0 || server.download_buffer_size == 0 {
            bail!("transfer buffer sizes must be greater than zero");
        }
        if server.root_path.is_empty() {
            bail!("root_path must not be empty");
        }
        Ok(())
    }
}
