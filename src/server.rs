use crate::config::Config;
use crate::core_auth::{Authenticator, CredentialStore};
use crate::core_network::network;
use crate::core_storage::Storage;
use anyhow::{Context, Result};
use log::{info, warn};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;
use tokio::net::TcpListener;

/// State shared by every session of a running server.
pub struct ServerContext {
    pub config: Config,
    pub storage: Storage,
    pub authenticator: Arc<dyn Authenticator>,
    pub pasv_bind_ip: Ipv4Addr,
    pub pasv_ip: Option<Ipv4Addr>, // None: announce the control connection's local address
}

impl ServerContext {
    pub fn new(config: Config, authenticator: Arc<dyn Authenticator>) -> Result<Self> {
        config.validate().context("Invalid server configuration")?;
        let pasv_bind_ip = config.server.pasv_bind_ip()?;
        let pasv_ip = config.server.pasv_advertised_ip()?;
        let storage = Storage::new(config.server.storage_dir.clone());

        Ok(Self {
            config,
            storage,
            authenticator,
            pasv_bind_ip,
            pasv_ip,
        })
    }
}

/// Runs the FTP server with the provided configuration.
///
/// Loads the credential store, binds the control port and serves
/// connections until the process is stopped.
///
/// # Arguments
///
/// * `config` - The server configuration.
///
/// # Returns
///
/// Result<(), anyhow::Error> indicating a startup failure.
pub async fn run(config: Config) -> Result<()> {
    log_config(&config);

    let credentials = CredentialStore::load(&config.server.credentials_file)
        .context("Failed to load credentials")?;
    let context = Arc::new(ServerContext::new(config, Arc::new(credentials))?);

    if !context.storage.root().is_dir() {
        warn!(
            "Storage directory {:?} does not exist yet, it will be created on first upload",
            context.storage.root()
        );
    }

    let listener = bind_control_listener(&context).await?;
    network::start_server(listener, context).await
}

pub async fn bind_control_listener(context: &ServerContext) -> Result<TcpListener> {
    let server = &context.config.server;
    let addr = SocketAddrV4::new(server.listen_ip()?, server.listen_port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind control port {}", addr))?;
    info!("Server listening on {}", listener.local_addr()?);
    Ok(listener)
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    let server = &config.server;
    info!("  Listen Address: {}:{}", server.listen_address, server.listen_port);
    info!("  PASV Bind Address: {}", server.pasv_bind_address);
    info!(
        "  PASV Address: {}",
        server.pasv_address.as_deref().unwrap_or("(control connection address)")
    );
    info!("  Storage Directory: {:?}", server.storage_dir);
    info!("  Root Path: {}", server.root_path);
    info!("  Credentials File: {:?}", server.credentials_file);
    info!("  Max Sessions: {}", server.max_sessions);
    info!("  Idle Timeout: {}s", server.idle_timeout_secs);
    info!("  Data Timeout: {}s", server.data_timeout_secs);
    info!("  Upload Buffer Size: {} KB", server.upload_buffer_size / 1024);
    info!("  Download Buffer Size: {} KB", server.download_buffer_size / 1024);
}
