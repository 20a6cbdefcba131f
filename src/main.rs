use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use flatftpd::constants::DEFAULT_CONFIG_PATH;
use flatftpd::core_auth::helper::hash_password;
use flatftpd::core_cli::Cli;
use flatftpd::Config;
use log::{info, warn};
use std::io::Write;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    if let Some(password) = args.hash_password.as_deref() {
        println!("{}", hash_password(password)?);
        return Ok(());
    }

    // Initialize the logger with a custom format
    let default_level = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    let mut config = load_config(&args)?;

    // Command line overrides
    if let Some(port) = args.port {
        config.server.listen_port = port;
    }
    if let Some(storage_dir) = args.storage_dir {
        config.server.storage_dir = storage_dir;
    }

    flatftpd::run(config).await
}

/// An explicit `--config` must load; the default path may be absent.
fn load_config(args: &Cli) -> Result<Config> {
    match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Unable to use configuration {}", path.display())),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                info!("Loading configuration from {}", default_path.display());
                Config::load_from_file(default_path)
            } else {
                warn!(
                    "No configuration file at {}, using built-in defaults",
                    default_path.display()
                );
                Ok(Config::default())
            }
        }
    }
}
