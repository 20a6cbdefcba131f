use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "flatftpd", about = "A minimal FTP server serving one flat directory.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Control port, overrides the configuration file
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Storage directory, overrides the configuration file
    #[arg(short, long)]
    pub storage_dir: Option<PathBuf>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,

    /// Print an Argon2id hash of the given password for the credentials file and exit
    #[arg(long, value_name = "PASSWORD")]
    pub hash_password: Option<String>,
}
