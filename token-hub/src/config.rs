//! Runtime configuration resolved from command-line flags and environment.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_CSV_PATH: &str = "uploaded.csv";
const DEFAULT_STATIC_DIR: &str = "./frontend";

#[derive(Parser, Debug, Default)]
#[command(name = "token-hub")]
#[command(about = "CSV-backed access token service")]
pub struct Cli {
    /// Listen port (falls back to $PORT, then 8080)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Listen address
    #[arg(long)]
    pub host: Option<String>,

    /// Backing CSV file
    #[arg(long, env = "TOKEN_HUB_CSV")]
    pub csv_path: Option<PathBuf>,

    /// Directory of frontend assets served for non-API paths
    #[arg(long, env = "TOKEN_HUB_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub csv_path: PathBuf,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    /// Merge CLI flags over the process environment.
    pub fn load(cli: Cli) -> Result<Self> {
        Self::resolve(cli, std::env::var("PORT").ok())
    }

    fn resolve(cli: Cli, port_env: Option<String>) -> Result<Self> {
        let port = match (cli.port, port_env.filter(|p| !p.is_empty())) {
            (Some(port), _) => port,
            (None, Some(raw)) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid PORT value {raw:?}"))?,
            (None, None) => DEFAULT_PORT,
        };
        let host = cli.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .with_context(|| format!("invalid listen address {host}:{port}"))?;

        let static_dir = cli
            .static_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));
        let static_dir = static_dir.is_dir().then_some(static_dir);

        Ok(Self {
            addr,
            csv_path: cli
                .csv_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_PATH)),
            static_dir,
        })
    }
}
