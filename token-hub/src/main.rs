use anyhow::Result;
use clap::Parser;
use token_hub::api::{self, AppState};
use token_hub::config::{Cli, Config};
use token_hub_core::{CsvStore, RowStore};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load(Cli::parse())?;

    let store = CsvStore::new(&config.csv_path);
    if !store.exists() {
        warn!(
            path = %store.path().display(),
            "token file does not exist yet; upload one before using the API"
        );
    }
    match &config.static_dir {
        Some(dir) => info!(dir = %dir.display(), "serving frontend assets"),
        None => info!("no frontend directory found, static serving disabled"),
    }

    let app = api::router(AppState::new(store), config.static_dir.clone());

    let listener = TcpListener::bind(config.addr).await?;
    info!("Listening on {}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}
