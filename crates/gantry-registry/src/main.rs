//! # gantry-registry — Binary Entry Point
//!
//! Starts the public gateway. Binds to a configurable port (default 3000)
//! and talks to the storage service named by `GANTRY_STORAGE_URL`.

use gantry_registry::state::{AppConfig, AppState};
use gantry_storage_client::{StorageClient, StorageConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment.
    let config = AppConfig::from_env();
    let storage_config = StorageConfig::from_env().map_err(|e| {
        tracing::error!("Storage configuration invalid: {e}");
        e
    })?;
    tracing::info!("Storage service at {}", storage_config.base_url);

    let storage = StorageClient::new(storage_config)?;

    let port = config.port;
    let app = gantry_registry::app(AppState::new(storage, config));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Gantry registry listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
