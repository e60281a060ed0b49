//! Standalone storage stub server.
//!
//! In-memory stand-in for the storage service the registry gateway
//! consumes. Data is lost on restart.

use std::net::SocketAddr;

use gantry_storage_stub::{router, StubConfig, StubState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = StubConfig::from_env();
    let state = StubState::new(&config);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("gantry-storage-stub listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
