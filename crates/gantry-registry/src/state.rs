//! # Application State
//!
//! Configuration and shared state threaded through every handler. The
//! storage client is constructed once at startup and cloned per request;
//! it shares one connection pool underneath.

use gantry_core::{PageWindow, DEFAULT_PAGE_SIZE};
use gantry_storage_client::StorageClient;

/// Gateway configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port the gateway listens on.
    pub port: u16,
    /// Objects per page for gateway listings.
    pub page_size: usize,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// `GANTRY_PORT` defaults to 3000 and `GANTRY_PAGE_SIZE` to
    /// [`DEFAULT_PAGE_SIZE`]; malformed values fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("GANTRY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            page_size: std::env::var("GANTRY_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Shared state for the Axum application.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Typed client for the backing storage service.
    pub storage: StorageClient,
    /// Gateway configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Assemble application state from its parts.
    pub fn new(storage: StorageClient, config: AppConfig) -> Self {
        Self { storage, config }
    }

    /// The pagination window for a requested page number, using the
    /// configured page size.
    pub fn window(&self, page: u32) -> PageWindow {
        PageWindow::new(page, self.config.page_size)
    }
}
