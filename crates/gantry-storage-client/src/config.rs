//! Storage client configuration.
//!
//! Configures the base URL and identity headers for the storage service.
//! Defaults point at a storage service on localhost. Override via
//! environment variables or explicit construction for testing.

use url::Url;

/// Configuration for connecting to the storage service.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base URL of the storage service.
    /// Default: `http://localhost:3002`
    pub base_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Agent name reported in the `user-agent` header.
    pub agent: String,
    /// Host name reported in the `user-agent` header.
    pub hostname: String,
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `GANTRY_STORAGE_URL` (default: `http://localhost:3002`)
    /// - `GANTRY_STORAGE_TIMEOUT_SECS` (default: 30)
    /// - `GANTRY_AGENT` (default: `gantry`)
    ///
    /// The hostname comes from `HOSTNAME`, then `HOST`, then `"unknown"`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_url("GANTRY_STORAGE_URL", "http://localhost:3002")?,
            timeout_secs: std::env::var("GANTRY_STORAGE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            agent: std::env::var("GANTRY_AGENT").unwrap_or_else(|_| "gantry".to_string()),
            hostname: hostname(),
        })
    }

    /// Create a configuration pointing at a storage service on localhost
    /// (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be
    /// parsed (should not occur for valid port numbers, but avoids
    /// `expect()`).
    pub fn local(port: u16) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Url::parse(&format!("http://127.0.0.1:{port}"))
                .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?,
            timeout_secs: 5,
            agent: "gantry".to_string(),
            hostname: "localhost".to_string(),
        })
    }

    /// The `user-agent` value sent with every request: `hostname(agent)`.
    pub fn user_agent(&self) -> String {
        format!("{}({})", self.hostname, self.agent)
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("HOST"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A URL variable failed to parse.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
