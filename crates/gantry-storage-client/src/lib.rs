//! # gantry-storage-client — Typed Rust client for the Gantry storage service
//!
//! Provides ergonomic, typed access to the storage service's resource
//! families:
//! - **Namespaces** — listings, members, maintainership listings
//! - **Packages** — documents, versions, maintainers, content-addressed objects
//! - **Users** — membership listings, token resolution, token management
//! - **Sessions** — CLI login sessions
//!
//! ## Architecture
//!
//! This crate is the only path from the gateway to storage data. One
//! `reqwest::Client` is built at construction and shared by every
//! sub-client; callers construct a [`StorageClient`] once at startup and
//! thread a fresh [`RequestId`] through each call.
//!
//! ## Request contract
//!
//! Every request carries a `request-id` header and a `user-agent` of the
//! form `hostname(agent)`. Non-success responses are read and classified
//! into [`RemoteFailure`] — status, machine code, message, headers, and the
//! raw body — before being handed back as [`StorageError::Remote`]. There
//! are no retries; the gateway decides what a refusal means.

pub mod config;
pub mod error;
pub mod namespaces;
pub mod packages;
pub mod sessions;
pub(crate) mod transport;
pub mod types;
pub mod users;

pub use config::{ConfigError, StorageConfig};
pub use error::{RemoteFailure, StorageError};
pub use types::{
    AuthenticatedUser, CliSession, Page, RemovedTokens, RequestId, SessionValue, TokenDescription,
    TokenGrant,
};

use std::time::Duration;

use reqwest::Method;

use crate::transport::{Payload, Transport};

/// Top-level storage client. Holds sub-clients for each resource family.
#[derive(Debug, Clone)]
pub struct StorageClient {
    namespaces: namespaces::NamespaceClient,
    packages: packages::PackageClient,
    users: users::UserClient,
    sessions: sessions::SessionClient,
    transport: Transport,
}

impl StorageClient {
    /// Create a storage client from configuration.
    ///
    /// The underlying HTTP client is built exactly once here and shared by
    /// every sub-client.
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StorageError::Transport {
                endpoint: "client_init".into(),
                source: e,
            })?;
        let transport = Transport::new(http, config.base_url.clone(), config.user_agent());

        Ok(Self {
            namespaces: namespaces::NamespaceClient::new(transport.clone()),
            packages: packages::PackageClient::new(transport.clone()),
            users: users::UserClient::new(transport.clone()),
            sessions: sessions::SessionClient::new(transport.clone()),
            transport,
        })
    }

    /// Namespace listings, members, and maintainership listings.
    pub fn namespaces(&self) -> &namespaces::NamespaceClient {
        &self.namespaces
    }

    /// Package documents, versions, maintainers, and objects.
    pub fn packages(&self) -> &packages::PackageClient {
        &self.packages
    }

    /// Users, memberships, and tokens.
    pub fn users(&self) -> &users::UserClient {
        &self.users
    }

    /// CLI login sessions.
    pub fn sessions(&self) -> &sessions::SessionClient {
        &self.sessions
    }

    /// Liveness probe against the storage service.
    pub async fn ping(&self, request_id: &RequestId) -> Result<(), StorageError> {
        self.transport
            .send(request_id, Method::GET, "/health", &[], Payload::None)
            .await
            .map(drop)
    }
}
