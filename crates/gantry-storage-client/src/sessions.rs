//! CLI login sessions.
//!
//! The CLI starts a session, hands the user a browser URL, and polls until
//! the browser side resolves the session with a token value. Fetching a
//! resolved session consumes it — a second fetch is a 404.

use reqwest::Method;
use serde_json::json;

use crate::error::StorageError;
use crate::transport::{Payload, Transport};
use crate::types::{CliSession, RequestId, SessionValue};

/// Client for CLI login sessions.
#[derive(Debug, Clone)]
pub struct SessionClient {
    transport: Transport,
}

impl SessionClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Start a login session.
    pub async fn create(
        &self,
        request_id: &RequestId,
        description: &str,
    ) -> Result<CliSession, StorageError> {
        self.transport
            .json(
                request_id,
                Method::POST,
                "/v1/cli-sessions",
                &[],
                Payload::Json(json!({ "description": description })),
            )
            .await
    }

    /// Poll a session for its resolved value.
    ///
    /// Returns `value: None` while the session is still waiting. A fetch
    /// that returns a value consumes the session.
    pub async fn fetch(
        &self,
        request_id: &RequestId,
        session: &str,
    ) -> Result<SessionValue, StorageError> {
        self.transport
            .json(
                request_id,
                Method::GET,
                &format!("/v1/cli-sessions/session/{session}"),
                &[],
                Payload::None,
            )
            .await
    }

    /// Resolve a session with a token value (the browser side of login).
    pub async fn resolve(
        &self,
        request_id: &RequestId,
        session: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        self.transport
            .send(
                request_id,
                Method::POST,
                &format!("/v1/cli-sessions/session/{session}"),
                &[],
                Payload::Json(json!({ "value": value })),
            )
            .await
            .map(drop)
    }
}
