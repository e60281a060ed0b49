//! Wire types for the storage protocol.
//!
//! These shapes are shared by both sides of the wire: this client
//! deserializes them, and the in-memory storage stub serializes them. The
//! relationship snapshot itself lives in `gantry-core`.

use std::fmt;

use chrono::{DateTime, Utc};
use gantry_core::UserName;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation identifier attached to every storage request.
///
/// The gateway mints one per inbound request (or adopts the caller's) and
/// threads it through every storage call made on that request's behalf, so
/// one user action can be followed across both services' logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Mint a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Adopt an identifier received from elsewhere.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One window of a listed result set.
///
/// `objects` may include one probe item past the page size; the consumer
/// trims it with a `PageWindow`. `total` counts every matching item, not
/// just this window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The fetched window.
    pub objects: Vec<T>,
    /// Whether items exist past this window.
    pub next: bool,
    /// Whether the window started past the first item.
    pub prev: bool,
    /// Total number of matching items.
    pub total: u64,
}

/// The user a bearer token resolves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// The user's login name.
    pub name: UserName,
    /// The user's contact address, when one is on file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A freshly minted token, value included.
///
/// The cleartext `value` is shown exactly once, at creation. Every later
/// reference to the token is by `value_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    /// The cleartext token value.
    pub value: String,
    /// Hash of the value, used to name the token afterwards.
    pub value_hash: String,
    /// The description the token was created with.
    pub description: String,
}

/// A stored token as it appears in listings — no cleartext value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDescription {
    /// Hash of the token value.
    pub value_hash: String,
    /// The description the token was created with.
    pub description: String,
    /// When the token was created.
    pub created: DateTime<Utc>,
}

/// Result of a bulk token deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovedTokens {
    /// How many tokens the hashes actually matched.
    pub removed: u64,
}

/// A freshly created CLI login session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliSession {
    /// Opaque session identifier the CLI polls with.
    pub session: String,
}

/// The state of a CLI login session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionValue {
    /// The resolved token value, once the browser side has supplied one.
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_unique() {
        assert_ne!(RequestId::generate(), RequestId::generate());
    }

    #[test]
    fn request_id_adopts_external_values() {
        let id = RequestId::new("abc-123");
        assert_eq!(id.as_str(), "abc-123");
        assert_eq!(id.to_string(), "abc-123");
    }

    #[test]
    fn page_deserializes_storage_envelope() {
        let page: Page<String> = serde_json::from_value(serde_json::json!({
            "objects": ["a@legacy", "b@legacy"],
            "next": false,
            "prev": true,
            "total": 202,
        }))
        .unwrap();
        assert_eq!(page.objects.len(), 2);
        assert!(page.prev);
        assert_eq!(page.total, 202);
    }

    #[test]
    fn authenticated_user_tolerates_missing_email() {
        let user: AuthenticatedUser =
            serde_json::from_value(serde_json::json!({ "name": "alice" })).unwrap();
        assert_eq!(user.name.as_str(), "alice");
        assert!(user.email.is_none());
    }
}
