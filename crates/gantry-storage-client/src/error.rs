//! Storage client errors.
//!
//! Every call resolves to one of three failure shapes: the request never
//! produced a response (`Transport`), the storage service answered with a
//! non-success status (`Remote`), or the response body could not be decoded
//! (`Decode`). Only `Remote` carries meaning from the storage service
//! itself; the other two are plumbing failures the gateway reports as a bad
//! upstream.

use reqwest::header::HeaderMap;
use thiserror::Error;

/// Errors from storage service calls.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The request never produced an HTTP response.
    #[error("storage request failed: {endpoint}")]
    Transport {
        /// `"VERB /path"` of the failing call.
        endpoint: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The storage service answered with a non-success status.
    #[error(transparent)]
    Remote(#[from] RemoteFailure),

    /// The response arrived but its body was not what the caller expected.
    #[error("storage response could not be decoded: {endpoint}")]
    Decode {
        /// `"VERB /path"` of the failing call.
        endpoint: String,
        /// The underlying decode error.
        #[source]
        source: reqwest::Error,
    },
}

impl StorageError {
    /// The remote failure, if the storage service itself refused the call.
    pub fn remote(&self) -> Option<&RemoteFailure> {
        match self {
            Self::Remote(failure) => Some(failure),
            _ => None,
        }
    }
}

/// A non-success response from the storage service, with its error envelope
/// picked apart.
///
/// The storage service reports errors as flat `{"message", "code"}` JSON.
/// Bodies that are not JSON, or JSON without those fields, still classify:
/// the message falls back to the raw body and the code to `"unknown"`.
#[derive(Error, Debug, Clone)]
#[error("storage responded {status} ({code}): {message}")]
pub struct RemoteFailure {
    /// HTTP status of the response.
    pub status: u16,
    /// Machine-readable error code; `"unknown"` when the body carried none.
    pub code: String,
    /// Human-readable message; the raw body when the envelope had none.
    pub message: String,
    /// Response headers, kept for signals like `www-authenticate`.
    pub headers: HeaderMap,
    /// The raw response body.
    pub body: String,
}

impl RemoteFailure {
    pub(crate) fn classify(status: u16, headers: HeaderMap, body: String) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorEnvelope {
            message: Option<String>,
            code: Option<String>,
        }

        let (message, code) = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => (
                envelope.message.unwrap_or_else(|| body.clone()),
                envelope.code.unwrap_or_else(|| "unknown".to_string()),
            ),
            Err(_) => (body.clone(), "unknown".to_string()),
        };

        Self {
            status,
            code,
            message,
            headers,
            body,
        }
    }
}
