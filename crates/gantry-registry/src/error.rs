//! # Gateway Error Types
//!
//! Every failure leaving this service renders as the flat JSON envelope
//! `{message, code}`. The status line is chosen here for local failures
//! and by the translator for storage refusals; 5xx details are logged and
//! withheld from callers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gantry_core::ValidationError;
use gantry_storage_client::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Wire shape of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable description, safe to show to callers.
    pub message: String,
    /// Machine-readable code, stable across releases.
    pub code: String,
}

/// Unified error for route handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request itself is malformed (bad namespace, package, or version
    /// spelling). Refused before any storage call is made.
    #[error("{0}")]
    BadRequest(String),

    /// Bearer authentication missing or rejected.
    #[error("{0}")]
    Unauthorized(String),

    /// A storage refusal, already translated for this surface. The status
    /// and message were chosen by the translator; the code is the storage
    /// service's, relayed verbatim.
    #[error("{message}")]
    Remote {
        /// Response status chosen by the translator.
        status: StatusCode,
        /// Machine code from the storage service.
        code: String,
        /// Caller-facing message.
        message: String,
    },

    /// The storage service could not be reached, or answered with a body
    /// this gateway could not decode.
    #[error("storage unavailable: {0}")]
    Upstream(String),

    /// A bug on this side. Details are logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Build a translated storage refusal.
    pub fn remote(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    fn status_and_code(&self) -> (StatusCode, &str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "validation.failed"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "auth.required"),
            Self::Remote { status, code, .. } => (*status, code.as_str()),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "storage.unavailable"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal.error"),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// Default conversion for storage failures that no translator has claimed:
/// refusals are relayed with the storage service's own status, code, and
/// message; transport and decode failures collapse to 502.
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Remote(failure) => Self::Remote {
                status: StatusCode::from_u16(failure.status).unwrap_or(StatusCode::BAD_GATEWAY),
                code: failure.code,
                message: failure.message,
            },
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let code = code.to_string();
        let message = match &self {
            Self::Internal(detail) => {
                tracing::error!("internal error: {detail}");
                "An internal error occurred".to_string()
            }
            Self::Upstream(detail) => {
                tracing::error!("storage unavailable: {detail}");
                "The storage service is unavailable".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { message, code })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn response_parts(err: ApiError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn bad_request_renders_validation_code() {
        let (status, body) = response_parts(ApiError::BadRequest("no good".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "validation.failed");
        assert_eq!(body.message, "no good");
    }

    #[tokio::test]
    async fn remote_keeps_translator_status_and_storage_code() {
        let err = ApiError::remote(
            StatusCode::CONFLICT,
            "member.invite.pending",
            "already invited",
        );
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "member.invite.pending");
        assert_eq!(body.message, "already invited");
    }

    #[tokio::test]
    async fn internal_detail_is_hidden() {
        let (status, body) =
            response_parts(ApiError::Internal("password was hunter2".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "internal.error");
        assert_eq!(body.message, "An internal error occurred");
        assert!(!body.message.contains("hunter2"));
    }

    #[tokio::test]
    async fn upstream_detail_is_hidden() {
        let (status, body) =
            response_parts(ApiError::Upstream("connection refused: 10.0.0.3".into())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.code, "storage.unavailable");
        assert_eq!(body.message, "The storage service is unavailable");
    }

    #[tokio::test]
    async fn validation_error_converts_to_bad_request() {
        let err = gantry_core::Namespace::parse("no-host").unwrap_err();
        let (status, body) = response_parts(ApiError::from(err)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "validation.failed");
    }
}
