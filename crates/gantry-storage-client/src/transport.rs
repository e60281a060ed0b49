//! Request plumbing shared by the sub-clients.
//!
//! One code path builds, sends, logs, and classifies every storage request.
//! Non-success statuses never reach the callers as raw responses — they are
//! read, picked apart, and returned as `StorageError::Remote`.

use std::time::Instant;

use reqwest::header::USER_AGENT;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{RemoteFailure, StorageError};
use crate::types::RequestId;

/// What a request carries in its body.
pub(crate) enum Payload {
    /// No body at all.
    None,
    /// A JSON document.
    Json(serde_json::Value),
    /// Raw bytes, forwarded as-is with the given content type.
    Raw(String, Vec<u8>),
}

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    base: Url,
    user_agent: String,
}

impl Transport {
    pub(crate) fn new(http: reqwest::Client, base: Url, user_agent: String) -> Self {
        Self {
            http,
            base,
            user_agent,
        }
    }

    /// Send a request and return the raw (successful) response.
    pub(crate) async fn send(
        &self,
        request_id: &RequestId,
        method: Method,
        path: &str,
        headers: &[(&'static str, String)],
        payload: Payload,
    ) -> Result<Response, StorageError> {
        let endpoint = format!("{method} {path}");
        let url = format!("{}{}", self.base, path.trim_start_matches('/'));
        let started = Instant::now();

        let mut request = self
            .http
            .request(method, &url)
            .header("request-id", request_id.as_str())
            .header(USER_AGENT, &self.user_agent);
        for (name, value) in headers {
            request = request.header(*name, value);
        }
        request = match payload {
            Payload::None => request,
            Payload::Json(value) => request.json(&value),
            Payload::Raw(content_type, bytes) => {
                request.header("content-type", content_type).body(bytes)
            }
        };

        let response = request.send().await.map_err(|e| StorageError::Transport {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.map_err(|e| StorageError::Transport {
                endpoint: endpoint.clone(),
                source: e,
            })?;
            let failure = RemoteFailure::classify(status.as_u16(), headers, body);
            tracing::error!(
                %endpoint,
                status = failure.status,
                code = %failure.code,
                "storage request refused"
            );
            return Err(StorageError::Remote(failure));
        }

        tracing::debug!(
            %endpoint,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "storage request completed"
        );
        Ok(response)
    }

    /// Send a request and decode the JSON response body.
    pub(crate) async fn json<T: DeserializeOwned>(
        &self,
        request_id: &RequestId,
        method: Method,
        path: &str,
        headers: &[(&'static str, String)],
        payload: Payload,
    ) -> Result<T, StorageError> {
        let endpoint = format!("{method} {path}");
        let response = self
            .send(request_id, method, path, headers, payload)
            .await?;
        response
            .json()
            .await
            .map_err(|e| StorageError::Decode {
                endpoint,
                source: e,
            })
    }
}
