//! # Request Correlation
//!
//! Every inbound request carries a [`RequestId`]: adopted from the caller's
//! `request-id` header when present, minted otherwise. The identifier rides
//! in request extensions so handlers can thread it into storage calls, and
//! is echoed back on the response for end-to-end tracing.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use gantry_storage_client::RequestId;

/// Header used for correlation on both the inbound and outbound legs.
pub const REQUEST_ID_HEADER: &str = "request-id";

/// Middleware: adopt or mint the request id, then echo it on the response.
pub async fn propagate_request_id(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(RequestId::new)
        .unwrap_or_else(RequestId::generate);

    request.extensions_mut().insert(id.clone());
    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::{Extension, Router};
    use tower::ServiceExt;

    fn echo_app() -> Router {
        async fn show(Extension(id): Extension<RequestId>) -> String {
            id.as_str().to_string()
        }
        Router::new()
            .route("/", get(show))
            .layer(from_fn(propagate_request_id))
    }

    #[tokio::test]
    async fn inbound_id_is_adopted_and_echoed() {
        let response = echo_app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "rid-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).unwrap(),
            "rid-42"
        );
    }

    #[tokio::test]
    async fn missing_id_is_minted() {
        let response = echo_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let echoed = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(!echoed.to_str().unwrap().is_empty());
    }
}
