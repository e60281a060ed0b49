//! # gantry-registry — Public Gateway for the Gantry Package Registry
//!
//! The registry is the caller-facing half of Gantry. Every route validates
//! its inputs, makes exactly one call to the storage service through the
//! typed client in `gantry-storage-client`, and renders one of three body
//! shapes: `{objects, next, prev, total}` for listings, `{message}` for
//! mutations, and `{message, code}` for errors. Storage refusals are
//! translated per operation in [`translate`]; everything else is relayed.
//!
//! ## API Surface
//!
//! | Prefix                    | Module                   | Auth    |
//! |---------------------------|--------------------------|---------|
//! | `/health`, `/health/ready`| here                     | public  |
//! | `/openapi.json`           | [`openapi`]              | public  |
//! | `/v1/namespaces/*`        | [`routes::namespaces`]   | mixed   |
//! | `/v1/packages/*`          | [`routes::packages`], [`routes::maintainers`] | mixed |
//! | `/v1/objects/*`           | [`routes::packages`]     | public  |
//! | `/v1/users/*`             | [`routes::users`]        | bearer  |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → RequestId → (bearer auth on authed routes) → Handler
//! ```

pub mod auth;
pub mod envelope;
pub mod error;
pub mod openapi;
pub mod request_id;
pub mod routes;
pub mod state;

mod translate;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use gantry_storage_client::RequestId;
use tower_http::trace::TraceLayer;

use crate::error::ErrorBody;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes and read-only discovery routes are mounted outside the
/// bearer middleware; relationship mutations and caller-scoped listings
/// sit behind it.
pub fn app(state: AppState) -> Router {
    // Bearer-authenticated routes.
    let authed = Router::new()
        .merge(routes::namespaces::authed_router())
        .merge(routes::maintainers::authed_router())
        .merge(routes::packages::authed_router())
        .merge(routes::users::authed_router())
        .layer(from_fn_with_state(state.clone(), auth::auth_middleware));

    // Public routes.
    let public = Router::new()
        .merge(routes::namespaces::public_router())
        .merge(routes::maintainers::public_router())
        .merge(routes::packages::public_router())
        .merge(openapi::router());

    // Health probes.
    let health = Router::new()
        .route("/health", get(liveness))
        .route("/health/ready", get(readiness));

    Router::new()
        .merge(health)
        .merge(public)
        .merge(authed)
        .layer(from_fn(request_id::propagate_request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe — the process is up.
async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Readiness probe — round-trips the storage service.
async fn readiness(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    match state.storage.ping(&request_id).await {
        Ok(()) => Json(serde_json::json!({ "status": "ready" })).into_response(),
        Err(err) => {
            tracing::warn!("readiness probe failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorBody {
                    message: "The storage service is unavailable".to_string(),
                    code: "storage.unavailable".to_string(),
                }),
            )
                .into_response()
        }
    }
}
