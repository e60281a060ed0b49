//! # Package Routes
//!
//! Package documents, versions, and content-addressed object passthrough.
//! Document and version bodies are relayed as the storage service shapes
//! them; this gateway adds status juggling (the syncing window) and
//! bearer attribution, nothing else.
//!
//! ## Endpoints
//!
//! - `GET /v1/packages` — list packages (public)
//! - `GET /v1/packages/package/:namespace/:name` — package detail (public)
//! - `PUT /v1/packages/package/:namespace/:name` — create or replace
//! - `DELETE /v1/packages/package/:namespace/:name` — mark abandonware
//! - `GET /v1/packages/package/:namespace/:name/versions/:version` — version detail (public)
//! - `PUT /v1/packages/package/:namespace/:name/versions/:version` — publish
//! - `DELETE /v1/packages/package/:namespace/:name/versions/:version` — yank
//! - `GET /v1/objects/object/:algorithm/*digest` — object bytes (public)

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use gantry_core::{ObjectRef, Version};
use gantry_storage_client::RequestId;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::CallerIdentity;
use crate::envelope::{PageEnvelope, PageQuery};
use crate::error::{ApiError, ErrorBody};
use crate::routes::parse_package;
use crate::state::AppState;

/// Marker code for a package whose first version has not landed yet.
const SYNCING_CODE: &str = "package.syncing";

// ── Request DTOs ────────────────────────────────────────────────────

/// Optional fields accepted when creating or replacing a package.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PackageUpdateRequest {
    /// Require two-factor authentication for publishes to this package.
    pub require_tfa: Option<bool>,
}

// ── Routers ─────────────────────────────────────────────────────────

/// Routes served without authentication.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/v1/packages", get(list_packages))
        .route(
            "/v1/packages/package/:namespace/:name",
            get(get_package),
        )
        .route(
            "/v1/packages/package/:namespace/:name/versions/:version",
            get(get_version),
        )
        .route(
            "/v1/objects/object/:algorithm/*digest",
            get(get_object),
        )
}

/// Routes served behind the bearer middleware.
pub fn authed_router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/packages/package/:namespace/:name",
            axum::routing::put(put_package).delete(delete_package),
        )
        .route(
            "/v1/packages/package/:namespace/:name/versions/:version",
            axum::routing::put(publish_version).delete(yank_version),
        )
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /v1/packages — List all packages.
#[utoipa::path(
    get,
    path = "/v1/packages",
    params(("page" = Option<u32>, Query, description = "Zero-based page number")),
    responses(
        (status = 200, description = "One page of package specs", body = PageEnvelope),
        (status = 502, description = "Storage service unavailable", body = ErrorBody),
    ),
    tag = "packages"
)]
async fn list_packages(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageEnvelope>, ApiError> {
    let window = state.window(query.page());
    let page = state
        .storage
        .packages()
        .list(&request_id, window.page())
        .await?;
    Ok(Json(PageEnvelope::from_window(window, page)))
}

/// GET /v1/packages/package/{namespace}/{name} — Package detail.
///
/// A package mid-sync answers 202 with `retry-after: 1` and an empty JSON
/// object; clients poll until the first version lands.
#[utoipa::path(
    get,
    path = "/v1/packages/package/{namespace}/{name}",
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("name" = String, Path, description = "Package name"),
    ),
    responses(
        (status = 200, description = "Package document"),
        (status = 202, description = "Package is still syncing; retry shortly"),
        (status = 404, description = "Unknown package", body = ErrorBody),
    ),
    tag = "packages"
)]
async fn get_package(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((namespace, name)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let package = parse_package(&namespace, &name)?;
    match state.storage.packages().get(&request_id, &package).await {
        Ok(doc) => Ok(Json(doc).into_response()),
        Err(err) => match err.remote() {
            Some(failure) if failure.code == SYNCING_CODE => Ok(syncing_response()),
            _ => Err(err.into()),
        },
    }
}

fn syncing_response() -> Response {
    (
        StatusCode::ACCEPTED,
        [(header::RETRY_AFTER, "1")],
        Json(serde_json::json!({})),
    )
        .into_response()
}

/// PUT /v1/packages/package/{namespace}/{name} — Create or replace a
/// package document.
#[utoipa::path(
    put,
    path = "/v1/packages/package/{namespace}/{name}",
    request_body = PackageUpdateRequest,
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("name" = String, Path, description = "Package name"),
    ),
    responses(
        (status = 200, description = "Package document"),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 403, description = "Caller may not manage this package", body = ErrorBody),
    ),
    tag = "packages"
)]
async fn put_package(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
    Path((namespace, name)): Path<(String, String)>,
    body: Option<Json<PackageUpdateRequest>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let package = parse_package(&namespace, &name)?;
    let require_tfa = body.and_then(|Json(body)| body.require_tfa);
    let doc = state
        .storage
        .packages()
        .replace(&request_id, &package, require_tfa, &caller.user)
        .await?;
    let bearer = &caller.user;
    tracing::info!("{package} created or replaced by {bearer}");
    Ok(Json(doc))
}

/// DELETE /v1/packages/package/{namespace}/{name} — Mark a package as
/// abandonware.
#[utoipa::path(
    delete,
    path = "/v1/packages/package/{namespace}/{name}",
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("name" = String, Path, description = "Package name"),
    ),
    responses(
        (status = 204, description = "Package marked as abandonware"),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 404, description = "Unknown package", body = ErrorBody),
    ),
    tag = "packages"
)]
async fn delete_package(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
    Path((namespace, name)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let package = parse_package(&namespace, &name)?;
    state
        .storage
        .packages()
        .delete(&request_id, &package, &caller.user)
        .await?;
    let bearer = &caller.user;
    tracing::info!("{package} marked as abandonware by {bearer}");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/packages/package/{namespace}/{name}/versions/{version} —
/// Version detail.
#[utoipa::path(
    get,
    path = "/v1/packages/package/{namespace}/{name}/versions/{version}",
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("name" = String, Path, description = "Package name"),
        ("version" = String, Path, description = "Version identifier"),
    ),
    responses(
        (status = 200, description = "Version document"),
        (status = 404, description = "Unknown package or version", body = ErrorBody),
    ),
    tag = "packages"
)]
async fn get_version(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((namespace, name, version)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let package = parse_package(&namespace, &name)?;
    let version = Version::new(version)?;
    let doc = state
        .storage
        .packages()
        .version(&request_id, &package, &version)
        .await?;
    Ok(Json(doc))
}

/// PUT /v1/packages/package/{namespace}/{name}/versions/{version} —
/// Publish a version, forwarding the artifact body untouched.
#[utoipa::path(
    put,
    path = "/v1/packages/package/{namespace}/{name}/versions/{version}",
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("name" = String, Path, description = "Package name"),
        ("version" = String, Path, description = "Version identifier"),
    ),
    responses(
        (status = 200, description = "Version document"),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 409, description = "Version already exists", body = ErrorBody),
    ),
    tag = "packages"
)]
async fn publish_version(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
    Path((namespace, name, version)): Path<(String, String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let package = parse_package(&namespace, &name)?;
    let version = Version::new(version)?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream");
    let doc = state
        .storage
        .packages()
        .publish_version(
            &request_id,
            &package,
            &version,
            content_type,
            body.to_vec(),
            &caller.user,
        )
        .await?;
    let bearer = &caller.user;
    tracing::info!("{package} version {version} published by {bearer}");
    Ok(Json(doc))
}

/// DELETE /v1/packages/package/{namespace}/{name}/versions/{version} —
/// Yank a published version.
#[utoipa::path(
    delete,
    path = "/v1/packages/package/{namespace}/{name}/versions/{version}",
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("name" = String, Path, description = "Package name"),
        ("version" = String, Path, description = "Version identifier"),
    ),
    responses(
        (status = 204, description = "Version yanked"),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 404, description = "Unknown package or version", body = ErrorBody),
    ),
    tag = "packages"
)]
async fn yank_version(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
    Path((namespace, name, version)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    let package = parse_package(&namespace, &name)?;
    let version = Version::new(version)?;
    state
        .storage
        .packages()
        .yank_version(&request_id, &package, &version, &caller.user)
        .await?;
    let bearer = &caller.user;
    tracing::info!("{package} version {version} yanked by {bearer}");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/objects/object/{algorithm}/{digest} — Content-addressed object
/// bytes.
///
/// Failures render the JSON error envelope; a caller never receives
/// partial binary.
#[utoipa::path(
    get,
    path = "/v1/objects/object/{algorithm}/{digest}",
    params(
        ("algorithm" = String, Path, description = "Digest algorithm, e.g. sha512"),
        ("digest" = String, Path, description = "Object digest; may contain slashes"),
    ),
    responses(
        (status = 200, description = "Object bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Unknown object", body = ErrorBody),
    ),
    tag = "packages"
)]
async fn get_object(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((algorithm, digest)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let object = ObjectRef::new(algorithm, digest)?;
    let upstream = state.storage.packages().object(&request_id, &object).await?;
    let bytes = upstream
        .bytes()
        .await
        .map_err(|err| ApiError::Upstream(err.to_string()))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    )
        .into_response())
}
