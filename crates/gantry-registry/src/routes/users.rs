//! # User Routes
//!
//! Membership listings scoped to a user. Authentication is required to
//! list memberships at all, but any authenticated caller may look at any
//! user's listing; membership is public information once you are inside.
//!
//! ## Endpoints
//!
//! - `GET /v1/users/user/:user/memberships` — active memberships
//! - `GET /v1/users/user/:user/memberships/pending` — pending invitations

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Extension, Json, Router};
use gantry_core::{RelationshipStatus, UserName};
use gantry_storage_client::RequestId;

use crate::envelope::{PageEnvelope, PageQuery};
use crate::error::{ApiError, ErrorBody};
use crate::state::AppState;

// ── Router ──────────────────────────────────────────────────────────

/// Routes served behind the bearer middleware.
pub fn authed_router() -> Router<AppState> {
    Router::new()
        .route("/v1/users/user/:user/memberships", get(list_memberships))
        .route(
            "/v1/users/user/:user/memberships/pending",
            get(list_pending_memberships),
        )
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /v1/users/user/{user}/memberships — Namespaces the user belongs to.
#[utoipa::path(
    get,
    path = "/v1/users/user/{user}/memberships",
    params(
        ("user" = String, Path, description = "User name"),
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
    ),
    responses(
        (status = 200, description = "One page of namespace names", body = PageEnvelope),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
    ),
    tag = "users"
)]
async fn list_memberships(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageEnvelope>, ApiError> {
    memberships_page(state, request_id, user, query, RelationshipStatus::Active).await
}

/// GET /v1/users/user/{user}/memberships/pending — Invitations awaiting
/// the user's answer.
#[utoipa::path(
    get,
    path = "/v1/users/user/{user}/memberships/pending",
    params(
        ("user" = String, Path, description = "User name"),
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
    ),
    responses(
        (status = 200, description = "One page of namespace names", body = PageEnvelope),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
    ),
    tag = "users"
)]
async fn list_pending_memberships(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageEnvelope>, ApiError> {
    memberships_page(state, request_id, user, query, RelationshipStatus::Pending).await
}

async fn memberships_page(
    state: AppState,
    request_id: RequestId,
    user: String,
    query: PageQuery,
    status: RelationshipStatus,
) -> Result<Json<PageEnvelope>, ApiError> {
    let user = UserName::new(user)?;
    let window = state.window(query.page());
    let page = state
        .storage
        .users()
        .memberships(&request_id, &user, status, window.page())
        .await?;
    Ok(Json(PageEnvelope::from_window(window, page)))
}
