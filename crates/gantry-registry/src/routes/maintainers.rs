//! # Maintainer Routes
//!
//! Maintainer listings and maintainer invitation management for a package.
//! Maintainers are namespaces, not users: inviting one grants the whole
//! namespace publish rights once a member of the invitee accepts.
//!
//! ## Endpoints
//!
//! - `GET /v1/packages/package/:namespace/:name/maintainers` — active maintainers (public)
//! - `POST /v1/packages/package/:namespace/:name/maintainers/:invitee` — invite
//! - `DELETE /v1/packages/package/:namespace/:name/maintainers/:invitee` — remove
//! - `POST /v1/packages/package/:namespace/:name/invitation/:member` — accept
//! - `DELETE /v1/packages/package/:namespace/:name/invitation/:member` — decline

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use gantry_core::RelationshipStatus;
use gantry_storage_client::RequestId;

use crate::auth::CallerIdentity;
use crate::envelope::{Message, PageEnvelope, PageQuery};
use crate::error::{ApiError, ErrorBody};
use crate::routes::parse_package;
use crate::state::AppState;
use crate::translate;

// ── Routers ─────────────────────────────────────────────────────────

/// Routes served without authentication.
pub fn public_router() -> Router<AppState> {
    Router::new().route(
        "/v1/packages/package/:namespace/:name/maintainers",
        get(list_maintainers),
    )
}

/// Routes served behind the bearer middleware.
pub fn authed_router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/packages/package/:namespace/:name/maintainers/:invitee",
            post(invite_maintainer).delete(remove_maintainer),
        )
        .route(
            "/v1/packages/package/:namespace/:name/invitation/:member",
            post(accept_invitation).delete(decline_invitation),
        )
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /v1/packages/package/{namespace}/{name}/maintainers — Active
/// maintainers of a package.
#[utoipa::path(
    get,
    path = "/v1/packages/package/{namespace}/{name}/maintainers",
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("name" = String, Path, description = "Package name"),
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
    ),
    responses(
        (status = 200, description = "One page of maintainer namespaces", body = PageEnvelope),
        (status = 404, description = "Package does not exist", body = ErrorBody),
    ),
    tag = "maintainers"
)]
async fn list_maintainers(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((namespace, name)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageEnvelope>, ApiError> {
    let package = parse_package(&namespace, &name)?;
    let window = state.window(query.page());
    let page = state
        .storage
        .packages()
        .maintainers(
            &request_id,
            &package,
            RelationshipStatus::Active,
            window.page(),
        )
        .await
        .map_err(|err| translate::maintainers_list_error(err, &package))?;
    Ok(Json(PageEnvelope::from_window(window, page)))
}

/// POST /v1/packages/package/{namespace}/{name}/maintainers/{invitee} —
/// Invite a namespace to maintain a package.
#[utoipa::path(
    post,
    path = "/v1/packages/package/{namespace}/{name}/maintainers/{invitee}",
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("name" = String, Path, description = "Package name"),
        ("invitee" = String, Path, description = "Namespace to invite"),
    ),
    responses(
        (status = 200, description = "Invitation created", body = Message),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 403, description = "Caller may not manage maintainers", body = ErrorBody),
        (status = 404, description = "Unknown package or invitee", body = ErrorBody),
        (status = 409, description = "Already settled", body = ErrorBody),
    ),
    tag = "maintainers"
)]
async fn invite_maintainer(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
    Path((namespace, name, invitee)): Path<(String, String, String)>,
) -> Result<Json<Message>, ApiError> {
    let package = parse_package(&namespace, &name)?;
    state
        .storage
        .packages()
        .invite_maintainer(&request_id, &package, &invitee, &caller.user)
        .await
        .map_err(|err| translate::maintainer_invite_error(err, &package, &invitee))?;
    let bearer = &caller.user;
    tracing::info!("{invitee} invited to join the maintainers of {package} by {bearer}");
    Ok(Json(Message::new(format!(
        "{invitee} invited to join the maintainers of {package}."
    ))))
}

/// DELETE /v1/packages/package/{namespace}/{name}/maintainers/{invitee} —
/// Remove a maintainer or withdraw a pending invitation.
#[utoipa::path(
    delete,
    path = "/v1/packages/package/{namespace}/{name}/maintainers/{invitee}",
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("name" = String, Path, description = "Package name"),
        ("invitee" = String, Path, description = "Maintainer to remove"),
    ),
    responses(
        (status = 200, description = "Maintainer removed", body = Message),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 404, description = "No maintainership to remove", body = ErrorBody),
    ),
    tag = "maintainers"
)]
async fn remove_maintainer(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
    Path((namespace, name, invitee)): Path<(String, String, String)>,
) -> Result<Json<Message>, ApiError> {
    let package = parse_package(&namespace, &name)?;
    state
        .storage
        .packages()
        .remove_maintainer(&request_id, &package, &invitee, &caller.user)
        .await
        .map_err(|err| translate::maintainer_remove_error(err, &package, &invitee))?;
    let bearer = &caller.user;
    tracing::info!("{invitee} removed as maintainer of {package} by {bearer}");
    Ok(Json(Message::new(format!(
        "{invitee} removed as maintainer of {package}."
    ))))
}

/// POST /v1/packages/package/{namespace}/{name}/invitation/{member} —
/// Accept a maintainer invitation on behalf of a namespace.
#[utoipa::path(
    post,
    path = "/v1/packages/package/{namespace}/{name}/invitation/{member}",
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("name" = String, Path, description = "Package name"),
        ("member" = String, Path, description = "Invited namespace"),
    ),
    responses(
        (status = 200, description = "Invitation accepted", body = Message),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 404, description = "No pending invitation", body = ErrorBody),
    ),
    tag = "maintainers"
)]
async fn accept_invitation(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
    Path((namespace, name, member)): Path<(String, String, String)>,
) -> Result<Json<Message>, ApiError> {
    let package = parse_package(&namespace, &name)?;
    state
        .storage
        .packages()
        .accept_maintainer_invite(&request_id, &package, &member, &caller.user)
        .await
        .map_err(|err| translate::maintainer_accept_error(err, &package, &member))?;
    let bearer = &caller.user;
    tracing::info!("{bearer} accepted the invitation for {member} to join {package}");
    Ok(Json(Message::new(format!(
        "{member} is now a maintainer for {package}"
    ))))
}

/// DELETE /v1/packages/package/{namespace}/{name}/invitation/{member} —
/// Decline a maintainer invitation on behalf of a namespace.
#[utoipa::path(
    delete,
    path = "/v1/packages/package/{namespace}/{name}/invitation/{member}",
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("name" = String, Path, description = "Package name"),
        ("member" = String, Path, description = "Invited namespace"),
    ),
    responses(
        (status = 200, description = "Invitation declined", body = Message),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 404, description = "No pending invitation", body = ErrorBody),
    ),
    tag = "maintainers"
)]
async fn decline_invitation(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
    Path((namespace, name, member)): Path<(String, String, String)>,
) -> Result<Json<Message>, ApiError> {
    let package = parse_package(&namespace, &name)?;
    state
        .storage
        .packages()
        .decline_maintainer_invite(&request_id, &package, &member, &caller.user)
        .await
        .map_err(|err| translate::maintainer_decline_error(err, &package, &member))?;
    let bearer = &caller.user;
    tracing::info!("{bearer} declined the invitation for {member} to join {package}");
    Ok(Json(Message::new(format!(
        "You have declined the invitation for {member} to join {package}"
    ))))
}
