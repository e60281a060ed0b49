//! # Namespace Routes
//!
//! Namespace listings, membership management, and the maintainership
//! listings scoped to a namespace.
//!
//! ## Endpoints
//!
//! - `GET /v1/namespaces` — list namespaces (public)
//! - `GET /v1/namespaces/namespace/:namespace/members` — active members (public)
//! - `POST /v1/namespaces/namespace/:namespace/members/:invitee` — invite member
//! - `DELETE /v1/namespaces/namespace/:namespace/members/:invitee` — remove member
//! - `POST /v1/namespaces/namespace/:namespace/members/invitation` — accept own invitation
//! - `DELETE /v1/namespaces/namespace/:namespace/members/invitation` — decline own invitation
//! - `GET /v1/namespaces/namespace/:namespace/maintainerships` — packages maintained
//! - `GET /v1/namespaces/namespace/:namespace/maintainerships/pending` — pending invitations
//!
//! The invitation routes have no invitee parameter: only the invitee may
//! answer an invitation, so the caller's own identity names the
//! relationship.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use gantry_core::RelationshipStatus;
use gantry_storage_client::RequestId;

use crate::auth::CallerIdentity;
use crate::envelope::{Message, PageEnvelope, PageQuery};
use crate::error::{ApiError, ErrorBody};
use crate::routes::parse_namespace;
use crate::state::AppState;
use crate::translate;

// ── Routers ─────────────────────────────────────────────────────────

/// Routes served without authentication.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/v1/namespaces", get(list_namespaces))
        .route(
            "/v1/namespaces/namespace/:namespace/members",
            get(list_members),
        )
}

/// Routes served behind the bearer middleware.
pub fn authed_router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/namespaces/namespace/:namespace/members/:invitee",
            post(invite_member).delete(remove_member),
        )
        .route(
            "/v1/namespaces/namespace/:namespace/members/invitation",
            post(accept_invite).delete(decline_invite),
        )
        .route(
            "/v1/namespaces/namespace/:namespace/maintainerships",
            get(list_maintainerships),
        )
        .route(
            "/v1/namespaces/namespace/:namespace/maintainerships/pending",
            get(list_pending_maintainerships),
        )
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /v1/namespaces — List all namespaces.
#[utoipa::path(
    get,
    path = "/v1/namespaces",
    params(("page" = Option<u32>, Query, description = "Zero-based page number")),
    responses(
        (status = 200, description = "One page of namespace names", body = PageEnvelope),
        (status = 502, description = "Storage service unavailable", body = ErrorBody),
    ),
    tag = "namespaces"
)]
async fn list_namespaces(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageEnvelope>, ApiError> {
    let window = state.window(query.page());
    let page = state
        .storage
        .namespaces()
        .list(&request_id, window.page())
        .await?;
    Ok(Json(PageEnvelope::from_window(window, page)))
}

/// GET /v1/namespaces/namespace/{namespace}/members — Active members.
#[utoipa::path(
    get,
    path = "/v1/namespaces/namespace/{namespace}/members",
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
    ),
    responses(
        (status = 200, description = "One page of member user names", body = PageEnvelope),
        (status = 400, description = "Malformed namespace", body = ErrorBody),
    ),
    tag = "namespaces"
)]
async fn list_members(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(namespace): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageEnvelope>, ApiError> {
    let namespace = parse_namespace(&namespace)?;
    let window = state.window(query.page());
    let page = state
        .storage
        .namespaces()
        .members(
            &request_id,
            &namespace,
            RelationshipStatus::Active,
            window.page(),
        )
        .await?;
    Ok(Json(PageEnvelope::from_window(window, page)))
}

/// POST /v1/namespaces/namespace/{namespace}/members/{invitee} — Invite a
/// user to join a namespace.
#[utoipa::path(
    post,
    path = "/v1/namespaces/namespace/{namespace}/members/{invitee}",
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("invitee" = String, Path, description = "User to invite"),
    ),
    responses(
        (status = 200, description = "Invitation created", body = Message),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 403, description = "Caller may not add members", body = ErrorBody),
        (status = 404, description = "Unknown namespace or invitee", body = ErrorBody),
        (status = 409, description = "Already a member or already invited", body = ErrorBody),
    ),
    tag = "namespaces"
)]
async fn invite_member(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
    Path((namespace, invitee)): Path<(String, String)>,
) -> Result<Json<Message>, ApiError> {
    let namespace = parse_namespace(&namespace)?;
    state
        .storage
        .namespaces()
        .invite_member(&request_id, &namespace, &invitee, &caller.user)
        .await
        .map_err(|err| translate::member_invite_error(err, &namespace, &invitee))?;
    let bearer = &caller.user;
    tracing::info!("{invitee} invited to join {namespace} by {bearer}");
    Ok(Json(Message::new(format!(
        "{invitee} invited to join {namespace}."
    ))))
}

/// DELETE /v1/namespaces/namespace/{namespace}/members/{invitee} — Remove a
/// member or withdraw a pending invitation.
#[utoipa::path(
    delete,
    path = "/v1/namespaces/namespace/{namespace}/members/{invitee}",
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("invitee" = String, Path, description = "Member to remove"),
    ),
    responses(
        (status = 200, description = "Member removed", body = Message),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 403, description = "Caller may not remove members", body = ErrorBody),
        (status = 404, description = "No membership or invitation to remove", body = ErrorBody),
    ),
    tag = "namespaces"
)]
async fn remove_member(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
    Path((namespace, invitee)): Path<(String, String)>,
) -> Result<Json<Message>, ApiError> {
    let namespace = parse_namespace(&namespace)?;
    state
        .storage
        .namespaces()
        .remove_member(&request_id, &namespace, &invitee, &caller.user)
        .await
        .map_err(|err| translate::member_remove_error(err, &namespace, &invitee))?;
    let bearer = &caller.user;
    tracing::info!("{invitee} removed from {namespace} by {bearer}");
    Ok(Json(Message::new(format!(
        "{invitee} removed from {namespace}."
    ))))
}

/// POST /v1/namespaces/namespace/{namespace}/members/invitation — Accept
/// the caller's own pending invitation.
#[utoipa::path(
    post,
    path = "/v1/namespaces/namespace/{namespace}/members/invitation",
    params(("namespace" = String, Path, description = "Namespace as name@host")),
    responses(
        (status = 200, description = "Invitation accepted", body = Message),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 404, description = "No pending invitation", body = ErrorBody),
    ),
    tag = "namespaces"
)]
async fn accept_invite(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
    Path(namespace): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let namespace = parse_namespace(&namespace)?;
    let user = caller.user;
    state
        .storage
        .namespaces()
        .accept_member_invite(&request_id, &namespace, user.as_str(), &user)
        .await
        .map_err(|err| translate::member_accept_error(err, &namespace, &user))?;
    tracing::info!("{user} accepted the invitation to join {namespace}");
    Ok(Json(Message::new(format!(
        "{user} is now a member of {namespace}"
    ))))
}

/// DELETE /v1/namespaces/namespace/{namespace}/members/invitation — Decline
/// the caller's own pending invitation.
#[utoipa::path(
    delete,
    path = "/v1/namespaces/namespace/{namespace}/members/invitation",
    params(("namespace" = String, Path, description = "Namespace as name@host")),
    responses(
        (status = 200, description = "Invitation declined", body = Message),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 404, description = "No pending invitation", body = ErrorBody),
    ),
    tag = "namespaces"
)]
async fn decline_invite(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerIdentity,
    Path(namespace): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let namespace = parse_namespace(&namespace)?;
    let user = caller.user;
    state
        .storage
        .namespaces()
        .decline_member_invite(&request_id, &namespace, user.as_str(), &user)
        .await
        .map_err(|err| translate::member_decline_error(err, &namespace, &user))?;
    tracing::info!("{user} declined the invitation to join {namespace}");
    Ok(Json(Message::new(format!(
        "You have declined the invitation to join {namespace}"
    ))))
}

/// GET /v1/namespaces/namespace/{namespace}/maintainerships — Packages the
/// namespace actively maintains.
#[utoipa::path(
    get,
    path = "/v1/namespaces/namespace/{namespace}/maintainerships",
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
    ),
    responses(
        (status = 200, description = "One page of package specs", body = PageEnvelope),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
    ),
    tag = "namespaces"
)]
async fn list_maintainerships(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(namespace): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageEnvelope>, ApiError> {
    maintainerships_page(state, request_id, namespace, query, RelationshipStatus::Active).await
}

/// GET /v1/namespaces/namespace/{namespace}/maintainerships/pending —
/// Maintainer invitations awaiting the namespace's answer.
#[utoipa::path(
    get,
    path = "/v1/namespaces/namespace/{namespace}/maintainerships/pending",
    params(
        ("namespace" = String, Path, description = "Namespace as name@host"),
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
    ),
    responses(
        (status = 200, description = "One page of package specs", body = PageEnvelope),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
    ),
    tag = "namespaces"
)]
async fn list_pending_maintainerships(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(namespace): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageEnvelope>, ApiError> {
    maintainerships_page(state, request_id, namespace, query, RelationshipStatus::Pending).await
}

async fn maintainerships_page(
    state: AppState,
    request_id: RequestId,
    namespace: String,
    query: PageQuery,
    status: RelationshipStatus,
) -> Result<Json<PageEnvelope>, ApiError> {
    let namespace = parse_namespace(&namespace)?;
    let window = state.window(query.page());
    let page = state
        .storage
        .namespaces()
        .maintainerships(&request_id, &namespace, status, window.page())
        .await?;
    Ok(Json(PageEnvelope::from_window(window, page)))
}
