//! # Storage Route Surface
//!
//! Handlers stay thin: parse path parameters, pull the bearer out of the
//! body or header, call one [`StubState`] operation, and put the result
//! on the wire. Domain decisions all live in the store.

pub(crate) mod namespaces;
pub(crate) mod packages;
pub(crate) mod sessions;
pub(crate) mod users;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use gantry_core::{
    Namespace, PackageName, PackageRef, RelationshipStatus, UserName, ValidationError, Version,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::store::{Refusal, StubState};

/// Build the complete storage router.
pub fn router(state: StubState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/namespaces", get(namespaces::list))
        .route(
            "/v1/namespaces/namespace/:namespace/members",
            get(namespaces::members),
        )
        .route(
            "/v1/namespaces/namespace/:namespace/members/:invitee",
            post(namespaces::invite_member).delete(namespaces::remove_member),
        )
        .route(
            "/v1/namespaces/namespace/:namespace/members/:invitee/invitation",
            post(namespaces::accept_invite).delete(namespaces::decline_invite),
        )
        .route(
            "/v1/namespaces/namespace/:namespace/maintainerships",
            get(namespaces::maintainerships),
        )
        .route("/v1/users/user/:user/memberships", get(users::memberships))
        .route("/v1/users/token", get(users::resolve_token))
        .route(
            "/v1/users/tokens",
            get(users::list_tokens).post(users::create_token),
        )
        .route("/v1/users/tokens/token/:hashes", delete(users::delete_tokens))
        .route("/v1/packages", get(packages::list))
        .route(
            "/v1/packages/package/:namespace/:name",
            get(packages::get_package)
                .put(packages::put_package)
                .delete(packages::delete_package),
        )
        .route(
            "/v1/packages/package/:namespace/:name/maintainers",
            get(packages::maintainers),
        )
        .route(
            "/v1/packages/package/:namespace/:name/maintainers/:invitee",
            post(packages::invite_maintainer).delete(packages::remove_maintainer),
        )
        .route(
            "/v1/packages/package/:namespace/:name/maintainers/:invitee/invitation",
            post(packages::accept_invitation).delete(packages::decline_invitation),
        )
        .route(
            "/v1/packages/package/:namespace/:name/versions/:version",
            get(packages::get_version)
                .put(packages::publish_version)
                .delete(packages::yank_version),
        )
        .route(
            "/v1/objects/object/:algorithm/*digest",
            get(packages::get_object),
        )
        .route("/v1/cli-sessions", post(sessions::create))
        .route(
            "/v1/cli-sessions/session/:session",
            get(sessions::fetch).post(sessions::resolve),
        )
        .fallback(unknown_route)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn unknown_route() -> Refusal {
    Refusal::new(StatusCode::NOT_FOUND, "route.unknown", "No such route.")
}

/// Query parameters accepted by the listing routes.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    status: Option<String>,
    page: Option<String>,
}

impl ListQuery {
    /// Page number; anything unparseable reads as the first page.
    pub(crate) fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.parse().ok())
            .unwrap_or(0)
    }

    /// Status filter, defaulting to active.
    pub(crate) fn status(&self) -> Result<RelationshipStatus, Refusal> {
        match self.status.as_deref() {
            None => Ok(RelationshipStatus::Active),
            Some(raw) => RelationshipStatus::from_name(raw).ok_or_else(|| {
                Refusal::new(
                    StatusCode::BAD_REQUEST,
                    "status.invalid",
                    format!("Unknown status \"{raw}\"."),
                )
            }),
        }
    }
}

fn invalid_namespace(err: ValidationError) -> Refusal {
    Refusal::new(StatusCode::BAD_REQUEST, "namespace.invalid", err.to_string())
}

pub(crate) fn parse_namespace(raw: &str) -> Result<Namespace, Refusal> {
    Namespace::parse(raw).map_err(invalid_namespace)
}

pub(crate) fn parse_package(namespace: &str, name: &str) -> Result<PackageRef, Refusal> {
    let namespace = parse_namespace(namespace)?;
    let name = PackageName::new(name)
        .map_err(|err| Refusal::new(StatusCode::BAD_REQUEST, "package.invalid", err.to_string()))?;
    Ok(PackageRef::new(namespace, name))
}

pub(crate) fn parse_version(raw: &str) -> Result<Version, Refusal> {
    Version::new(raw)
        .map_err(|err| Refusal::new(StatusCode::BAD_REQUEST, "version.invalid", err.to_string()))
}

/// Pull the acting user out of a mutation body's `bearer` field.
pub(crate) fn body_bearer(body: &Value) -> Result<UserName, Refusal> {
    let raw = body.get("bearer").and_then(|v| v.as_str()).ok_or_else(|| {
        Refusal::new(StatusCode::BAD_REQUEST, "bearer.required", "Must provide bearer")
    })?;
    UserName::new(raw)
        .map_err(|err| Refusal::new(StatusCode::BAD_REQUEST, "bearer.invalid", err.to_string()))
}

/// Pull the acting user out of a `bearer` header (token routes).
pub(crate) fn header_bearer(headers: &HeaderMap) -> Result<UserName, Refusal> {
    let raw = headers
        .get("bearer")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            Refusal::new(StatusCode::BAD_REQUEST, "bearer.required", "Must provide bearer")
        })?;
    UserName::new(raw)
        .map_err(|err| Refusal::new(StatusCode::BAD_REQUEST, "bearer.invalid", err.to_string()))
}
