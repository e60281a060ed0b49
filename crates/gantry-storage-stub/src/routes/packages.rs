//! Package documents, the maintainer side of relationships, versions,
//! and object retrieval.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use gantry_core::{Relationship, RelationshipAction};
use gantry_storage_client::Page;
use serde_json::Value;

use crate::routes::{body_bearer, header_bearer, parse_package, parse_version, ListQuery};
use crate::store::{Refusal, StubState};

pub(crate) async fn list(
    State(state): State<StubState>,
    Query(query): Query<ListQuery>,
) -> Json<Page<String>> {
    Json(state.list_packages(query.page()))
}

pub(crate) async fn get_package(
    State(state): State<StubState>,
    Path((namespace, name)): Path<(String, String)>,
) -> Result<Json<Value>, Refusal> {
    let package = parse_package(&namespace, &name)?;
    Ok(Json(state.get_package(&package)?))
}

pub(crate) async fn put_package(
    State(state): State<StubState>,
    Path((namespace, name)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Refusal> {
    let package = parse_package(&namespace, &name)?;
    let bearer = body_bearer(&body)?;
    let require_tfa = body.get("require_tfa").and_then(|v| v.as_bool());
    Ok(Json(state.put_package(&package, require_tfa, &bearer)?))
}

pub(crate) async fn delete_package(
    State(state): State<StubState>,
    Path((namespace, name)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<StatusCode, Refusal> {
    let package = parse_package(&namespace, &name)?;
    let bearer = body_bearer(&body)?;
    state.delete_package(&package, &bearer)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn maintainers(
    State(state): State<StubState>,
    Path((namespace, name)): Path<(String, String)>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<String>>, Refusal> {
    let package = parse_package(&namespace, &name)?;
    let page = state.list_maintainers(&package, query.status()?, query.page())?;
    Ok(Json(page))
}

fn maintainer_action(
    state: &StubState,
    namespace: &str,
    name: &str,
    invitee: &str,
    body: &Value,
    action: RelationshipAction,
) -> Result<Json<Relationship>, Refusal> {
    let package = parse_package(namespace, name)?;
    let bearer = body_bearer(body)?;
    let row = state.maintainer_transition(&package, invitee, &bearer, action)?;
    Ok(Json(row))
}

pub(crate) async fn invite_maintainer(
    State(state): State<StubState>,
    Path((namespace, name, invitee)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Relationship>, Refusal> {
    maintainer_action(&state, &namespace, &name, &invitee, &body, RelationshipAction::Invite)
}

pub(crate) async fn remove_maintainer(
    State(state): State<StubState>,
    Path((namespace, name, invitee)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Relationship>, Refusal> {
    maintainer_action(&state, &namespace, &name, &invitee, &body, RelationshipAction::Remove)
}

pub(crate) async fn accept_invitation(
    State(state): State<StubState>,
    Path((namespace, name, invitee)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Relationship>, Refusal> {
    maintainer_action(&state, &namespace, &name, &invitee, &body, RelationshipAction::Accept)
}

pub(crate) async fn decline_invitation(
    State(state): State<StubState>,
    Path((namespace, name, invitee)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Relationship>, Refusal> {
    maintainer_action(&state, &namespace, &name, &invitee, &body, RelationshipAction::Decline)
}

pub(crate) async fn get_version(
    State(state): State<StubState>,
    Path((namespace, name, version)): Path<(String, String, String)>,
) -> Result<Json<Value>, Refusal> {
    let package = parse_package(&namespace, &name)?;
    let version = parse_version(&version)?;
    Ok(Json(state.get_version(&package, &version)?))
}

/// The artifact body arrives raw; the bearer rides in a header because
/// the body is the artifact itself.
pub(crate) async fn publish_version(
    State(state): State<StubState>,
    Path((namespace, name, version)): Path<(String, String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), Refusal> {
    let package = parse_package(&namespace, &name)?;
    let version = parse_version(&version)?;
    let bearer = header_bearer(&headers)?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");
    let document =
        state.publish_version(&package, &version, content_type, body.to_vec(), &bearer)?;
    Ok((StatusCode::CREATED, Json(document)))
}

pub(crate) async fn yank_version(
    State(state): State<StubState>,
    Path((namespace, name, version)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Result<StatusCode, Refusal> {
    let package = parse_package(&namespace, &name)?;
    let version = parse_version(&version)?;
    let bearer = body_bearer(&body)?;
    state.yank_version(&package, &version, &bearer)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn get_object(
    State(state): State<StubState>,
    Path((algorithm, digest)): Path<(String, String)>,
) -> Result<Response, Refusal> {
    let bytes = state.get_object(&algorithm, &digest)?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    )
        .into_response())
}
