//! Namespace listings and the member side of relationships.

use axum::extract::{Path, Query, State};
use axum::Json;
use gantry_core::{Relationship, RelationshipAction};
use gantry_storage_client::Page;
use serde_json::Value;

use crate::routes::{body_bearer, parse_namespace, ListQuery};
use crate::store::{Refusal, StubState};

pub(crate) async fn list(
    State(state): State<StubState>,
    Query(query): Query<ListQuery>,
) -> Json<Page<String>> {
    Json(state.list_namespaces(query.page()))
}

pub(crate) async fn members(
    State(state): State<StubState>,
    Path(namespace): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<String>>, Refusal> {
    let namespace = parse_namespace(&namespace)?;
    let page = state.list_members(&namespace, query.status()?, query.page())?;
    Ok(Json(page))
}

pub(crate) async fn maintainerships(
    State(state): State<StubState>,
    Path(namespace): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<String>>, Refusal> {
    let namespace = parse_namespace(&namespace)?;
    let page = state.list_maintainerships(&namespace, query.status()?, query.page())?;
    Ok(Json(page))
}

fn member_action(
    state: &StubState,
    namespace: &str,
    invitee: &str,
    body: &Value,
    action: RelationshipAction,
) -> Result<Json<Relationship>, Refusal> {
    let namespace = parse_namespace(namespace)?;
    let bearer = body_bearer(body)?;
    let row = state.member_transition(&namespace, invitee, &bearer, action)?;
    Ok(Json(row))
}

pub(crate) async fn invite_member(
    State(state): State<StubState>,
    Path((namespace, invitee)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Relationship>, Refusal> {
    member_action(&state, &namespace, &invitee, &body, RelationshipAction::Invite)
}

pub(crate) async fn remove_member(
    State(state): State<StubState>,
    Path((namespace, invitee)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Relationship>, Refusal> {
    member_action(&state, &namespace, &invitee, &body, RelationshipAction::Remove)
}

pub(crate) async fn accept_invite(
    State(state): State<StubState>,
    Path((namespace, invitee)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Relationship>, Refusal> {
    member_action(&state, &namespace, &invitee, &body, RelationshipAction::Accept)
}

pub(crate) async fn decline_invite(
    State(state): State<StubState>,
    Path((namespace, invitee)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Relationship>, Refusal> {
    member_action(&state, &namespace, &invitee, &body, RelationshipAction::Decline)
}
