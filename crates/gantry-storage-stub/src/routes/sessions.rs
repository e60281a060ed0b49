//! CLI login session routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gantry_storage_client::{CliSession, SessionValue};
use serde_json::Value;

use crate::store::{Refusal, StubState};

pub(crate) async fn create(
    State(state): State<StubState>,
    Json(_body): Json<Value>,
) -> (StatusCode, Json<CliSession>) {
    (StatusCode::CREATED, Json(state.create_session()))
}

pub(crate) async fn fetch(
    State(state): State<StubState>,
    Path(session): Path<String>,
) -> Result<Json<SessionValue>, Refusal> {
    Ok(Json(state.fetch_session(&session)?))
}

pub(crate) async fn resolve(
    State(state): State<StubState>,
    Path(session): Path<String>,
    Json(body): Json<Value>,
) -> Result<StatusCode, Refusal> {
    let value = body
        .get("value")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            Refusal::new(StatusCode::BAD_REQUEST, "value.required", "Must provide value")
        })?;
    state.resolve_session(&session, value.to_string())?;
    Ok(StatusCode::NO_CONTENT)
}
