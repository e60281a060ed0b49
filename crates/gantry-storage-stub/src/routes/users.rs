//! User listings and token routes.
//!
//! Token routes carry the acting user in a `bearer` header rather than
//! the body: resolution has no body at all, and the token value itself
//! never appears in a path.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use gantry_storage_client::{Page, RemovedTokens, TokenDescription, TokenGrant};
use serde_json::{json, Value};

use crate::routes::{header_bearer, ListQuery};
use crate::store::{Refusal, StubState};

pub(crate) async fn memberships(
    State(state): State<StubState>,
    Path(user): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<String>>, Refusal> {
    let page = state.list_memberships(&user, query.status()?, query.page())?;
    Ok(Json(page))
}

/// Resolve a `token` header to its owner, wrapped in a `user` envelope.
///
/// An unknown token answers 401 with a `www-authenticate` challenge so
/// callers know a fresh login is required rather than a retry.
pub(crate) async fn resolve_token(
    State(state): State<StubState>,
    headers: HeaderMap,
) -> Response {
    let value = headers
        .get("token")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());
    let Some(value) = value else {
        return Refusal::new(StatusCode::BAD_REQUEST, "token.required", "Must provide token")
            .into_response();
    };
    match state.resolve_token(value) {
        Ok(user) => Json(json!({ "user": user })).into_response(),
        Err(refusal) => {
            let mut response = refusal.into_response();
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
            response
        }
    }
}

pub(crate) async fn list_tokens(
    State(state): State<StubState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<TokenDescription>>, Refusal> {
    let bearer = header_bearer(&headers)?;
    Ok(Json(state.list_tokens(&bearer, query.page())?))
}

pub(crate) async fn create_token(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<TokenGrant>), Refusal> {
    let bearer = header_bearer(&headers)?;
    let description = body
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    let grant = state.create_token(&bearer, description)?;
    Ok((StatusCode::CREATED, Json(grant)))
}

pub(crate) async fn delete_tokens(
    State(state): State<StubState>,
    Path(hashes): Path<String>,
    headers: HeaderMap,
) -> Result<Json<RemovedTokens>, Refusal> {
    let bearer = header_bearer(&headers)?;
    Ok(Json(state.delete_tokens(&bearer, &hashes)))
}
