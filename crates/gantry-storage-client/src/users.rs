//! User resource family: membership listings, token resolution, and token
//! management.
//!
//! Token routes authenticate differently from relationship mutations: the
//! token being resolved travels in a `token` header, and management calls
//! name their acting user in a `bearer` header.

use gantry_core::{RelationshipStatus, UserName};
use reqwest::Method;
use serde_json::json;

use crate::error::StorageError;
use crate::transport::{Payload, Transport};
use crate::types::{AuthenticatedUser, Page, RemovedTokens, RequestId, TokenDescription, TokenGrant};

/// Client for users, their memberships, and their tokens.
#[derive(Debug, Clone)]
pub struct UserClient {
    transport: Transport,
}

/// Wire shape of a token resolution: the user document arrives wrapped.
#[derive(Debug, serde::Deserialize)]
struct UserEnvelope {
    user: AuthenticatedUser,
}

impl UserClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// List the namespaces a user belongs to with the given status.
    pub async fn memberships(
        &self,
        request_id: &RequestId,
        user: &UserName,
        status: RelationshipStatus,
        page: u32,
    ) -> Result<Page<String>, StorageError> {
        self.transport
            .json(
                request_id,
                Method::GET,
                &format!(
                    "/v1/users/user/{user}/memberships?status={}&page={page}",
                    status.as_str()
                ),
                &[],
                Payload::None,
            )
            .await
    }

    /// Resolve a bearer token to the user who owns it.
    ///
    /// The storage service refuses an empty token with 400 and an unknown
    /// one with 401 (carrying `www-authenticate: Bearer`).
    pub async fn by_token(
        &self,
        request_id: &RequestId,
        token: &str,
    ) -> Result<AuthenticatedUser, StorageError> {
        let envelope: UserEnvelope = self
            .transport
            .json(
                request_id,
                Method::GET,
                "/v1/users/token",
                &[("token", token.to_string())],
                Payload::None,
            )
            .await?;
        Ok(envelope.user)
    }

    /// List a user's tokens. Values are never included, only hashes.
    pub async fn tokens(
        &self,
        request_id: &RequestId,
        bearer: &UserName,
        page: u32,
    ) -> Result<Page<TokenDescription>, StorageError> {
        self.transport
            .json(
                request_id,
                Method::GET,
                &format!("/v1/users/tokens?page={page}"),
                &[("bearer", bearer.as_str().to_string())],
                Payload::None,
            )
            .await
    }

    /// Mint a token for the bearer. The cleartext value appears only in
    /// this response.
    pub async fn create_token(
        &self,
        request_id: &RequestId,
        bearer: &UserName,
        description: &str,
    ) -> Result<TokenGrant, StorageError> {
        self.transport
            .json(
                request_id,
                Method::POST,
                "/v1/users/tokens",
                &[("bearer", bearer.as_str().to_string())],
                Payload::Json(json!({ "description": description })),
            )
            .await
    }

    /// Delete tokens by value hash. Multiple hashes are `;`-joined into a
    /// single path segment; the response counts how many actually matched.
    pub async fn delete_tokens(
        &self,
        request_id: &RequestId,
        bearer: &UserName,
        value_hashes: &[String],
    ) -> Result<RemovedTokens, StorageError> {
        self.transport
            .json(
                request_id,
                Method::DELETE,
                &format!("/v1/users/tokens/token/{}", value_hashes.join(";")),
                &[("bearer", bearer.as_str().to_string())],
                Payload::None,
            )
            .await
    }
}
