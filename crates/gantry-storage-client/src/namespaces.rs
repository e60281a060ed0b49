//! Namespace resource family: listings, members, and the namespace side of
//! maintainerships.
//!
//! Relationship mutations return the updated relationship snapshot; refusals
//! surface as `StorageError::Remote` with a `member.invite.*` code.

use gantry_core::{Namespace, Relationship, RelationshipStatus, UserName};
use reqwest::Method;
use serde_json::json;

use crate::error::StorageError;
use crate::transport::{Payload, Transport};
use crate::types::{Page, RequestId};

/// Client for namespace listings and member relationships.
#[derive(Debug, Clone)]
pub struct NamespaceClient {
    transport: Transport,
}

impl NamespaceClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// List namespace names, one window at a time.
    pub async fn list(
        &self,
        request_id: &RequestId,
        page: u32,
    ) -> Result<Page<String>, StorageError> {
        self.transport
            .json(
                request_id,
                Method::GET,
                &format!("/v1/namespaces?page={page}"),
                &[],
                Payload::None,
            )
            .await
    }

    /// List the members of a namespace holding the given status.
    pub async fn members(
        &self,
        request_id: &RequestId,
        namespace: &Namespace,
        status: RelationshipStatus,
        page: u32,
    ) -> Result<Page<String>, StorageError> {
        self.transport
            .json(
                request_id,
                Method::GET,
                &format!(
                    "/v1/namespaces/namespace/{namespace}/members?status={}&page={page}",
                    status.as_str()
                ),
                &[],
                Payload::None,
            )
            .await
    }

    /// Invite a user to become a member of a namespace.
    pub async fn invite_member(
        &self,
        request_id: &RequestId,
        namespace: &Namespace,
        invitee: &str,
        bearer: &UserName,
    ) -> Result<Relationship, StorageError> {
        self.transport
            .json(
                request_id,
                Method::POST,
                &format!("/v1/namespaces/namespace/{namespace}/members/{invitee}"),
                &[],
                Payload::Json(json!({ "bearer": bearer.as_str() })),
            )
            .await
    }

    /// Remove a member (or withdraw a pending invitation).
    pub async fn remove_member(
        &self,
        request_id: &RequestId,
        namespace: &Namespace,
        invitee: &str,
        bearer: &UserName,
    ) -> Result<Relationship, StorageError> {
        self.transport
            .json(
                request_id,
                Method::DELETE,
                &format!("/v1/namespaces/namespace/{namespace}/members/{invitee}"),
                &[],
                Payload::Json(json!({ "bearer": bearer.as_str() })),
            )
            .await
    }

    /// Accept a pending membership invitation. Only the invitee may accept.
    pub async fn accept_member_invite(
        &self,
        request_id: &RequestId,
        namespace: &Namespace,
        invitee: &str,
        bearer: &UserName,
    ) -> Result<Relationship, StorageError> {
        self.transport
            .json(
                request_id,
                Method::POST,
                &format!("/v1/namespaces/namespace/{namespace}/members/{invitee}/invitation"),
                &[],
                Payload::Json(json!({ "bearer": bearer.as_str() })),
            )
            .await
    }

    /// Decline a pending membership invitation.
    pub async fn decline_member_invite(
        &self,
        request_id: &RequestId,
        namespace: &Namespace,
        invitee: &str,
        bearer: &UserName,
    ) -> Result<Relationship, StorageError> {
        self.transport
            .json(
                request_id,
                Method::DELETE,
                &format!("/v1/namespaces/namespace/{namespace}/members/{invitee}/invitation"),
                &[],
                Payload::Json(json!({ "bearer": bearer.as_str() })),
            )
            .await
    }

    /// List the packages a namespace maintains with the given status.
    pub async fn maintainerships(
        &self,
        request_id: &RequestId,
        namespace: &Namespace,
        status: RelationshipStatus,
        page: u32,
    ) -> Result<Page<String>, StorageError> {
        self.transport
            .json(
                request_id,
                Method::GET,
                &format!(
                    "/v1/namespaces/namespace/{namespace}/maintainerships?status={}&page={page}",
                    status.as_str()
                ),
                &[],
                Payload::None,
            )
            .await
    }
}
