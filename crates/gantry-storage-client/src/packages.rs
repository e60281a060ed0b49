//! Package resource family: package documents, versions, maintainer
//! relationships, and content-addressed objects.
//!
//! Package and version documents are passed through as raw JSON — the
//! gateway relays them without interpreting their shape. Maintainer
//! mutations return the updated relationship snapshot; refusals surface as
//! `StorageError::Remote` with a `maintainer.invite.*` code.

use gantry_core::{ObjectRef, PackageRef, Relationship, RelationshipStatus, UserName, Version};
use reqwest::Method;
use serde_json::json;

use crate::error::StorageError;
use crate::transport::{Payload, Transport};
use crate::types::{Page, RequestId};

/// Client for package documents, versions, maintainers, and objects.
#[derive(Debug, Clone)]
pub struct PackageClient {
    transport: Transport,
}

impl PackageClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// List package specs (`name@host/package`), one window at a time.
    pub async fn list(
        &self,
        request_id: &RequestId,
        page: u32,
    ) -> Result<Page<String>, StorageError> {
        self.transport
            .json(
                request_id,
                Method::GET,
                &format!("/v1/packages?page={page}"),
                &[],
                Payload::None,
            )
            .await
    }

    /// Fetch a package document.
    ///
    /// A package that exists but has not finished syncing its first version
    /// is reported as a remote failure with code `package.syncing`.
    pub async fn get(
        &self,
        request_id: &RequestId,
        package: &PackageRef,
    ) -> Result<serde_json::Value, StorageError> {
        self.transport
            .json(
                request_id,
                Method::GET,
                &format!(
                    "/v1/packages/package/{}/{}",
                    package.namespace(),
                    package.name()
                ),
                &[],
                Payload::None,
            )
            .await
    }

    /// Create or replace a package document.
    pub async fn replace(
        &self,
        request_id: &RequestId,
        package: &PackageRef,
        require_tfa: Option<bool>,
        bearer: &UserName,
    ) -> Result<serde_json::Value, StorageError> {
        let mut body = json!({ "bearer": bearer.as_str() });
        if let Some(require_tfa) = require_tfa {
            body["require_tfa"] = json!(require_tfa);
        }
        self.transport
            .json(
                request_id,
                Method::PUT,
                &format!(
                    "/v1/packages/package/{}/{}",
                    package.namespace(),
                    package.name()
                ),
                &[],
                Payload::Json(body),
            )
            .await
    }

    /// Delete a package.
    pub async fn delete(
        &self,
        request_id: &RequestId,
        package: &PackageRef,
        bearer: &UserName,
    ) -> Result<(), StorageError> {
        self.transport
            .send(
                request_id,
                Method::DELETE,
                &format!(
                    "/v1/packages/package/{}/{}",
                    package.namespace(),
                    package.name()
                ),
                &[],
                Payload::Json(json!({ "bearer": bearer.as_str() })),
            )
            .await
            .map(drop)
    }

    /// List a package's maintaining namespaces with the given status.
    pub async fn maintainers(
        &self,
        request_id: &RequestId,
        package: &PackageRef,
        status: RelationshipStatus,
        page: u32,
    ) -> Result<Page<String>, StorageError> {
        self.transport
            .json(
                request_id,
                Method::GET,
                &format!(
                    "/v1/packages/package/{}/{}/maintainers?status={}&page={page}",
                    package.namespace(),
                    package.name(),
                    status.as_str()
                ),
                &[],
                Payload::None,
            )
            .await
    }

    /// Invite a namespace to maintain a package.
    pub async fn invite_maintainer(
        &self,
        request_id: &RequestId,
        package: &PackageRef,
        invitee: &str,
        bearer: &UserName,
    ) -> Result<Relationship, StorageError> {
        self.transport
            .json(
                request_id,
                Method::POST,
                &format!(
                    "/v1/packages/package/{}/{}/maintainers/{invitee}",
                    package.namespace(),
                    package.name()
                ),
                &[],
                Payload::Json(json!({ "bearer": bearer.as_str() })),
            )
            .await
    }

    /// Remove a maintaining namespace (or withdraw a pending invitation).
    pub async fn remove_maintainer(
        &self,
        request_id: &RequestId,
        package: &PackageRef,
        invitee: &str,
        bearer: &UserName,
    ) -> Result<Relationship, StorageError> {
        self.transport
            .json(
                request_id,
                Method::DELETE,
                &format!(
                    "/v1/packages/package/{}/{}/maintainers/{invitee}",
                    package.namespace(),
                    package.name()
                ),
                &[],
                Payload::Json(json!({ "bearer": bearer.as_str() })),
            )
            .await
    }

    /// Accept a pending maintainer invitation on behalf of a namespace.
    pub async fn accept_maintainer_invite(
        &self,
        request_id: &RequestId,
        package: &PackageRef,
        member: &str,
        bearer: &UserName,
    ) -> Result<Relationship, StorageError> {
        self.transport
            .json(
                request_id,
                Method::POST,
                &format!(
                    "/v1/packages/package/{}/{}/maintainers/{member}/invitation",
                    package.namespace(),
                    package.name()
                ),
                &[],
                Payload::Json(json!({ "bearer": bearer.as_str() })),
            )
            .await
    }

    /// Decline a pending maintainer invitation on behalf of a namespace.
    pub async fn decline_maintainer_invite(
        &self,
        request_id: &RequestId,
        package: &PackageRef,
        member: &str,
        bearer: &UserName,
    ) -> Result<Relationship, StorageError> {
        self.transport
            .json(
                request_id,
                Method::DELETE,
                &format!(
                    "/v1/packages/package/{}/{}/maintainers/{member}/invitation",
                    package.namespace(),
                    package.name()
                ),
                &[],
                Payload::Json(json!({ "bearer": bearer.as_str() })),
            )
            .await
    }

    /// Fetch a version document.
    pub async fn version(
        &self,
        request_id: &RequestId,
        package: &PackageRef,
        version: &Version,
    ) -> Result<serde_json::Value, StorageError> {
        self.transport
            .json(
                request_id,
                Method::GET,
                &format!(
                    "/v1/packages/package/{}/{}/versions/{version}",
                    package.namespace(),
                    package.name()
                ),
                &[],
                Payload::None,
            )
            .await
    }

    /// Publish a version, forwarding the artifact body untouched.
    ///
    /// The artifact occupies the request body, so the bearer travels as a
    /// `bearer` header on this call only. Re-publishing an existing version
    /// is refused with code `version.exists`.
    pub async fn publish_version(
        &self,
        request_id: &RequestId,
        package: &PackageRef,
        version: &Version,
        content_type: &str,
        body: Vec<u8>,
        bearer: &UserName,
    ) -> Result<serde_json::Value, StorageError> {
        self.transport
            .json(
                request_id,
                Method::PUT,
                &format!(
                    "/v1/packages/package/{}/{}/versions/{version}",
                    package.namespace(),
                    package.name()
                ),
                &[("bearer", bearer.as_str().to_string())],
                Payload::Raw(content_type.to_string(), body),
            )
            .await
    }

    /// Yank a published version.
    pub async fn yank_version(
        &self,
        request_id: &RequestId,
        package: &PackageRef,
        version: &Version,
        bearer: &UserName,
    ) -> Result<(), StorageError> {
        self.transport
            .send(
                request_id,
                Method::DELETE,
                &format!(
                    "/v1/packages/package/{}/{}/versions/{version}",
                    package.namespace(),
                    package.name()
                ),
                &[],
                Payload::Json(json!({ "bearer": bearer.as_str() })),
            )
            .await
            .map(drop)
    }

    /// Fetch a content-addressed object as a raw response for passthrough.
    pub async fn object(
        &self,
        request_id: &RequestId,
        object: &ObjectRef,
    ) -> Result<reqwest::Response, StorageError> {
        self.transport
            .send(
                request_id,
                Method::GET,
                &format!(
                    "/v1/objects/object/{}/{}",
                    object.algorithm(),
                    object.digest()
                ),
                &[],
                Payload::None,
            )
            .await
    }
}
