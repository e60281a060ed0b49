//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the gateway surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gantry Registry API",
        version = "0.3.1",
        description = "Public gateway for the Gantry package registry: namespaces, packages, versions, maintainers, and memberships.",
        license(name = "Apache-2.0")
    ),
    paths(
        // Namespaces
        crate::routes::namespaces::list_namespaces,
        crate::routes::namespaces::list_members,
        crate::routes::namespaces::invite_member,
        crate::routes::namespaces::remove_member,
        crate::routes::namespaces::accept_invite,
        crate::routes::namespaces::decline_invite,
        crate::routes::namespaces::list_maintainerships,
        crate::routes::namespaces::list_pending_maintainerships,
        // Maintainers
        crate::routes::maintainers::list_maintainers,
        crate::routes::maintainers::invite_maintainer,
        crate::routes::maintainers::remove_maintainer,
        crate::routes::maintainers::accept_invitation,
        crate::routes::maintainers::decline_invitation,
        // Packages
        crate::routes::packages::list_packages,
        crate::routes::packages::get_package,
        crate::routes::packages::put_package,
        crate::routes::packages::delete_package,
        crate::routes::packages::get_version,
        crate::routes::packages::publish_version,
        crate::routes::packages::yank_version,
        crate::routes::packages::get_object,
        // Users
        crate::routes::users::list_memberships,
        crate::routes::users::list_pending_memberships,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::envelope::Message,
        crate::envelope::PageEnvelope,
        crate::routes::packages::PackageUpdateRequest,
    )),
    tags(
        (name = "namespaces", description = "Namespace listings and membership management"),
        (name = "packages", description = "Package documents, versions, and content-addressed objects"),
        (name = "maintainers", description = "Package maintainer management"),
        (name = "users", description = "User membership listings"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router, serving the document at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
