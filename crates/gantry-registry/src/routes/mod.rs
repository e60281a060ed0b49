//! # API Route Modules
//!
//! Route modules for the gateway surface, grouped by resource family:
//!
//! - `namespaces` — namespace listings, membership management, and the
//!   maintainership listings scoped to a namespace.
//! - `packages` — package documents, versions, and content-addressed
//!   object passthrough.
//! - `maintainers` — maintainer listings and maintainer invitation
//!   management for a package.
//! - `users` — membership listings scoped to a user.
//!
//! Each module exposes a public and/or an authenticated router; `lib.rs`
//! decides which goes behind the bearer middleware.

pub mod maintainers;
pub mod namespaces;
pub mod packages;
pub mod users;

use gantry_core::{Namespace, PackageName, PackageRef};

use crate::error::ApiError;

/// Parse a `name@host` path segment, refusing malformed namespaces before
/// any storage call.
pub(crate) fn parse_namespace(raw: &str) -> Result<Namespace, ApiError> {
    Ok(Namespace::parse(raw)?)
}

/// Parse the `namespace` + `name` path segments into a package reference.
pub(crate) fn parse_package(namespace: &str, name: &str) -> Result<PackageRef, ApiError> {
    let namespace = Namespace::parse(namespace)?;
    let name = PackageName::new(name)?;
    Ok(PackageRef::new(namespace, name))
}
