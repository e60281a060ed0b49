//! # Error Types
//!
//! Structured error types shared across the workspace, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Validation errors carry the rejected input and the expected shape so that
//! operators can diagnose a bad request without guesswork.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
///
/// Each identifier type enforces its format at construction time; a value
/// that exists is a value that parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Namespace does not conform to the `name@host` shape.
    #[error("invalid namespace: \"{0}\" (expected name@host with non-empty name and host)")]
    InvalidNamespace(String),

    /// User name is empty or contains a path separator.
    #[error("invalid user name: \"{0}\" (expected a non-empty name without '/')")]
    InvalidUserName(String),

    /// Package name is empty or contains a path separator.
    #[error("invalid package name: \"{0}\" (expected a non-empty name without '/')")]
    InvalidPackageName(String),

    /// Package coordinates do not conform to `name@host/package`.
    #[error("invalid package spec: \"{0}\" (expected namespace@host/name)")]
    InvalidPackageSpec(String),

    /// Version string is empty or contains a path separator.
    #[error("invalid version: \"{0}\" (expected a non-empty version without '/')")]
    InvalidVersion(String),

    /// Object reference is missing an algorithm or a digest.
    #[error("invalid object reference: \"{0}\" (expected algorithm and digest, both non-empty)")]
    InvalidObjectRef(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_namespace_display_carries_input() {
        let err = ValidationError::InvalidNamespace("no-host".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("no-host"));
        assert!(msg.contains("name@host"));
    }

    #[test]
    fn invalid_user_name_display_carries_input() {
        let err = ValidationError::InvalidUserName("a/b".to_string());
        assert!(format!("{err}").contains("a/b"));
    }

    #[test]
    fn invalid_package_spec_display_carries_expected_shape() {
        let err = ValidationError::InvalidPackageSpec("widget".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("widget"));
        assert!(msg.contains("namespace@host/name"));
    }

    #[test]
    fn all_error_variants_are_debug() {
        let e1 = ValidationError::InvalidVersion(String::new());
        let e2 = ValidationError::InvalidObjectRef("sha512".to_string());
        assert!(!format!("{e1:?}").is_empty());
        assert!(!format!("{e2:?}").is_empty());
    }
}
