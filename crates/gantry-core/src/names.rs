//! # Registry Name Newtypes
//!
//! Domain-primitive newtypes for the names that flow through the registry.
//! Each name is a distinct type — you cannot pass a [`UserName`] where a
//! [`Namespace`] is expected.
//!
//! ## Validation
//!
//! All names validate at construction time. A [`Namespace`] splits its
//! canonical `name@host` text at the **last** `@`, so a name may itself
//! contain `@` but a host may not. A [`PackageRef`] splits
//! `name@host/package` at the single `/` separating namespace from package.
//!
//! ## Canonical text
//!
//! Every type here has a canonical string rendering (its `Display` impl)
//! which is also its wire representation: namespaces as `name@host`,
//! packages as `name@host/package`, objects as `algorithm:digest`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Simple string names
// ---------------------------------------------------------------------------

/// A registry user's login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    /// Create a user name, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidUserName`] if the name is empty or
    /// contains `/` or `@`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty() || s.contains('/') || s.contains('@') {
            return Err(ValidationError::InvalidUserName(s));
        }
        Ok(Self(s))
    }

    /// Access the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A package's short name, unique within its namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageName(String);

impl PackageName {
    /// Create a package name, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPackageName`] if the name is empty
    /// or contains `/` or `@`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty() || s.contains('/') || s.contains('@') {
            return Err(ValidationError::InvalidPackageName(s));
        }
        Ok(Self(s))
    }

    /// Access the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A published version string.
///
/// The registry does not interpret version syntax; ordering and range
/// resolution are a client concern. The only structural requirement is
/// that a version can appear as a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version(String);

impl Version {
    /// Create a version, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidVersion`] if the string is empty or
    /// contains `/`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty() || s.contains('/') {
            return Err(ValidationError::InvalidVersion(s));
        }
        Ok(Self(s))
    }

    /// Access the version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Structured names
// ---------------------------------------------------------------------------

/// A namespace: a named group of users homed on a host, canonically written
/// `name@host`.
///
/// Namespaces own packages (via maintainerships) and have users as members
/// (via memberships).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace {
    name: String,
    host: String,
}

impl Namespace {
    /// Create a namespace from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidNamespace`] if either part is empty
    /// or the host contains `@` or `/`, or the name contains `/`.
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let host = host.into();
        if name.is_empty() || name.contains('/') || host.is_empty() || host.contains('@') || host.contains('/') {
            return Err(ValidationError::InvalidNamespace(format!("{name}@{host}")));
        }
        Ok(Self { name, host })
    }

    /// Parse the canonical `name@host` text, splitting at the last `@`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidNamespace`] if there is no `@` or
    /// either side of the split is empty.
    pub fn parse(spec: &str) -> Result<Self, ValidationError> {
        let (name, host) = spec
            .rsplit_once('@')
            .ok_or_else(|| ValidationError::InvalidNamespace(spec.to_string()))?;
        Self::new(name, host)
    }

    /// The namespace's name (left of the `@`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The host the namespace is homed on (right of the `@`).
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.host)
    }
}

impl TryFrom<String> for Namespace {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Namespace> for String {
    fn from(value: Namespace) -> Self {
        value.to_string()
    }
}

/// Fully qualified package coordinates: `name@host/package`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageRef {
    namespace: Namespace,
    name: PackageName,
}

impl PackageRef {
    /// Create package coordinates from a namespace and a package name.
    pub fn new(namespace: Namespace, name: PackageName) -> Self {
        Self { namespace, name }
    }

    /// Parse the canonical `name@host/package` text.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPackageSpec`] if there is no `/`,
    /// and propagates the part errors otherwise.
    pub fn parse(spec: &str) -> Result<Self, ValidationError> {
        let (ns, name) = spec
            .split_once('/')
            .ok_or_else(|| ValidationError::InvalidPackageSpec(spec.to_string()))?;
        Ok(Self {
            namespace: Namespace::parse(ns)?,
            name: PackageName::new(name)?,
        })
    }

    /// The namespace that owns the package.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The package's short name.
    pub fn name(&self) -> &PackageName {
        &self.name
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl TryFrom<String> for PackageRef {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PackageRef> for String {
    fn from(value: PackageRef) -> Self {
        value.to_string()
    }
}

/// A content-addressed object reference: a digest algorithm plus the digest
/// itself, canonically written `algorithm:digest`.
///
/// The digest may contain `/` (it is matched by a wildcard path segment on
/// the wire); the algorithm may not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    algorithm: String,
    digest: String,
}

impl ObjectRef {
    /// Create an object reference, validating that both parts are present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidObjectRef`] if either part is empty
    /// or the algorithm contains `/`.
    pub fn new(
        algorithm: impl Into<String>,
        digest: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let algorithm = algorithm.into();
        let digest = digest.into();
        if algorithm.is_empty() || algorithm.contains('/') || digest.is_empty() {
            return Err(ValidationError::InvalidObjectRef(format!(
                "{algorithm}:{digest}"
            )));
        }
        Ok(Self { algorithm, digest })
    }

    /// The digest algorithm, e.g. `sha512`.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// The digest text.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- UserName ----------------------------------------------------------

    #[test]
    fn user_name_accepts_plain_names() {
        let name = UserName::new("chris").unwrap();
        assert_eq!(name.as_str(), "chris");
        assert_eq!(name.to_string(), "chris");
    }

    #[test]
    fn user_name_rejects_empty() {
        assert!(UserName::new("").is_err());
    }

    #[test]
    fn user_name_rejects_separators() {
        assert!(UserName::new("a/b").is_err());
        assert!(UserName::new("a@b").is_err());
    }

    // -- Namespace ---------------------------------------------------------

    #[test]
    fn namespace_parses_canonical_text() {
        let ns = Namespace::parse("acme@github").unwrap();
        assert_eq!(ns.name(), "acme");
        assert_eq!(ns.host(), "github");
        assert_eq!(ns.to_string(), "acme@github");
    }

    #[test]
    fn namespace_splits_at_last_at_sign() {
        let ns = Namespace::parse("weird@name@host").unwrap();
        assert_eq!(ns.name(), "weird@name");
        assert_eq!(ns.host(), "host");
    }

    #[test]
    fn namespace_rejects_missing_host() {
        assert!(Namespace::parse("acme").is_err());
        assert!(Namespace::parse("acme@").is_err());
    }

    #[test]
    fn namespace_rejects_missing_name() {
        assert!(Namespace::parse("@github").is_err());
    }

    #[test]
    fn namespace_serde_round_trips_as_string() {
        let ns = Namespace::parse("acme@github").unwrap();
        let json = serde_json::to_string(&ns).unwrap();
        assert_eq!(json, "\"acme@github\"");
        let back: Namespace = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ns);
    }

    #[test]
    fn namespace_deserialization_validates() {
        let result: Result<Namespace, _> = serde_json::from_str("\"nohost\"");
        assert!(result.is_err());
    }

    // -- PackageRef --------------------------------------------------------

    #[test]
    fn package_ref_parses_canonical_text() {
        let pkg = PackageRef::parse("acme@github/widget").unwrap();
        assert_eq!(pkg.namespace().to_string(), "acme@github");
        assert_eq!(pkg.name().as_str(), "widget");
        assert_eq!(pkg.to_string(), "acme@github/widget");
    }

    #[test]
    fn package_ref_rejects_missing_separator() {
        assert!(PackageRef::parse("widget").is_err());
    }

    #[test]
    fn package_ref_rejects_bad_namespace() {
        assert!(PackageRef::parse("acme/widget").is_err());
    }

    #[test]
    fn package_ref_serde_round_trips_as_string() {
        let pkg = PackageRef::parse("acme@github/widget").unwrap();
        let json = serde_json::to_string(&pkg).unwrap();
        assert_eq!(json, "\"acme@github/widget\"");
        let back: PackageRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pkg);
    }

    // -- Version -----------------------------------------------------------

    #[test]
    fn version_accepts_arbitrary_segments() {
        assert!(Version::new("1.0.0").is_ok());
        assert!(Version::new("2.0.0-beta.1").is_ok());
    }

    #[test]
    fn version_rejects_empty_and_slashes() {
        assert!(Version::new("").is_err());
        assert!(Version::new("1/2").is_err());
    }

    // -- ObjectRef ---------------------------------------------------------

    #[test]
    fn object_ref_keeps_both_parts() {
        let obj = ObjectRef::new("sha512", "abc123").unwrap();
        assert_eq!(obj.algorithm(), "sha512");
        assert_eq!(obj.digest(), "abc123");
        assert_eq!(obj.to_string(), "sha512:abc123");
    }

    #[test]
    fn object_ref_digest_may_contain_slashes() {
        let obj = ObjectRef::new("sha512", "ab/cd").unwrap();
        assert_eq!(obj.digest(), "ab/cd");
    }

    #[test]
    fn object_ref_rejects_empty_parts() {
        assert!(ObjectRef::new("", "abc").is_err());
        assert!(ObjectRef::new("sha512", "").is_err());
    }
}
