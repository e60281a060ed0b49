//! # In-Memory Storage Tables
//!
//! One `DashMap` per resource family, shared behind an `Arc`. Every domain
//! decision the storage side owns lives here: relationship transitions
//! (applied under the pair's entry lock, so racing mutations serialize and
//! the loser sees the winner's state), authorization checks, probe-window
//! listings, and the sorted ordering that keeps page numbers stable.
//!
//! Refusals carry the wire status plus the `{message, code}` body. The
//! machine codes for relationship operations come from
//! [`RelationshipKind::denial_code`]; everything else uses this module's
//! literals.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use gantry_core::{
    Denial, Maintainership, Membership, Namespace, PackageRef, PageWindow, Relationship,
    RelationshipAction, RelationshipKind, RelationshipStatus, UserName, Version,
    DEFAULT_PAGE_SIZE,
};
use gantry_storage_client::{
    AuthenticatedUser, CliSession, Page, RemovedTokens, SessionValue, TokenDescription, TokenGrant,
};
use serde_json::{json, Value};
use sha2::{Digest, Sha512};
use uuid::Uuid;

/// Code put on the wire while a package has no synced version yet.
pub const SYNCING_CODE: &str = "package.syncing";

// ── Configuration ────────────────────────────────────────────────────

/// Stub configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct StubConfig {
    /// TCP port the stub listens on.
    pub port: u16,
    /// Items per page for listings; the probe window fetches one more.
    pub per_page: usize,
    /// Host assumed for bare namespace names in maintainer invitations.
    pub default_host: String,
}

impl StubConfig {
    /// Read configuration from the environment.
    ///
    /// `GANTRY_STUB_PORT` defaults to 3002, `PER_PAGE` to
    /// [`DEFAULT_PAGE_SIZE`], and `GANTRY_STUB_HOST` to `localhost`;
    /// malformed numeric values fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("GANTRY_STUB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3002),
            per_page: std::env::var("PER_PAGE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PAGE_SIZE),
            default_host: std::env::var("GANTRY_STUB_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
        }
    }
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            port: 3002,
            per_page: DEFAULT_PAGE_SIZE,
            default_host: "localhost".to_string(),
        }
    }
}

// ── Refusals ─────────────────────────────────────────────────────────

/// A refused operation: the wire status plus the `{message, code}` body.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{code}: {message}")]
pub struct Refusal {
    /// HTTP status put on the wire.
    pub status: StatusCode,
    /// Machine-readable refusal code.
    pub code: &'static str,
    /// Human-readable detail. The gateway rewrites it for relationship
    /// operations and relays it everywhere else.
    pub message: String,
}

impl Refusal {
    /// Assemble a refusal from its parts.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for Refusal {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "message": self.message, "code": self.code })),
        )
            .into_response()
    }
}

/// Wire status and kind-specific code for a relationship denial.
fn denial_refusal<K: RelationshipKind>(denial: Denial, message: String) -> Refusal {
    let status = match denial {
        Denial::AlreadyActive | Denial::AlreadyPending | Denial::AlreadyDeclined => {
            StatusCode::CONFLICT
        }
        Denial::BearerUnauthorized => StatusCode::FORBIDDEN,
        Denial::InviteMissing
        | Denial::NotRelated
        | Denial::InviteeMissing
        | Denial::TargetMissing => StatusCode::NOT_FOUND,
    };
    Refusal::new(status, K::denial_code(denial), message)
}

fn unknown_user(name: &str) -> Refusal {
    Refusal::new(
        StatusCode::NOT_FOUND,
        "user.dne",
        format!("No such user \"{name}\"."),
    )
}

fn unknown_namespace(spec: &str) -> Refusal {
    Refusal::new(
        StatusCode::NOT_FOUND,
        "namespace.dne",
        format!("No such namespace \"{spec}\"."),
    )
}

fn unknown_package(spec: &str) -> Refusal {
    Refusal::new(
        StatusCode::NOT_FOUND,
        "package.dne",
        format!("No such package \"{spec}\"."),
    )
}

fn unknown_version(package: &str, version: &str) -> Refusal {
    Refusal::new(
        StatusCode::NOT_FOUND,
        "version.dne",
        format!("No version \"{version}\" of \"{package}\"."),
    )
}

fn unknown_session(session: &str) -> Refusal {
    Refusal::new(
        StatusCode::NOT_FOUND,
        "session.dne",
        format!("No such session \"{session}\"."),
    )
}

fn unauthorized_package(bearer: &UserName, spec: &str) -> Refusal {
    Refusal::new(
        StatusCode::FORBIDDEN,
        "package.unauthorized",
        format!("\"{bearer}\" may not administer \"{spec}\"."),
    )
}

/// Lowercase hex SHA-512 digest.
fn hex_digest(bytes: &[u8]) -> String {
    Sha512::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

// ── Records ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct UserRecord {
    email: Option<String>,
}

#[derive(Debug, Clone)]
struct PackageRecord {
    require_tfa: bool,
    abandoned: bool,
    syncing: bool,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl PackageRecord {
    fn document(&self, package: &PackageRef) -> Value {
        json!({
            "namespace": package.namespace().to_string(),
            "name": package.name().as_str(),
            "require_tfa": self.require_tfa,
            "abandoned": self.abandoned,
            "syncing": self.syncing,
            "created": self.created,
            "updated": self.updated,
        })
    }
}

#[derive(Debug, Clone)]
struct VersionRecord {
    content_type: String,
    size: usize,
    object: String,
    yanked: bool,
    created: DateTime<Utc>,
}

impl VersionRecord {
    fn document(&self, package: &PackageRef, version: &Version) -> Value {
        json!({
            "package": package.to_string(),
            "version": version.as_str(),
            "content_type": self.content_type,
            "size": self.size,
            "object": self.object,
            "yanked": self.yanked,
            "created": self.created,
        })
    }
}

#[derive(Debug, Clone)]
struct TokenRecord {
    user: UserName,
    description: String,
    created: DateTime<Utc>,
}

/// The tables, one per resource family. Relationship keys pair the two
/// sides: memberships as `(user, namespace)`, maintainerships as
/// `(namespace, package)`. Session values are `None` until resolved.
struct Inner {
    per_page: usize,
    default_host: String,
    users: DashMap<String, UserRecord>,
    namespaces: DashSet<String>,
    packages: DashMap<String, PackageRecord>,
    versions: DashMap<(String, String), VersionRecord>,
    memberships: DashMap<(String, String), Relationship>,
    maintainerships: DashMap<(String, String), Relationship>,
    tokens: DashMap<String, TokenRecord>,
    sessions: DashMap<String, Option<String>>,
    objects: DashMap<String, Vec<u8>>,
}

/// Shared stub state. Cheaply cloneable via `Arc` — all clones share the
/// same tables.
#[derive(Clone)]
pub struct StubState {
    inner: Arc<Inner>,
}

/// Apply one lifecycle action under the pair's entry lock.
fn transition<K: RelationshipKind>(
    table: &DashMap<(String, String), Relationship>,
    key: (String, String),
    action: RelationshipAction,
    bearer: &UserName,
) -> Result<Relationship, Refusal> {
    let now = Utc::now();
    match table.entry(key) {
        Entry::Occupied(mut occupied) => {
            let current = occupied.get().status;
            let next = RelationshipStatus::apply(Some(current), action)
                .map_err(|err| denial_refusal::<K>(err.denial(), err.to_string()))?;
            let row = occupied.get_mut();
            row.status = next;
            row.updated = now;
            if action == RelationshipAction::Invite {
                row.invited_by = bearer.clone();
            }
            Ok(row.clone())
        }
        Entry::Vacant(vacant) => {
            let next = RelationshipStatus::apply(None, action)
                .map_err(|err| denial_refusal::<K>(err.denial(), err.to_string()))?;
            let row = Relationship {
                status: next,
                invited_by: bearer.clone(),
                created: now,
                updated: now,
            };
            vacant.insert(row.clone());
            Ok(row)
        }
    }
}

impl StubState {
    /// Create empty tables.
    pub fn new(config: &StubConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                per_page: config.per_page,
                default_host: config.default_host.clone(),
                users: DashMap::new(),
                namespaces: DashSet::new(),
                packages: DashMap::new(),
                versions: DashMap::new(),
                memberships: DashMap::new(),
                maintainerships: DashMap::new(),
                tokens: DashMap::new(),
                sessions: DashMap::new(),
                objects: DashMap::new(),
            }),
        }
    }

    // ── Seeding ──────────────────────────────────────────────────

    /// Seed a user together with a personal namespace on the default host
    /// and an active membership in it.
    pub fn seed_user(&self, user: &UserName, email: Option<&str>) {
        self.inner.users.insert(
            user.as_str().to_string(),
            UserRecord {
                email: email.map(str::to_string),
            },
        );
        let personal = format!("{}@{}", user, self.inner.default_host);
        self.inner.namespaces.insert(personal.clone());
        self.activate_membership(user, &personal, user);
    }

    /// Seed a namespace with one active member.
    pub fn seed_namespace(&self, namespace: &Namespace, owner: &UserName) {
        self.inner.namespaces.insert(namespace.to_string());
        self.activate_membership(owner, &namespace.to_string(), owner);
    }

    /// Seed a still-syncing package actively maintained by one namespace.
    pub fn seed_package(&self, package: &PackageRef, maintainer: &Namespace, creator: &UserName) {
        let now = Utc::now();
        self.inner.packages.insert(
            package.to_string(),
            PackageRecord {
                require_tfa: false,
                abandoned: false,
                syncing: true,
                created: now,
                updated: now,
            },
        );
        self.inner.maintainerships.insert(
            (maintainer.to_string(), package.to_string()),
            Relationship {
                status: RelationshipStatus::Active,
                invited_by: creator.clone(),
                created: now,
                updated: now,
            },
        );
    }

    fn activate_membership(&self, user: &UserName, namespace: &str, inviter: &UserName) {
        let now = Utc::now();
        self.inner.memberships.insert(
            (user.as_str().to_string(), namespace.to_string()),
            Relationship {
                status: RelationshipStatus::Active,
                invited_by: inviter.clone(),
                created: now,
                updated: now,
            },
        );
    }

    // ── Authorization ────────────────────────────────────────────

    fn is_active_member(&self, user: &str, namespace: &str) -> bool {
        self.inner
            .memberships
            .get(&(user.to_string(), namespace.to_string()))
            .map(|row| row.status == RelationshipStatus::Active)
            .unwrap_or(false)
    }

    /// Whether the bearer is an active member of any namespace actively
    /// maintaining the package.
    fn may_administer(&self, bearer: &str, package: &str) -> bool {
        self.inner.maintainerships.iter().any(|row| {
            row.key().1 == package
                && row.value().status == RelationshipStatus::Active
                && self.is_active_member(bearer, &row.key().0)
        })
    }

    // ── Members ──────────────────────────────────────────────────

    /// Drive a membership through one lifecycle action.
    ///
    /// Inviting needs an active member as bearer; removal additionally
    /// allows the invitee to remove themself; accepting and declining are
    /// the invitee's alone.
    pub fn member_transition(
        &self,
        namespace: &Namespace,
        invitee: &str,
        bearer: &UserName,
        action: RelationshipAction,
    ) -> Result<Relationship, Refusal> {
        let ns = namespace.to_string();
        if !self.inner.namespaces.contains(&ns) {
            return Err(denial_refusal::<Membership>(
                Denial::TargetMissing,
                format!("No such namespace \"{ns}\"."),
            ));
        }
        if !self.inner.users.contains_key(invitee) {
            return Err(denial_refusal::<Membership>(
                Denial::InviteeMissing,
                format!("No such user \"{invitee}\"."),
            ));
        }
        let authorized = match action {
            RelationshipAction::Invite => self.is_active_member(bearer.as_str(), &ns),
            RelationshipAction::Remove => {
                bearer.as_str() == invitee || self.is_active_member(bearer.as_str(), &ns)
            }
            RelationshipAction::Accept | RelationshipAction::Decline => bearer.as_str() == invitee,
        };
        if !authorized {
            return Err(denial_refusal::<Membership>(
                Denial::BearerUnauthorized,
                format!("\"{bearer}\" may not {action} members of \"{ns}\"."),
            ));
        }
        transition::<Membership>(
            &self.inner.memberships,
            (invitee.to_string(), ns),
            action,
            bearer,
        )
    }

    // ── Maintainers ──────────────────────────────────────────────

    /// Resolve a maintainer invitee to a namespace: a bare name is homed
    /// on the configured default host.
    pub fn resolve_invitee(&self, invitee: &str) -> Result<Namespace, Refusal> {
        let parsed = if invitee.contains('@') {
            Namespace::parse(invitee)
        } else {
            Namespace::new(invitee, &self.inner.default_host)
        };
        parsed.map_err(|err| {
            Refusal::new(StatusCode::BAD_REQUEST, "namespace.invalid", err.to_string())
        })
    }

    /// Drive a maintainership through one lifecycle action.
    ///
    /// Inviting and removing need the bearer actively inside a namespace
    /// that actively maintains the package (removal also allows members of
    /// the invitee namespace itself); accepting and declining need the
    /// bearer actively inside the invitee namespace.
    pub fn maintainer_transition(
        &self,
        package: &PackageRef,
        invitee: &str,
        bearer: &UserName,
        action: RelationshipAction,
    ) -> Result<Relationship, Refusal> {
        let pkg = package.to_string();
        if !self.inner.packages.contains_key(&pkg) {
            return Err(denial_refusal::<Maintainership>(
                Denial::TargetMissing,
                format!("No such package \"{pkg}\"."),
            ));
        }
        let invitee_ns = self.resolve_invitee(invitee)?.to_string();
        if !self.inner.namespaces.contains(&invitee_ns) {
            return Err(denial_refusal::<Maintainership>(
                Denial::InviteeMissing,
                format!("No such namespace \"{invitee_ns}\"."),
            ));
        }
        let authorized = match action {
            RelationshipAction::Invite => self.may_administer(bearer.as_str(), &pkg),
            RelationshipAction::Remove => {
                self.may_administer(bearer.as_str(), &pkg)
                    || self.is_active_member(bearer.as_str(), &invitee_ns)
            }
            RelationshipAction::Accept | RelationshipAction::Decline => {
                self.is_active_member(bearer.as_str(), &invitee_ns)
            }
        };
        if !authorized {
            return Err(denial_refusal::<Maintainership>(
                Denial::BearerUnauthorized,
                format!("\"{bearer}\" may not {action} maintainers of \"{pkg}\"."),
            ));
        }
        transition::<Maintainership>(
            &self.inner.maintainerships,
            (invitee_ns, pkg),
            action,
            bearer,
        )
    }

    // ── Listings ─────────────────────────────────────────────────

    /// Window a sorted result set, keeping the probe item for the caller
    /// to trim.
    fn window<T>(&self, sorted: Vec<T>, page: u32) -> Page<T> {
        let window = PageWindow::new(page, self.inner.per_page);
        let total = sorted.len() as u64;
        let objects: Vec<T> = sorted
            .into_iter()
            .skip(window.start())
            .take(window.size() + 1)
            .collect();
        Page {
            next: window.has_next(objects.len()),
            prev: window.has_prev(),
            total,
            objects,
        }
    }

    /// All namespace specs, sorted.
    pub fn list_namespaces(&self, page: u32) -> Page<String> {
        let mut all: Vec<String> = self
            .inner
            .namespaces
            .iter()
            .map(|ns| ns.key().clone())
            .collect();
        all.sort();
        self.window(all, page)
    }

    /// User names holding a membership of the given status in a namespace.
    pub fn list_members(
        &self,
        namespace: &Namespace,
        status: RelationshipStatus,
        page: u32,
    ) -> Result<Page<String>, Refusal> {
        let ns = namespace.to_string();
        if !self.inner.namespaces.contains(&ns) {
            return Err(unknown_namespace(&ns));
        }
        let mut members: Vec<String> = self
            .inner
            .memberships
            .iter()
            .filter(|row| row.key().1 == ns && row.value().status == status)
            .map(|row| row.key().0.clone())
            .collect();
        members.sort();
        Ok(self.window(members, page))
    }

    /// Namespace specs a user holds a membership of the given status in.
    pub fn list_memberships(
        &self,
        user: &str,
        status: RelationshipStatus,
        page: u32,
    ) -> Result<Page<String>, Refusal> {
        if !self.inner.users.contains_key(user) {
            return Err(unknown_user(user));
        }
        let mut namespaces: Vec<String> = self
            .inner
            .memberships
            .iter()
            .filter(|row| row.key().0 == user && row.value().status == status)
            .map(|row| row.key().1.clone())
            .collect();
        namespaces.sort();
        Ok(self.window(namespaces, page))
    }

    /// Package specs a namespace maintains with the given status.
    pub fn list_maintainerships(
        &self,
        namespace: &Namespace,
        status: RelationshipStatus,
        page: u32,
    ) -> Result<Page<String>, Refusal> {
        let ns = namespace.to_string();
        if !self.inner.namespaces.contains(&ns) {
            return Err(unknown_namespace(&ns));
        }
        let mut packages: Vec<String> = self
            .inner
            .maintainerships
            .iter()
            .filter(|row| row.key().0 == ns && row.value().status == status)
            .map(|row| row.key().1.clone())
            .collect();
        packages.sort();
        Ok(self.window(packages, page))
    }

    /// Namespace specs maintaining a package with the given status.
    pub fn list_maintainers(
        &self,
        package: &PackageRef,
        status: RelationshipStatus,
        page: u32,
    ) -> Result<Page<String>, Refusal> {
        let pkg = package.to_string();
        if !self.inner.packages.contains_key(&pkg) {
            return Err(unknown_package(&pkg));
        }
        let mut namespaces: Vec<String> = self
            .inner
            .maintainerships
            .iter()
            .filter(|row| row.key().1 == pkg && row.value().status == status)
            .map(|row| row.key().0.clone())
            .collect();
        namespaces.sort();
        Ok(self.window(namespaces, page))
    }

    /// All package specs, sorted.
    pub fn list_packages(&self, page: u32) -> Page<String> {
        let mut all: Vec<String> = self
            .inner
            .packages
            .iter()
            .map(|row| row.key().clone())
            .collect();
        all.sort();
        self.window(all, page)
    }

    // ── Packages and versions ────────────────────────────────────

    /// Fetch a package document. A package whose first version has not
    /// landed refuses with [`SYNCING_CODE`].
    pub fn get_package(&self, package: &PackageRef) -> Result<Value, Refusal> {
        let spec = package.to_string();
        let record = self
            .inner
            .packages
            .get(&spec)
            .ok_or_else(|| unknown_package(&spec))?;
        if record.syncing {
            return Err(Refusal::new(
                StatusCode::CONFLICT,
                SYNCING_CODE,
                format!("\"{spec}\" has no synced versions yet."),
            ));
        }
        Ok(record.document(package))
    }

    /// Create or update a package document.
    ///
    /// Creation requires the bearer to be an active member of the owning
    /// namespace and grants that namespace an active maintainership.
    /// Updates require maintainer authorization.
    pub fn put_package(
        &self,
        package: &PackageRef,
        require_tfa: Option<bool>,
        bearer: &UserName,
    ) -> Result<Value, Refusal> {
        let spec = package.to_string();
        let ns = package.namespace().to_string();
        let now = Utc::now();
        match self.inner.packages.entry(spec.clone()) {
            Entry::Occupied(mut occupied) => {
                if !self.may_administer(bearer.as_str(), &spec) {
                    return Err(unauthorized_package(bearer, &spec));
                }
                let record = occupied.get_mut();
                if let Some(require_tfa) = require_tfa {
                    record.require_tfa = require_tfa;
                }
                record.updated = now;
                Ok(record.document(package))
            }
            Entry::Vacant(vacant) => {
                if !self.inner.namespaces.contains(&ns) {
                    return Err(unknown_namespace(&ns));
                }
                if !self.is_active_member(bearer.as_str(), &ns) {
                    return Err(unauthorized_package(bearer, &spec));
                }
                let record = PackageRecord {
                    require_tfa: require_tfa.unwrap_or(false),
                    abandoned: false,
                    syncing: true,
                    created: now,
                    updated: now,
                };
                let document = record.document(package);
                vacant.insert(record);
                self.inner.maintainerships.insert(
                    (ns, spec),
                    Relationship {
                        status: RelationshipStatus::Active,
                        invited_by: bearer.clone(),
                        created: now,
                        updated: now,
                    },
                );
                Ok(document)
            }
        }
    }

    /// Mark a package abandoned. The record stays listed.
    pub fn delete_package(&self, package: &PackageRef, bearer: &UserName) -> Result<(), Refusal> {
        let spec = package.to_string();
        if !self.inner.packages.contains_key(&spec) {
            return Err(unknown_package(&spec));
        }
        if !self.may_administer(bearer.as_str(), &spec) {
            return Err(unauthorized_package(bearer, &spec));
        }
        if let Some(mut record) = self.inner.packages.get_mut(&spec) {
            record.abandoned = true;
            record.updated = Utc::now();
        }
        Ok(())
    }

    /// Fetch a version document.
    pub fn get_version(&self, package: &PackageRef, version: &Version) -> Result<Value, Refusal> {
        let key = (package.to_string(), version.as_str().to_string());
        match self.inner.versions.get(&key) {
            Some(record) => Ok(record.document(package, version)),
            None => Err(unknown_version(&key.0, version.as_str())),
        }
    }

    /// Store a version artifact.
    ///
    /// The body lands in the object table under its SHA-512 digest and the
    /// version document points at it. The first publish clears the owning
    /// package's syncing flag. Versions are immutable; re-publishing is
    /// refused with `version.exists`.
    pub fn publish_version(
        &self,
        package: &PackageRef,
        version: &Version,
        content_type: &str,
        body: Vec<u8>,
        bearer: &UserName,
    ) -> Result<Value, Refusal> {
        let spec = package.to_string();
        if !self.inner.packages.contains_key(&spec) {
            return Err(unknown_package(&spec));
        }
        if !self.may_administer(bearer.as_str(), &spec) {
            return Err(unauthorized_package(bearer, &spec));
        }
        let key = (spec.clone(), version.as_str().to_string());
        match self.inner.versions.entry(key) {
            Entry::Occupied(_) => Err(Refusal::new(
                StatusCode::CONFLICT,
                "version.exists",
                format!("Version \"{version}\" of \"{spec}\" already exists."),
            )),
            Entry::Vacant(vacant) => {
                let object = format!("sha512:{}", hex_digest(&body));
                let record = VersionRecord {
                    content_type: content_type.to_string(),
                    size: body.len(),
                    object: object.clone(),
                    yanked: false,
                    created: Utc::now(),
                };
                let document = record.document(package, version);
                self.inner.objects.insert(object, body);
                vacant.insert(record);
                if let Some(mut package_record) = self.inner.packages.get_mut(&spec) {
                    package_record.syncing = false;
                    package_record.updated = Utc::now();
                }
                Ok(document)
            }
        }
    }

    /// Yank a version. The record stays for audit; `yanked` flips.
    pub fn yank_version(
        &self,
        package: &PackageRef,
        version: &Version,
        bearer: &UserName,
    ) -> Result<(), Refusal> {
        let spec = package.to_string();
        if !self.inner.packages.contains_key(&spec) {
            return Err(unknown_package(&spec));
        }
        if !self.may_administer(bearer.as_str(), &spec) {
            return Err(unauthorized_package(bearer, &spec));
        }
        let key = (spec, version.as_str().to_string());
        match self.inner.versions.get_mut(&key) {
            Some(mut record) => {
                record.yanked = true;
                Ok(())
            }
            None => Err(unknown_version(&key.0, version.as_str())),
        }
    }

    /// Fetch raw object bytes by digest coordinates.
    pub fn get_object(&self, algorithm: &str, digest: &str) -> Result<Vec<u8>, Refusal> {
        let key = format!("{algorithm}:{digest}");
        match self.inner.objects.get(&key) {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(Refusal::new(
                StatusCode::NOT_FOUND,
                "object.dne",
                format!("No such object \"{key}\"."),
            )),
        }
    }

    // ── Tokens ───────────────────────────────────────────────────

    /// Resolve a cleartext token value to its owner.
    pub fn resolve_token(&self, value: &str) -> Result<AuthenticatedUser, Refusal> {
        let hash = hex_digest(value.as_bytes());
        let record = self.inner.tokens.get(&hash).ok_or_else(|| {
            Refusal::new(StatusCode::UNAUTHORIZED, "token.invalid", "Unauthenticated")
        })?;
        let email = self
            .inner
            .users
            .get(record.user.as_str())
            .and_then(|user| user.email.clone());
        Ok(AuthenticatedUser {
            name: record.user.clone(),
            email,
        })
    }

    /// Mint a token. The cleartext value is returned exactly once; the
    /// stored record is keyed by its hash.
    pub fn create_token(
        &self,
        bearer: &UserName,
        description: &str,
    ) -> Result<TokenGrant, Refusal> {
        if !self.inner.users.contains_key(bearer.as_str()) {
            return Err(unknown_user(bearer.as_str()));
        }
        let value = Uuid::new_v4().simple().to_string();
        let value_hash = hex_digest(value.as_bytes());
        self.inner.tokens.insert(
            value_hash.clone(),
            TokenRecord {
                user: bearer.clone(),
                description: description.to_string(),
                created: Utc::now(),
            },
        );
        Ok(TokenGrant {
            value,
            value_hash,
            description: description.to_string(),
        })
    }

    /// List a user's tokens, hashes only.
    pub fn list_tokens(
        &self,
        bearer: &UserName,
        page: u32,
    ) -> Result<Page<TokenDescription>, Refusal> {
        if !self.inner.users.contains_key(bearer.as_str()) {
            return Err(unknown_user(bearer.as_str()));
        }
        let mut tokens: Vec<TokenDescription> = self
            .inner
            .tokens
            .iter()
            .filter(|row| row.value().user == *bearer)
            .map(|row| TokenDescription {
                value_hash: row.key().clone(),
                description: row.value().description.clone(),
                created: row.value().created,
            })
            .collect();
        tokens.sort_by(|a, b| a.value_hash.cmp(&b.value_hash));
        Ok(self.window(tokens, page))
    }

    /// Delete tokens by value hash; only the bearer's own tokens count.
    pub fn delete_tokens(&self, bearer: &UserName, hashes: &str) -> RemovedTokens {
        let removed = hashes
            .split(';')
            .filter(|hash| {
                self.inner
                    .tokens
                    .remove_if(*hash, |_, record| record.user == *bearer)
                    .is_some()
            })
            .count() as u64;
        RemovedTokens { removed }
    }

    // ── CLI sessions ─────────────────────────────────────────────

    /// Start a login session.
    pub fn create_session(&self) -> CliSession {
        let session = Uuid::new_v4().to_string();
        self.inner.sessions.insert(session.clone(), None);
        CliSession { session }
    }

    /// Poll a session. A fetch that observes a resolved value consumes
    /// the session; the next fetch is a 404.
    pub fn fetch_session(&self, session: &str) -> Result<SessionValue, Refusal> {
        match self.inner.sessions.entry(session.to_string()) {
            Entry::Occupied(occupied) => {
                if occupied.get().is_some() {
                    let (_, value) = occupied.remove_entry();
                    Ok(SessionValue { value })
                } else {
                    Ok(SessionValue { value: None })
                }
            }
            Entry::Vacant(_) => Err(unknown_session(session)),
        }
    }

    /// Resolve a waiting session with a token value.
    pub fn resolve_session(&self, session: &str, value: String) -> Result<(), Refusal> {
        match self.inner.sessions.get_mut(session) {
            Some(mut stored) => {
                if stored.is_some() {
                    return Err(Refusal::new(
                        StatusCode::CONFLICT,
                        "session.resolved",
                        format!("Session \"{session}\" is already resolved."),
                    ));
                }
                *stored = Some(value);
                Ok(())
            }
            None => Err(unknown_session(session)),
        }
    }
}
