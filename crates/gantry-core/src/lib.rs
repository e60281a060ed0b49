#![deny(missing_docs)]

//! # gantry-core — Foundational Types for the Gantry Registry
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde`, `serde_json`,
//! `thiserror`, and `chrono` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** Every identifier is a
//!    distinct type. You cannot pass a [`UserName`] where a [`Namespace`] is
//!    expected, and a namespace that parsed is a namespace with a non-empty
//!    name and host.
//!
//! 2. **One relationship state machine.** Memberships (user ↔ namespace) and
//!    maintainerships (namespace ↔ package) share a single lifecycle. The
//!    transition table lives in exactly one place —
//!    [`RelationshipStatus::apply`] — and both relationship kinds are
//!    expressed through the [`RelationshipKind`] trait rather than by
//!    duplicating the table.
//!
//! 3. **Pagination math in one place.** Both the gateway and the storage
//!    service window result sets the same way. [`PageWindow`] owns the
//!    `start`/`probe`/`trim` arithmetic so the two sides cannot drift.
//!
//! 4. **Structured errors with `thiserror`.** No `Box<dyn Error>`, no
//!    `.unwrap()` outside tests.

pub mod error;
pub mod names;
pub mod page;
pub mod relationship;

// Re-export primary types at crate root for ergonomic imports.
pub use error::ValidationError;
pub use names::{Namespace, ObjectRef, PackageName, PackageRef, UserName, Version};
pub use page::{PageWindow, DEFAULT_PAGE_SIZE};
pub use relationship::{
    Denial, Maintainership, Membership, Relationship, RelationshipAction, RelationshipKind,
    RelationshipStatus, TransitionError,
};
