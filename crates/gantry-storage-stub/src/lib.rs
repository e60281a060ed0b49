//! # gantry-storage-stub — In-Memory Storage Service
//!
//! The complete storage wire contract over `dashmap` tables: namespaces,
//! members, packages, maintainers, versions, objects, tokens, and CLI
//! sessions. State lives for the life of the process; nothing persists.
//!
//! The gateway treats this service exactly like durable storage: same
//! paths, same envelopes, same machine codes. End-to-end tests spawn it
//! on an ephemeral port and seed fixtures through [`StubState`]; local
//! development runs the `gantry-storage-stub` binary next to
//! `gantry-registry`.

pub mod routes;
pub mod store;

pub use routes::router;
pub use store::{Refusal, StubConfig, StubState};
