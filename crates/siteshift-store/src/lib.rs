//! Siteshift store boundary
//!
//! The engine's only contact with persistence:
//! - [`DocumentStore`]: versioned `get`/`put`/`query` over whole documents
//! - [`VersionToken`]: opaque optimistic-concurrency token
//! - [`DocumentFilter`]: exact-match terms, advisory projection, size cap
//! - [`MemoryStore`]: in-process implementation used by tests and local runs
//!
//! The store guarantees atomicity only per document version: a `put`
//! presenting a stale token fails with [`StoreError::VersionConflict`] and
//! the caller re-reads and retries. Nothing here spans documents.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod filter;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use filter::DocumentFilter;
pub use memory::MemoryStore;
pub use store::{DocumentStore, VersionToken, VersionedDocument};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
