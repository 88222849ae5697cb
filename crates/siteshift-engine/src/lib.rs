//! Siteshift engine
//!
//! The document mutation and interval-tracking core:
//! - [`intervals`]: start/stop state machine over a leaf's interval log
//! - [`walker`]: shape-normalizing traversal of the work hierarchy
//! - [`shift`]: bulk start/stop of shifts under optimistic concurrency
//! - [`history`] / [`status`]: read-only projections
//! - [`mutate`]: path-addressed field get/set with container creation
//! - [`report_links`]: per-subtask link attachment
//!
//! Every mutating operation is read-whole-document, mutate-in-memory,
//! write-whole-document against a store that guarantees atomicity only per
//! document version. The engine holds no shared mutable state; concurrency
//! control is the store's version token plus bounded re-read retries.
//!
//! # Example
//!
//! ```rust,ignore
//! use siteshift_engine::{ShiftEngine, ShiftScope, ShiftTargets};
//! use siteshift_store::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let engine = ShiftEngine::new(store);
//!
//! let scope = ShiftScope::foreman("f-17").with_project("p1");
//! let targets = ShiftTargets::new(["task-1"], ["sub-1"]);
//! engine.start_shift(&scope, &targets).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod history;
pub mod intervals;
pub mod mutate;
pub mod report_links;
mod rewrite;
pub mod shift;
pub mod status;
pub mod walker;

pub use error::EngineError;
pub use history::{flatten, ShiftRecord, ShiftRecordKind, HISTORY_SOURCE_FIELDS};
pub use mutate::{get_path, set_path, FieldMutator, SetFieldOutcome};
pub use report_links::{AttachOutcome, AttachRequest, ReportLinkAttacher};
pub use shift::{ShiftEngine, ShiftEngineConfig, ShiftOp, ShiftScope, ShiftTargets};
pub use status::{derive_status, ShiftStatus, STATUS_SOURCE_FIELDS};
pub use walker::{visit_leaves, visit_leaves_mut, AncestorContext, Leaf, LeafMut};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the engine
    pub use crate::{
        AttachOutcome, AttachRequest, EngineError, FieldMutator, ReportLinkAttacher, ShiftEngine,
        ShiftScope, ShiftStatus, ShiftTargets,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
