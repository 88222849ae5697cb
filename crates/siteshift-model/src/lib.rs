//! Siteshift document model
//!
//! Typed representation of a construction-project document:
//! - The fixed work hierarchy (project → stage → work-kind → work-type → task → subtask)
//! - Interval logs on task/subtask leaves
//! - Brigade snapshots embedded in subtasks
//! - [`FieldPath`] for structural addressing of arbitrary document fields
//!
//! Documents are *open schema*: every entity decodes its named fields
//! strictly and retains everything else in a residual map, so a
//! decode/encode round trip never drops caller-supplied data.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod brigade;
pub mod hierarchy;
pub mod interval;
pub mod path;
pub mod project;

pub use brigade::{BrigadeDocument, BrigadeMember, BrigadeSnapshot};
pub use hierarchy::{
    DateRange, DeadlineRange, MachineInfo, ReportLink, Subtask, Task, WorkKind, WorkStage,
    WorkType,
};
pub use interval::{IntervalStatus, TimeInterval};
pub use path::{FieldPath, FieldPathError, PathSegment};
pub use project::{ProjectCreate, ProjectDocument, ProjectSummary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
