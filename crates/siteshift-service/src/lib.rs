//! Siteshift services
//!
//! The boundary exposed to the surrounding API layer:
//! - [`ForemanService`]: scoped listings, shift lifecycle, history/status,
//!   report attachments
//! - [`ManagerService`]: project administration, path-addressed field
//!   edits, cross-project reporting
//! - [`BrigadeService`]: deterministic crew identity and assignment
//! - [`Principal`]/[`Role`]: the opaque authenticated caller
//! - [`Settings`]: environment-driven configuration
//! - [`telemetry`]: tracing initialization
//!
//! Services receive their store explicitly at construction; nothing here
//! is a process-wide singleton.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod brigade;
pub mod config;
pub mod error;
pub mod foreman;
pub mod manager;
pub mod principal;
pub mod telemetry;

pub use brigade::BrigadeService;
pub use config::{EngineSettings, Settings, StoreSettings};
pub use error::ServiceError;
pub use foreman::ForemanService;
pub use manager::{ForemanShiftSummary, ManagerService};
pub use principal::{Principal, Role};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
