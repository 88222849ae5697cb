//! Service-level failure taxonomy: the engine taxonomy plus access control.

use siteshift_engine::EngineError;
use siteshift_store::StoreError;

/// Errors surfaced by the API-facing services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Caller lacks the required role; raised before any I/O
    #[error("operation requires the manager role")]
    Forbidden,

    /// Request rejected before any I/O
    #[error("validation failed: {0}")]
    Validation(String),

    /// Engine failure (validation, contention, malformed document, store)
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Direct store failure from a listing query
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Response shape failed to encode
    #[error("encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ServiceError {
    /// Whether the caller may retry the call unchanged
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Engine(engine) if engine.is_transient())
    }
}
