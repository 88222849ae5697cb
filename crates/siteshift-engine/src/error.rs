//! Engine failure taxonomy
//!
//! Structural not-found conditions are *values* (see the per-operation
//! outcome enums), never errors: they are expected, frequent, and carry
//! which level was missing. Errors here are the cases a caller cannot act
//! on without retrying or fixing the request.

use siteshift_model::FieldPathError;
use siteshift_store::StoreError;

/// Errors surfaced by engine operations
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Request rejected before any store I/O
    #[error("validation failed: {0}")]
    Validation(String),

    /// Malformed field path (also raised before any store I/O)
    #[error("invalid field path: {0}")]
    Path(#[from] FieldPathError),

    /// Version-conflict retries exhausted; the caller may retry the call
    #[error("update contention on document {id} after {attempts} attempts")]
    Transient { id: String, attempts: u32 },

    /// Stored document does not decode into the project model
    #[error("document {id} does not match the project model: {source}")]
    Malformed {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// Infrastructure failure from the store, propagated as-is
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Whether the caller may simply retry the whole operation
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Whether the request itself was rejected (no I/O happened)
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Path(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_is_flagged() {
        let err = EngineError::Transient {
            id: "p1".into(),
            attempts: 3,
        };
        assert!(err.is_transient());
        assert!(!err.is_validation());
    }

    #[test]
    fn store_errors_pass_through_display() {
        let err = EngineError::from(StoreError::Timeout);
        assert_eq!(err.to_string(), "store request timed out");
    }
}
