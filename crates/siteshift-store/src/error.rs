//! Store failure taxonomy.

/// Errors surfaced by a [`crate::DocumentStore`] implementation
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document with this id
    #[error("document not found: {id}")]
    NotFound { id: String },

    /// A concurrent writer won; the presented version token is stale
    #[error("version conflict on document {id}")]
    VersionConflict { id: String },

    /// A read or write exceeded the caller-supplied timeout
    #[error("store request timed out")]
    Timeout,

    /// Backend unreachable or otherwise failing
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether this is the optimistic-concurrency rejection
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }

    /// Whether this is the absent-document case
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
