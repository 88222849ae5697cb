//! The [`DocumentStore`] trait and its versioning primitives.

use crate::error::StoreError;
use crate::filter::DocumentFilter;
use async_trait::async_trait;
use serde_json::Value;

/// Opaque optimistic-concurrency token
///
/// Returned on every read, required on every conditional write. Callers
/// treat it as opaque; only store implementations construct and compare
/// tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken(u64);

impl VersionToken {
    /// Construct a token from a backend-specific counter
    #[inline]
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Backend-specific counter value
    #[inline]
    #[must_use]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A document together with the version it was read at
#[derive(Debug, Clone)]
pub struct VersionedDocument {
    /// Store id (for project documents: the project id)
    pub id: String,
    /// Raw document body
    pub document: Value,
    /// Token to present on write-back
    pub version: VersionToken,
}

/// Whole-document persistence with per-document optimistic concurrency
///
/// The contract the engine relies on:
/// - `get` returns the current body and version, or [`StoreError::NotFound`]
/// - `put` with `Some(version)` succeeds only against that exact version,
///   failing with [`StoreError::VersionConflict`] otherwise; `put` with
///   `None` is an unconditional upsert (used at creation)
/// - `query` returns versioned documents matching every filter term;
///   projection is advisory and may return supersets
///
/// Implementations own their timeout handling and report expiry as
/// [`StoreError::Timeout`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read one document by id
    async fn get(&self, id: &str) -> Result<VersionedDocument, StoreError>;

    /// Write one document, optionally conditioned on a version token
    async fn put(
        &self,
        id: &str,
        document: Value,
        version: Option<&VersionToken>,
    ) -> Result<VersionToken, StoreError>;

    /// Find documents matching the filter
    async fn query(&self, filter: &DocumentFilter) -> Result<Vec<VersionedDocument>, StoreError>;
}
