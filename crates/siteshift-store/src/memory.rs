//! In-process [`DocumentStore`] backed by a concurrent map.
//!
//! Used by the test suites and local runs. Versioning is a per-document
//! counter; `put` is an atomic compare-and-swap on that counter, which is
//! exactly the guarantee the engine's retry loop is written against.

use crate::error::StoreError;
use crate::filter::DocumentFilter;
use crate::store::{DocumentStore, VersionToken, VersionedDocument};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
struct Stored {
    document: Value,
    version: u64,
}

/// In-memory document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: DashMap<String, Stored>,
}

impl MemoryStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document unconditionally, returning its initial version
    ///
    /// Synchronous convenience for test setup.
    pub fn insert(&self, id: impl Into<String>, document: Value) -> VersionToken {
        let id = id.into();
        match self.documents.entry(id) {
            Entry::Occupied(mut occupied) => {
                let next = occupied.get().version + 1;
                occupied.insert(Stored {
                    document,
                    version: next,
                });
                VersionToken::new(next)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Stored {
                    document,
                    version: 1,
                });
                VersionToken::new(1)
            }
        }
    }

    /// Number of stored documents
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<VersionedDocument, StoreError> {
        let stored = self
            .documents
            .get(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        Ok(VersionedDocument {
            id: id.to_string(),
            document: stored.document.clone(),
            version: VersionToken::new(stored.version),
        })
    }

    async fn put(
        &self,
        id: &str,
        document: Value,
        version: Option<&VersionToken>,
    ) -> Result<VersionToken, StoreError> {
        match self.documents.entry(id.to_string()) {
            Entry::Occupied(mut occupied) => {
                if let Some(expected) = version {
                    if occupied.get().version != expected.raw() {
                        tracing::debug!(id, "stale version token rejected");
                        return Err(StoreError::VersionConflict { id: id.to_string() });
                    }
                }
                let next = occupied.get().version + 1;
                occupied.insert(Stored {
                    document,
                    version: next,
                });
                Ok(VersionToken::new(next))
            }
            Entry::Vacant(vacant) => {
                if version.is_some() {
                    // Conditional write against a document that no longer exists.
                    return Err(StoreError::NotFound { id: id.to_string() });
                }
                vacant.insert(Stored {
                    document,
                    version: 1,
                });
                Ok(VersionToken::new(1))
            }
        }
    }

    async fn query(&self, filter: &DocumentFilter) -> Result<Vec<VersionedDocument>, StoreError> {
        let mut hits = Vec::new();
        for entry in self.documents.iter() {
            if hits.len() >= filter.effective_size() {
                break;
            }
            if filter.matches(&entry.document) {
                hits.push(VersionedDocument {
                    id: entry.key().clone(),
                    document: project_fields(&entry.document, filter.fields()),
                    version: VersionToken::new(entry.version),
                });
            }
        }
        Ok(hits)
    }
}

/// Superset projection: a requested dot-path retains its whole top-level
/// subtree, so nested selectors never under-return.
fn project_fields(document: &Value, fields: &[String]) -> Value {
    if fields.is_empty() {
        return document.clone();
    }
    let Some(object) = document.as_object() else {
        return document.clone();
    };
    let mut projected = Map::new();
    for (key, value) in object {
        let wanted = fields
            .iter()
            .any(|field| field == key || field.starts_with(&format!("{key}.")));
        if wanted {
            projected.insert(key.clone(), value.clone());
        }
    }
    Value::Object(projected)
}
