//! Testing utilities for the siteshift workspace
//!
//! Shared fixtures (project documents in every tolerated shape) and
//! fault-injecting store wrappers.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use siteshift_model::ProjectDocument;
use siteshift_store::{
    DocumentFilter, DocumentStore, MemoryStore, StoreError, VersionToken, VersionedDocument,
};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Parse a fixed RFC 3339 timestamp for deterministic fixtures
pub fn ts(text: &str) -> DateTime<Utc> {
    text.parse().expect("fixture timestamp")
}

/// Current-shape project: stage → kind → type → task `task-1` → subtask `sub-1`
pub fn sample_project(project_id: &str, foreman_id: &str) -> ProjectDocument {
    ProjectDocument::from_value(json!({
        "project_id": project_id,
        "project_name": format!("Project {project_id}"),
        "foreman_id": foreman_id,
        "work_stages": [{
            "stage_id": "s1",
            "stage_name": "Foundation",
            "work_kinds": [{
                "work_kind_id": "k1",
                "work_kind_name": "Concrete",
                "work_types": [{
                    "work_type_id": "t1",
                    "work_type_name": "Pouring",
                    "tasks": [{
                        "task_id": "task-1",
                        "task_name": "Slab",
                        "subtasks": [{
                            "subtask_id": "sub-1",
                            "subtask_name": "Rebar"
                        }]
                    }]
                }]
            }]
        }]
    }))
    .expect("fixture document")
}

/// Legacy-shape project: stage → type → task `task-1` (no kind level)
pub fn legacy_project(project_id: &str, foreman_id: &str) -> ProjectDocument {
    ProjectDocument::from_value(json!({
        "project_id": project_id,
        "project_name": format!("Project {project_id}"),
        "foreman_id": foreman_id,
        "work_stages": [{
            "stage_id": "s1",
            "work_types": [{
                "work_type_id": "t1",
                "tasks": [{
                    "task_id": "task-1",
                    "subtasks": [{"subtask_id": "sub-1"}]
                }]
            }]
        }]
    }))
    .expect("fixture document")
}

/// A closed interval as raw JSON, for splicing into fixture documents
pub fn closed_interval(start: &str, end: &str) -> Value {
    json!({"start_time": start, "end_time": end, "status": "closed"})
}

/// An open interval as raw JSON
pub fn open_interval(start: &str) -> Value {
    json!({"start_time": start, "end_time": null, "status": "active"})
}

/// Memory store seeded with the given documents, keyed by project id
pub fn seeded_store<I>(documents: I) -> MemoryStore
where
    I: IntoIterator<Item = ProjectDocument>,
{
    let store = MemoryStore::new();
    for document in documents {
        let id = document.project_id.clone();
        store.insert(id, document.to_value().expect("fixture document encodes"));
    }
    store
}

/// Store wrapper that rejects the next N conditional writes with a
/// version conflict, then delegates
pub struct ConflictingStore<S> {
    inner: S,
    conflicts_remaining: AtomicU32,
}

impl<S> ConflictingStore<S> {
    pub fn new(inner: S, conflicts: u32) -> Self {
        Self {
            inner,
            conflicts_remaining: AtomicU32::new(conflicts),
        }
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for ConflictingStore<S> {
    async fn get(&self, id: &str) -> Result<VersionedDocument, StoreError> {
        self.inner.get(id).await
    }

    async fn put(
        &self,
        id: &str,
        document: Value,
        version: Option<&VersionToken>,
    ) -> Result<VersionToken, StoreError> {
        if version.is_some() {
            let remaining = self.conflicts_remaining.load(Ordering::SeqCst);
            if remaining > 0
                && self
                    .conflicts_remaining
                    .compare_exchange(remaining, remaining - 1, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
            {
                return Err(StoreError::VersionConflict { id: id.to_string() });
            }
        }
        self.inner.put(id, document, version).await
    }

    async fn query(&self, filter: &DocumentFilter) -> Result<Vec<VersionedDocument>, StoreError> {
        self.inner.query(filter).await
    }
}

/// Store wrapper counting every store call, for asserting that rejected
/// requests perform no I/O
pub struct CountingStore<S> {
    inner: S,
    operations: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            operations: AtomicUsize::new(0),
        }
    }

    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for CountingStore<S> {
    async fn get(&self, id: &str) -> Result<VersionedDocument, StoreError> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn put(
        &self,
        id: &str,
        document: Value,
        version: Option<&VersionToken>,
    ) -> Result<VersionToken, StoreError> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        self.inner.put(id, document, version).await
    }

    async fn query(&self, filter: &DocumentFilter) -> Result<Vec<VersionedDocument>, StoreError> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        self.inner.query(filter).await
    }
}
