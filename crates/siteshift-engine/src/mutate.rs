//! Path-addressed document mutation
//!
//! Generic get/set over a raw document tree addressed by [`FieldPath`],
//! plus [`FieldMutator`]: the store-facing operation that rewrites one
//! document field under optimistic concurrency.
//!
//! `set_path` materializes missing intermediates on the way down: when the
//! next segment is a list index the created container is a list (sparsely
//! extended with nulls up to the index), otherwise a map. A container of
//! the wrong kind at a required position is *replaced* — recoverable
//! last-write-wins, logged at `warn`. The path shape itself is not
//! validated further; the surrounding service layer uses free-form paths
//! for ad hoc field edits.

use crate::error::EngineError;
use crate::rewrite::rewrite_by_id;
use serde::Serialize;
use serde_json::{Map, Value};
use siteshift_model::{FieldPath, PathSegment};
use siteshift_store::{DocumentStore, StoreError};
use std::sync::Arc;

/// Read the value at `path`, or `None` when any step is absent
#[must_use]
pub fn get_path<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut cursor = root;
    for segment in path.segments() {
        cursor = match segment {
            PathSegment::Key(key) => cursor.get(key.as_str())?,
            PathSegment::Index(index) => cursor.get(index)?,
        };
    }
    Some(cursor)
}

/// Write `value` at `path`, creating missing intermediate containers
pub fn set_path(root: &mut Value, path: &FieldPath, value: Value) {
    let segments = path.segments();
    let mut cursor = root;
    for (position, segment) in segments.iter().enumerate() {
        let placeholder = match segments.get(position + 1) {
            None => Value::Null,
            Some(PathSegment::Index(_)) => Value::Array(Vec::new()),
            Some(PathSegment::Key(_)) => Value::Object(Map::new()),
        };
        cursor = match segment {
            PathSegment::Key(key) => descend_key(cursor, key, placeholder),
            PathSegment::Index(index) => descend_index(cursor, *index),
        };
    }
    *cursor = value;
}

fn descend_key<'a>(cursor: &'a mut Value, key: &str, placeholder: Value) -> &'a mut Value {
    if !cursor.is_object() {
        if !cursor.is_null() {
            tracing::warn!(key, found = value_kind(cursor), "replacing node with a map");
        }
        *cursor = Value::Object(Map::new());
    }
    match cursor {
        Value::Object(map) => map.entry(key.to_owned()).or_insert(placeholder),
        _ => unreachable!("cursor coerced to an object above"),
    }
}

fn descend_index<'a>(cursor: &'a mut Value, index: usize) -> &'a mut Value {
    if !cursor.is_array() {
        if !cursor.is_null() {
            tracing::warn!(index, found = value_kind(cursor), "replacing node with a list");
        }
        *cursor = Value::Array(Vec::new());
    }
    match cursor {
        Value::Array(items) => {
            while items.len() <= index {
                items.push(Value::Null);
            }
            &mut items[index]
        }
        _ => unreachable!("cursor coerced to an array above"),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// Result of a path-addressed field write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SetFieldOutcome {
    Ok { project_id: String },
    NotFound { project_id: String },
}

/// Store-facing field setter: one document, one path, one value
#[derive(Debug)]
pub struct FieldMutator<S> {
    store: Arc<S>,
    max_write_attempts: u32,
}

impl<S: DocumentStore> FieldMutator<S> {
    /// Create a mutator with the default retry budget
    #[inline]
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            max_write_attempts: 3,
        }
    }

    /// Override the conflict retry budget
    #[inline]
    #[must_use]
    pub fn with_write_attempts(mut self, attempts: u32) -> Self {
        self.max_write_attempts = attempts;
        self
    }

    /// Set one field of one document under optimistic concurrency
    ///
    /// An absent document is an expected outcome, not an error.
    ///
    /// # Errors
    /// [`EngineError::Transient`] after exhausted conflict retries; other
    /// store failures propagate.
    pub async fn set_field(
        &self,
        document_id: &str,
        path: &FieldPath,
        value: Value,
    ) -> Result<SetFieldOutcome, EngineError> {
        let result = rewrite_by_id(
            self.store.as_ref(),
            document_id,
            self.max_write_attempts,
            &mut |mut document| {
                set_path(&mut document, path, value.clone());
                Ok(Some(document))
            },
        )
        .await;

        match result {
            Ok(_) => {
                tracing::info!(document = %document_id, %path, "field updated");
                Ok(SetFieldOutcome::Ok {
                    project_id: document_id.to_string(),
                })
            }
            Err(EngineError::Store(StoreError::NotFound { .. })) => Ok(SetFieldOutcome::NotFound {
                project_id: document_id.to_string(),
            }),
            Err(error) => Err(error),
        }
    }
}
