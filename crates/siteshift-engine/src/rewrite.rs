//! Shared optimistic-concurrency write primitive
//!
//! Every mutating operation is read-whole-document, mutate-in-memory,
//! write-whole-document. The store only guarantees atomicity per document
//! version, so a losing writer re-reads and re-applies its logical
//! mutation, bounded by the caller's attempt budget.

use crate::error::EngineError;
use serde_json::Value;
use siteshift_store::{DocumentStore, VersionToken, VersionedDocument};

/// What a rewrite attempt ended with
pub(crate) enum Rewrite {
    /// Document written; the store returned a fresh version
    Applied(VersionToken),
    /// The mutation was a no-op; no write was issued
    NoChange,
}

/// Apply `apply` to a freshly read document and write the result back.
///
/// `apply` returns `Some(updated)` to request a write or `None` to signal
/// a no-op (which skips the write entirely — no version churn). It is
/// re-invoked against a re-read document after every version conflict, so
/// it must re-derive its decision from the document it is given rather
/// than from captured state.
pub(crate) async fn rewrite_by_id<S, F>(
    store: &S,
    id: &str,
    max_attempts: u32,
    apply: &mut F,
) -> Result<Rewrite, EngineError>
where
    S: DocumentStore + ?Sized,
    F: FnMut(Value) -> Result<Option<Value>, EngineError>,
{
    let seed = store.get(id).await?;
    rewrite_document(store, seed, max_attempts, apply).await
}

/// Like [`rewrite_by_id`], seeded with an already-read document so the
/// first attempt spends no extra read.
pub(crate) async fn rewrite_document<S, F>(
    store: &S,
    seed: VersionedDocument,
    max_attempts: u32,
    apply: &mut F,
) -> Result<Rewrite, EngineError>
where
    S: DocumentStore + ?Sized,
    F: FnMut(Value) -> Result<Option<Value>, EngineError>,
{
    let id = seed.id.clone();
    let mut current = seed;
    for attempt in 1..=max_attempts {
        let version = current.version.clone();
        match apply(current.document)? {
            None => return Ok(Rewrite::NoChange),
            Some(updated) => match store.put(&id, updated, Some(&version)).await {
                Ok(next) => return Ok(Rewrite::Applied(next)),
                Err(error) if error.is_conflict() && attempt < max_attempts => {
                    tracing::warn!(document = %id, attempt, "version conflict, re-reading");
                    current = store.get(&id).await?;
                }
                Err(error) if error.is_conflict() => {
                    tracing::warn!(document = %id, attempts = max_attempts, "retry budget exhausted");
                    return Err(EngineError::Transient {
                        id,
                        attempts: max_attempts,
                    });
                }
                Err(error) => return Err(error.into()),
            },
        }
    }
    Err(EngineError::Transient {
        id,
        attempts: max_attempts,
    })
}
