//! Shift operation engine
//!
//! Orchestrates bulk interval mutations: select documents by scope, walk
//! each one's hierarchy, apply the interval state machine to every
//! targeted leaf, and write changed documents back under optimistic
//! concurrency. Documents matched by one call are mutated independently —
//! there is no cross-document transaction and no rollback.

use crate::error::EngineError;
use crate::history::{self, ShiftRecord, HISTORY_SOURCE_FIELDS};
use crate::intervals;
use crate::rewrite::{rewrite_document, Rewrite};
use crate::status::{self, ShiftStatus, STATUS_SOURCE_FIELDS};
use crate::walker::{visit_leaves_mut, LeafMut};
use chrono::{DateTime, Utc};
use siteshift_model::ProjectDocument;
use siteshift_store::{DocumentFilter, DocumentStore, VersionedDocument};
use std::collections::HashSet;
use std::sync::Arc;

/// Which lifecycle transition a bulk call applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    Start,
    Stop,
}

/// Criteria selecting the documents a bulk shift call targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftScope {
    pub foreman_id: String,
    pub project_id: Option<String>,
}

impl ShiftScope {
    /// Scope over every project assigned to a foreman
    #[inline]
    #[must_use]
    pub fn foreman(foreman_id: impl Into<String>) -> Self {
        Self {
            foreman_id: foreman_id.into(),
            project_id: None,
        }
    }

    /// Narrow the scope to one project
    #[must_use]
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    fn filter(&self) -> DocumentFilter {
        DocumentFilter::new()
            .term("foreman_id", &self.foreman_id)
            .opt_term("project_id", self.project_id.as_deref())
    }
}

/// The task/subtask ids a bulk shift call targets
#[derive(Debug, Clone, Default)]
pub struct ShiftTargets {
    task_ids: HashSet<String>,
    subtask_ids: HashSet<String>,
}

impl ShiftTargets {
    /// Build a target set from requested ids
    #[must_use]
    pub fn new<I, J, S>(task_ids: I, subtask_ids: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            task_ids: task_ids.into_iter().map(Into::into).collect(),
            subtask_ids: subtask_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the set selects nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty() && self.subtask_ids.is_empty()
    }

    fn matches(&self, leaf: &LeafMut<'_>) -> bool {
        match leaf {
            LeafMut::Task(task) => self.task_ids.contains(&task.task_id),
            LeafMut::Subtask(subtask) => self.subtask_ids.contains(&subtask.subtask_id),
        }
    }
}

/// Tuning knobs for the engine
#[derive(Debug, Clone)]
pub struct ShiftEngineConfig {
    /// Write attempts per document before surfacing a transient failure
    pub max_write_attempts: u32,
    /// Cap on documents considered per scope query
    pub query_size: usize,
}

impl Default for ShiftEngineConfig {
    fn default() -> Self {
        Self {
            max_write_attempts: 3,
            query_size: 100,
        }
    }
}

/// Bulk interval mutation plus the read-only shift projections
#[derive(Debug)]
pub struct ShiftEngine<S> {
    store: Arc<S>,
    config: ShiftEngineConfig,
}

impl<S: DocumentStore> ShiftEngine<S> {
    /// Create an engine over a store with default configuration
    #[inline]
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, ShiftEngineConfig::default())
    }

    /// Create an engine with explicit configuration
    #[inline]
    #[must_use]
    pub fn with_config(store: Arc<S>, config: ShiftEngineConfig) -> Self {
        Self { store, config }
    }

    /// Open work intervals on every targeted leaf in scope
    ///
    /// Idempotent: leaves already carrying an open interval are untouched,
    /// and documents where nothing changed are not rewritten.
    ///
    /// # Errors
    /// - [`EngineError::Validation`] when the target set is empty
    /// - [`EngineError::Transient`] when conflict retries are exhausted
    /// - store failures propagate as [`EngineError::Store`]
    pub async fn start_shift(
        &self,
        scope: &ShiftScope,
        targets: &ShiftTargets,
    ) -> Result<(), EngineError> {
        self.apply(scope, targets, ShiftOp::Start).await
    }

    /// Close open work intervals on every targeted leaf in scope
    ///
    /// Same idempotence and failure behavior as [`Self::start_shift`].
    pub async fn stop_shift(
        &self,
        scope: &ShiftScope,
        targets: &ShiftTargets,
    ) -> Result<(), EngineError> {
        self.apply(scope, targets, ShiftOp::Stop).await
    }

    /// Chronological interval history over the scoped documents
    pub async fn shift_history(&self, scope: &ShiftScope) -> Result<Vec<ShiftRecord>, EngineError> {
        let filter = scope
            .filter()
            .size(self.config.query_size)
            .source_fields(HISTORY_SOURCE_FIELDS.iter().copied());
        let documents = self.fetch_projected(filter).await?;
        Ok(history::flatten(&documents))
    }

    /// Live working/not-working status over the scoped documents
    pub async fn shift_status(&self, scope: &ShiftScope) -> Result<ShiftStatus, EngineError> {
        let filter = scope
            .filter()
            .size(self.config.query_size)
            .source_fields(STATUS_SOURCE_FIELDS.iter().copied());
        let documents = self.fetch_projected(filter).await?;
        Ok(status::derive_status(&documents))
    }

    async fn fetch_projected(
        &self,
        filter: DocumentFilter,
    ) -> Result<Vec<ProjectDocument>, EngineError> {
        let hits = self.store.query(&filter).await?;
        hits.into_iter()
            .map(|hit| {
                ProjectDocument::from_value(hit.document).map_err(|source| {
                    EngineError::Malformed {
                        id: hit.id,
                        source,
                    }
                })
            })
            .collect()
    }

    async fn apply(
        &self,
        scope: &ShiftScope,
        targets: &ShiftTargets,
        op: ShiftOp,
    ) -> Result<(), EngineError> {
        if targets.is_empty() {
            return Err(EngineError::Validation(
                "shift call targets no task or subtask ids".into(),
            ));
        }

        let filter = scope.filter().size(self.config.query_size);
        let matched = self.store.query(&filter).await?;
        if matched.is_empty() {
            tracing::debug!(foreman = %scope.foreman_id, "no documents in scope");
            return Ok(());
        }

        let now = Utc::now();
        let mut first_failure = None;
        for versioned in matched {
            let document_id = versioned.id.clone();
            match self.apply_to_document(versioned, targets, op, now).await {
                Ok(changed) if changed => {
                    tracing::info!(document = %document_id, ?op, "shift intervals updated");
                }
                Ok(_) => {
                    tracing::debug!(document = %document_id, ?op, "no interval changed, write skipped");
                }
                Err(error) => {
                    tracing::warn!(document = %document_id, %error, "shift mutation failed");
                    first_failure.get_or_insert(error);
                }
            }
        }
        match first_failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn apply_to_document(
        &self,
        seed: VersionedDocument,
        targets: &ShiftTargets,
        op: ShiftOp,
        now: DateTime<Utc>,
    ) -> Result<bool, EngineError> {
        let id = seed.id.clone();
        let outcome = rewrite_document(
            self.store.as_ref(),
            seed,
            self.config.max_write_attempts,
            &mut |document| {
                let mut project = ProjectDocument::from_value(document)
                    .map_err(|source| EngineError::Malformed {
                        id: id.clone(),
                        source,
                    })?;
                if apply_op(&mut project, targets, op, now) == 0 {
                    return Ok(None);
                }
                let updated = project.to_value().map_err(|source| EngineError::Malformed {
                    id: id.clone(),
                    source,
                })?;
                Ok(Some(updated))
            },
        )
        .await?;
        Ok(matches!(outcome, Rewrite::Applied(_)))
    }
}

/// Apply the transition to every targeted leaf; returns how many changed
fn apply_op(
    project: &mut ProjectDocument,
    targets: &ShiftTargets,
    op: ShiftOp,
    now: DateTime<Utc>,
) -> usize {
    let mut changed = 0;
    visit_leaves_mut(project, &mut |mut leaf| {
        if !targets.matches(&leaf) {
            return;
        }
        let log = leaf.intervals_mut();
        let did_change = match op {
            ShiftOp::Start => intervals::start(log, now),
            ShiftOp::Stop => intervals::stop(log, now),
        };
        if did_change {
            changed += 1;
        }
    });
    changed
}
