//! Foreman-facing operations: project listings, shift lifecycle, history,
//! status, report attachments.
//!
//! Every operation is scoped by the authenticated principal's id — a
//! foreman only ever sees and mutates documents whose `foreman_id` matches.

use crate::error::ServiceError;
use siteshift_engine::{
    AttachOutcome, AttachRequest, ReportLinkAttacher, ShiftEngine, ShiftEngineConfig, ShiftRecord,
    ShiftScope, ShiftStatus, ShiftTargets,
};
use siteshift_model::{ProjectDocument, ProjectSummary, WorkStage};
use siteshift_store::{DocumentFilter, DocumentStore};
use std::sync::Arc;

/// Services exposed to the foreman API surface
#[derive(Debug)]
pub struct ForemanService<S> {
    store: Arc<S>,
    engine: ShiftEngine<S>,
    attacher: ReportLinkAttacher<S>,
    query_size: usize,
}

impl<S: DocumentStore> ForemanService<S> {
    /// Create the service with default engine configuration
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, ShiftEngineConfig::default())
    }

    /// Create the service with explicit engine configuration
    #[must_use]
    pub fn with_config(store: Arc<S>, config: ShiftEngineConfig) -> Self {
        let attacher = ReportLinkAttacher::new(Arc::clone(&store))
            .with_write_attempts(config.max_write_attempts);
        Self {
            engine: ShiftEngine::with_config(Arc::clone(&store), config.clone()),
            attacher,
            query_size: config.query_size,
            store,
        }
    }

    /// Id/name summaries of every project assigned to the foreman
    pub async fn list_projects(
        &self,
        foreman_id: &str,
    ) -> Result<Vec<ProjectSummary>, ServiceError> {
        let filter = DocumentFilter::new()
            .term("foreman_id", foreman_id)
            .source_fields(["project_id", "project_name"])
            .size(self.query_size);
        let hits = self.store.query(&filter).await?;
        hits.into_iter()
            .map(|hit| serde_json::from_value(hit.document).map_err(ServiceError::from))
            .collect()
    }

    /// Work-stage subtrees of the foreman's projects
    pub async fn list_stages(
        &self,
        foreman_id: &str,
        project_id: Option<&str>,
    ) -> Result<Vec<WorkStage>, ServiceError> {
        let filter = DocumentFilter::new()
            .term("foreman_id", foreman_id)
            .opt_term("project_id", project_id)
            .source_fields(["project_id", "work_stages"])
            .size(self.query_size);
        let hits = self.store.query(&filter).await?;
        let mut stages = Vec::new();
        for hit in hits {
            let document =
                ProjectDocument::from_value(hit.document).map_err(|source| {
                    siteshift_engine::EngineError::Malformed {
                        id: hit.id,
                        source,
                    }
                })?;
            stages.extend(document.work_stages);
        }
        Ok(stages)
    }

    /// Open work intervals on the targeted leaves
    pub async fn start_shift(
        &self,
        foreman_id: &str,
        project_id: Option<&str>,
        task_ids: Vec<String>,
        subtask_ids: Vec<String>,
    ) -> Result<(), ServiceError> {
        let scope = scope_for(foreman_id, project_id);
        let targets = ShiftTargets::new(task_ids, subtask_ids);
        self.engine.start_shift(&scope, &targets).await?;
        Ok(())
    }

    /// Close open work intervals on the targeted leaves
    pub async fn stop_shift(
        &self,
        foreman_id: &str,
        project_id: Option<&str>,
        task_ids: Vec<String>,
        subtask_ids: Vec<String>,
    ) -> Result<(), ServiceError> {
        let scope = scope_for(foreman_id, project_id);
        let targets = ShiftTargets::new(task_ids, subtask_ids);
        self.engine.stop_shift(&scope, &targets).await?;
        Ok(())
    }

    /// Live working/not-working status over the foreman's scope
    pub async fn shift_status(
        &self,
        foreman_id: &str,
        project_id: Option<&str>,
    ) -> Result<ShiftStatus, ServiceError> {
        Ok(self
            .engine
            .shift_status(&scope_for(foreman_id, project_id))
            .await?)
    }

    /// Chronological interval history over the foreman's scope
    pub async fn shift_history(
        &self,
        foreman_id: &str,
        project_id: Option<&str>,
    ) -> Result<Vec<ShiftRecord>, ServiceError> {
        Ok(self
            .engine
            .shift_history(&scope_for(foreman_id, project_id))
            .await?)
    }

    /// Attach report links to one subtask
    pub async fn attach_report_links(
        &self,
        request: &AttachRequest,
    ) -> Result<AttachOutcome, ServiceError> {
        Ok(self.attacher.attach(request).await?)
    }
}

fn scope_for(foreman_id: &str, project_id: Option<&str>) -> ShiftScope {
    let scope = ShiftScope::foreman(foreman_id);
    match project_id {
        Some(project_id) => scope.with_project(project_id),
        None => scope,
    }
}
