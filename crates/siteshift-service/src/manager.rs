//! Manager-facing operations: project administration and cross-project
//! reporting. Every operation checks the manager role before any I/O.

use crate::error::ServiceError;
use crate::principal::Principal;
use serde::Serialize;
use serde_json::Value;
use siteshift_engine::{
    visit_leaves, EngineError, FieldMutator, Leaf, SetFieldOutcome, ShiftEngineConfig,
};
use siteshift_model::{
    FieldPath, ProjectCreate, ProjectDocument, ProjectSummary, Task, TimeInterval,
};
use siteshift_store::{DocumentFilter, DocumentStore};
use std::ops::ControlFlow;
use std::sync::Arc;

/// Per-project interval summary for the manager's shift report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForemanShiftSummary {
    pub foreman_id: Option<String>,
    pub foreman_email: Option<String>,
    pub project_id: String,
    pub shifts: Vec<TimeInterval>,
}

/// Services exposed to the manager API surface
#[derive(Debug)]
pub struct ManagerService<S> {
    store: Arc<S>,
    mutator: FieldMutator<S>,
    query_size: usize,
}

impl<S: DocumentStore> ManagerService<S> {
    /// Create the service with default engine configuration
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, ShiftEngineConfig::default())
    }

    /// Create the service with explicit engine configuration
    #[must_use]
    pub fn with_config(store: Arc<S>, config: ShiftEngineConfig) -> Self {
        let mutator =
            FieldMutator::new(Arc::clone(&store)).with_write_attempts(config.max_write_attempts);
        Self {
            mutator,
            query_size: config.query_size,
            store,
        }
    }

    /// Id/name summaries of every project
    pub async fn list_projects(
        &self,
        principal: &Principal,
    ) -> Result<Vec<ProjectSummary>, ServiceError> {
        ensure_manager(principal)?;
        let filter = DocumentFilter::new()
            .source_fields(["project_id", "project_name"])
            .size(self.query_size);
        let hits = self.store.query(&filter).await?;
        hits.into_iter()
            .map(|hit| serde_json::from_value(hit.document).map_err(ServiceError::from))
            .collect()
    }

    /// Create a project document (unconditional upsert)
    pub async fn create_project(
        &self,
        principal: &Principal,
        payload: ProjectCreate,
    ) -> Result<String, ServiceError> {
        ensure_manager(principal)?;
        if payload.project_id.is_empty() {
            return Err(ServiceError::Validation("project_id must not be empty".into()));
        }
        let document = ProjectDocument::from(payload);
        let id = document.project_id.clone();
        let body = document
            .to_value()
            .map_err(|source| EngineError::Malformed {
                id: id.clone(),
                source,
            })?;
        self.store.put(&id, body, None).await?;
        tracing::info!(project = %id, "project created");
        Ok(id)
    }

    /// Set one document field addressed by a dot-separated path
    ///
    /// The path is parsed before any store I/O; malformed paths are
    /// rejected as validation failures.
    pub async fn set_project_field(
        &self,
        principal: &Principal,
        project_id: &str,
        path: &str,
        value: Value,
    ) -> Result<SetFieldOutcome, ServiceError> {
        ensure_manager(principal)?;
        let path: FieldPath = path.parse().map_err(EngineError::Path)?;
        Ok(self.mutator.set_field(project_id, &path, value).await?)
    }

    /// Every task leaf across all projects
    pub async fn list_tasks(&self, principal: &Principal) -> Result<Vec<Task>, ServiceError> {
        ensure_manager(principal)?;
        let documents = self.fetch_documents().await?;
        let mut tasks = Vec::new();
        for document in &documents {
            let _ = visit_leaves(document, &mut |leaf, _| {
                if let Leaf::Task(task) = leaf {
                    tasks.push(task.clone());
                }
                ControlFlow::Continue(())
            });
        }
        Ok(tasks)
    }

    /// Per-project interval summaries across all foremen
    pub async fn shift_history(
        &self,
        principal: &Principal,
    ) -> Result<Vec<ForemanShiftSummary>, ServiceError> {
        ensure_manager(principal)?;
        let documents = self.fetch_documents().await?;
        let mut summaries = Vec::new();
        for document in &documents {
            let mut shifts = Vec::new();
            let _ = visit_leaves(document, &mut |leaf, _| {
                shifts.extend_from_slice(leaf.intervals());
                ControlFlow::Continue(())
            });
            summaries.push(ForemanShiftSummary {
                foreman_id: document.foreman_id.clone(),
                foreman_email: document.foreman_email.clone(),
                project_id: document.project_id.clone(),
                shifts,
            });
        }
        Ok(summaries)
    }

    async fn fetch_documents(&self) -> Result<Vec<ProjectDocument>, ServiceError> {
        let filter = DocumentFilter::new()
            .source_fields(["project_id", "foreman_id", "foreman_email", "work_stages"])
            .size(self.query_size);
        let hits = self.store.query(&filter).await?;
        hits.into_iter()
            .map(|hit| {
                ProjectDocument::from_value(hit.document)
                    .map_err(|source| {
                        EngineError::Malformed {
                            id: hit.id,
                            source,
                        }
                    })
                    .map_err(ServiceError::from)
            })
            .collect()
    }
}

fn ensure_manager(principal: &Principal) -> Result<(), ServiceError> {
    if principal.is_manager() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::Role;

    #[test]
    fn role_guard_rejects_foremen() {
        let foreman = Principal::new("f1", Role::Foreman);
        assert!(matches!(
            ensure_manager(&foreman),
            Err(ServiceError::Forbidden)
        ));
        let manager = Principal::new("m1", Role::Manager);
        assert!(ensure_manager(&manager).is_ok());
    }
}
