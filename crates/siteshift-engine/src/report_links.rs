//! Report link attacher
//!
//! Locates exactly one subtask by its full path of ids and appends link
//! metadata to it, rewriting the document under optimistic concurrency.
//! Every missing level is reported as a specific outcome value — expected,
//! frequent and information-bearing, so never modeled as an error.

use crate::error::EngineError;
use crate::rewrite::rewrite_by_id;
use serde::Serialize;
use siteshift_model::{ProjectDocument, ReportLink, WorkType};
use siteshift_store::{DocumentStore, StoreError};
use std::sync::Arc;

/// Title used when a link arrives without one
const DEFAULT_LINK_TITLE: &str = "attachment";

/// Full path of ids identifying the target subtask, plus the links
#[derive(Debug, Clone)]
pub struct AttachRequest {
    pub project_id: String,
    pub stage_id: String,
    /// Required when the document carries the work-kind level
    pub work_kind_id: Option<String>,
    pub work_type_id: Option<String>,
    pub task_id: String,
    pub subtask_id: String,
    pub links: Vec<ReportLink>,
}

/// Result of an attach call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AttachOutcome {
    Ok { project_id: String },
    NotFound { project_id: String },
    StageNotFound { stage_id: String },
    WorkKindNotFound { work_kind_id: Option<String> },
    WorkTypeNotFound { work_type_id: Option<String> },
    TaskNotFound { task_id: String },
    SubtaskNotFound { subtask_id: String },
}

/// Appends report links to one subtask under optimistic concurrency
#[derive(Debug)]
pub struct ReportLinkAttacher<S> {
    store: Arc<S>,
    max_write_attempts: u32,
}

impl<S: DocumentStore> ReportLinkAttacher<S> {
    /// Create an attacher with the default retry budget
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

    /// Append the request's links to the addressed subtask
    ///
    /// Existing links are preserved; each appended link gets a placeholder
    /// title when none was supplied. The locate-and-append runs again from
    /// scratch after every version conflict.
    ///
    /// # Errors
    /// [`EngineError::Transient`] after exhausted conflict retries; other
    /// store failures propagate. Missing levels are [`AttachOutcome`]
    /// values, not errors.
    pub async fn attach(&self, request: &AttachRequest) -> Result<AttachOutcome, EngineError> {
        let mut miss: Option<AttachOutcome> = None;
        let result = rewrite_by_id(
            self.store.as_ref(),
            &request.project_id,
            self.max_write_attempts,
            &mut |document| {
                miss = None;
                let mut project = ProjectDocument::from_value(document).map_err(|source| {
                    EngineError::Malformed {
                        id: request.project_id.clone(),
                        source,
                    }
                })?;
                match locate_and_append(&mut project, request) {
                    Ok(()) => {
                        let updated =
                            project.to_value().map_err(|source| EngineError::Malformed {
                                id: request.project_id.clone(),
                                source,
                            })?;
                        Ok(Some(updated))
                    }
                    Err(outcome) => {
                        miss = Some(outcome);
                        Ok(None)
                    }
                }
            },
        )
        .await;

        match result {
            Ok(_) => match miss {
                Some(outcome) => {
                    tracing::debug!(document = %request.project_id, ?outcome, "attach target missing");
                    Ok(outcome)
                }
                None => {
                    tracing::info!(
                        document = %request.project_id,
                        subtask = %request.subtask_id,
                        links = request.links.len(),
                        "report links attached"
                    );
                    Ok(AttachOutcome::Ok {
                        project_id: request.project_id.clone(),
                    })
                }
            },
            Err(EngineError::Store(StoreError::NotFound { .. })) => Ok(AttachOutcome::NotFound {
                project_id: request.project_id.clone(),
            }),
            Err(error) => Err(error),
        }
    }
}

/// Resolve the id path level by level and append the links
fn locate_and_append(
    project: &mut ProjectDocument,
    request: &AttachRequest,
) -> Result<(), AttachOutcome> {
    let stage = project
        .work_stages
        .iter_mut()
        .find(|stage| stage.stage_id == request.stage_id)
        .ok_or_else(|| AttachOutcome::StageNotFound {
            stage_id: request.stage_id.clone(),
        })?;

    // The kind level exists only in current-shape documents; legacy stages
    // hold their work types directly.
    let work_types: &mut Vec<WorkType> = if stage.work_kinds.is_empty() {
        &mut stage.work_types
    } else {
        let kind = match request.work_kind_id.as_deref() {
            Some(wanted) => stage
                .work_kinds
                .iter_mut()
                .find(|kind| kind.work_kind_id.as_deref() == Some(wanted)),
            None => None,
        }
        .ok_or_else(|| AttachOutcome::WorkKindNotFound {
            work_kind_id: request.work_kind_id.clone(),
        })?;
        &mut kind.work_types
    };

    let work_type = match request.work_type_id.as_deref() {
        Some(wanted) => work_types
            .iter_mut()
            .find(|work_type| work_type.work_type_id.as_deref() == Some(wanted)),
        None => None,
    }
    .ok_or_else(|| AttachOutcome::WorkTypeNotFound {
        work_type_id: request.work_type_id.clone(),
    })?;

    let task = work_type
        .tasks
        .iter_mut()
        .find(|task| task.task_id == request.task_id)
        .ok_or_else(|| AttachOutcome::TaskNotFound {
            task_id: request.task_id.clone(),
        })?;

    let subtask = task
        .subtasks
        .iter_mut()
        .find(|subtask| subtask.subtask_id == request.subtask_id)
        .ok_or_else(|| AttachOutcome::SubtaskNotFound {
            subtask_id: request.subtask_id.clone(),
        })?;

    for link in &request.links {
        let title = link
            .title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(DEFAULT_LINK_TITLE);
        subtask.report_links.push(ReportLink {
            title: Some(title.to_string()),
            href: link.href.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project() -> ProjectDocument {
        ProjectDocument::from_value(json!({
            "project_id": "p1",
            "work_stages": [{
                "stage_id": "s1",
                "work_kinds": [{
                    "work_kind_id": "k1",
                    "work_types": [{
                        "work_type_id": "t1",
                        "tasks": [{
                            "task_id": "task-1",
                            "subtasks": [{
                                "subtask_id": "sub-1",
                                "reportLinks": [{"title": "existing", "href": "https://example.com/1"}]
                            }]
                        }]
                    }]
                }]
            }]
        }))
        .unwrap()
    }

    fn request() -> AttachRequest {
        AttachRequest {
            project_id: "p1".into(),
            stage_id: "s1".into(),
            work_kind_id: Some("k1".into()),
            work_type_id: Some("t1".into()),
            task_id: "task-1".into(),
            subtask_id: "sub-1".into(),
            links: vec![ReportLink {
                title: None,
                href: Some("https://example.com/2".into()),
            }],
        }
    }

    #[test]
    fn append_preserves_existing_links_and_defaults_title() {
        let mut project = project();
        locate_and_append(&mut project, &request()).unwrap();
        let links = &project.work_stages[0].work_kinds[0].work_types[0].tasks[0].subtasks[0]
            .report_links;
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].title.as_deref(), Some("existing"));
        assert_eq!(links[1].title.as_deref(), Some(DEFAULT_LINK_TITLE));
    }

    #[test]
    fn each_missing_level_reports_its_kind() {
        let mut base = project();

        let mut miss = request();
        miss.stage_id = "s-absent".into();
        assert_eq!(
            locate_and_append(&mut base, &miss),
            Err(AttachOutcome::StageNotFound {
                stage_id: "s-absent".into()
            })
        );

        let mut miss = request();
        miss.work_kind_id = Some("k-absent".into());
        assert!(matches!(
            locate_and_append(&mut base, &miss),
            Err(AttachOutcome::WorkKindNotFound { .. })
        ));

        let mut miss = request();
        miss.work_type_id = Some("t-absent".into());
        assert!(matches!(
            locate_and_append(&mut base, &miss),
            Err(AttachOutcome::WorkTypeNotFound { .. })
        ));

        let mut miss = request();
        miss.task_id = "task-absent".into();
        assert!(matches!(
            locate_and_append(&mut base, &miss),
            Err(AttachOutcome::TaskNotFound { .. })
        ));

        let mut miss = request();
        miss.subtask_id = "sub-absent".into();
        assert!(matches!(
            locate_and_append(&mut base, &miss),
            Err(AttachOutcome::SubtaskNotFound { .. })
        ));
    }

    #[test]
    fn legacy_stage_without_kinds_skips_the_kind_level() {
        let mut legacy = ProjectDocument::from_value(json!({
            "project_id": "p2",
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
        .unwrap();
        let mut req = request();
        req.project_id = "p2".into();
        req.work_kind_id = None;
        locate_and_append(&mut legacy, &req).unwrap();
        let links = &legacy.work_stages[0].work_types[0].tasks[0].subtasks[0].report_links;
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn outcome_serializes_with_result_tag() {
        let outcome = AttachOutcome::TaskNotFound {
            task_id: "task-9".into(),
        };
        let encoded = serde_json::to_value(&outcome).unwrap();
        assert_eq!(encoded["result"], "task_not_found");
        assert_eq!(encoded["task_id"], "task-9");
    }
}
