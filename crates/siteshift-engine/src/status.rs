//! Status deriver
//!
//! Answers "is anyone working right now" over a set of project documents
//! by scanning leaf interval logs for an open entry, stopping at the first
//! hit.

use crate::intervals;
use crate::walker::visit_leaves;
use serde::Serialize;
use siteshift_model::ProjectDocument;
use std::ops::ControlFlow;

/// Projection fields a backend needs to serve status queries
pub const STATUS_SOURCE_FIELDS: &[&str] = &["project_id", "work_stages"];

/// Live shift status derived from interval logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    Working,
    NotWorking,
}

impl ShiftStatus {
    /// Wire representation (`working` / `not_working`)
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Working => "working",
            Self::NotWorking => "not_working",
        }
    }
}

/// `Working` iff any leaf in any document has an open interval
#[must_use]
pub fn derive_status(documents: &[ProjectDocument]) -> ShiftStatus {
    for document in documents {
        let outcome = visit_leaves(document, &mut |leaf, _| {
            if intervals::has_open(leaf.intervals()) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        if outcome.is_break() {
            return ShiftStatus::Working;
        }
    }
    ShiftStatus::NotWorking
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(intervals: serde_json::Value) -> ProjectDocument {
        ProjectDocument::from_value(json!({
            "project_id": "p1",
            "work_stages": [{
                "stage_id": "s1",
                "work_kinds": [{
                    "work_types": [{
                        "tasks": [{
                            "task_id": "task-1",
                            "time_intervals": intervals
                        }]
                    }]
                }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn open_interval_means_working() {
        let document = doc(json!([{"start_time": "2024-03-01T08:00:00Z", "end_time": null, "status": "active"}]));
        assert_eq!(derive_status(&[document]), ShiftStatus::Working);
    }

    #[test]
    fn closed_intervals_mean_not_working() {
        let document = doc(json!([
            {"start_time": "2024-03-01T08:00:00Z", "end_time": "2024-03-01T16:00:00Z", "status": "closed"}
        ]));
        assert_eq!(derive_status(&[document]), ShiftStatus::NotWorking);
    }

    #[test]
    fn no_documents_mean_not_working() {
        assert_eq!(derive_status(&[]), ShiftStatus::NotWorking);
    }

    #[test]
    fn legacy_shape_subtask_interval_detected() {
        let document = ProjectDocument::from_value(json!({
            "project_id": "p1",
            "work_stages": [{
                "stage_id": "s1",
                "work_types": [{
                    "tasks": [{
                        "task_id": "task-1",
                        "subtasks": [{
                            "subtask_id": "sub-1",
                            "time_intervals": [{"start_time": "2024-03-01T08:00:00Z"}]
                        }]
                    }]
                }]
            }]
        }))
        .unwrap();
        assert_eq!(derive_status(&[document]), ShiftStatus::Working);
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(ShiftStatus::NotWorking).unwrap(),
            "not_working"
        );
        assert_eq!(ShiftStatus::Working.as_str(), "working");
    }
}
