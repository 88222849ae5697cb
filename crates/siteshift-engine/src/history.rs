//! History flattener
//!
//! Read-only projection of one or many project documents into a
//! chronological list of shift records: one record per logged interval,
//! enriched with the leaf's ancestor chain. Pure and restartable — the
//! same input always produces the same output.

use crate::walker::{visit_leaves, AncestorContext, Leaf};
use chrono::{DateTime, Utc};
use serde::Serialize;
use siteshift_model::{IntervalStatus, ProjectDocument, Subtask, Task, TimeInterval};
use std::ops::ControlFlow;

/// Projection fields a backend needs to serve history queries
pub const HISTORY_SOURCE_FIELDS: &[&str] = &["project_id", "project_name", "work_stages"];

/// Whether a record describes a task or a subtask interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftRecordKind {
    Task,
    Subtask,
}

/// One interval of one leaf, flattened with its ancestor context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftRecord {
    #[serde(rename = "type")]
    pub kind: ShiftRecordKind,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub task_id: Option<String>,
    pub task_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_kind_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_kind_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtask_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtask_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<IntervalStatus>,
}

/// Flatten documents into records sorted ascending by start time
///
/// Missing start times sort first. A leaf with N logged intervals yields
/// exactly N records.
#[must_use]
pub fn flatten(documents: &[ProjectDocument]) -> Vec<ShiftRecord> {
    let mut records = Vec::new();
    for document in documents {
        let _ = visit_leaves(document, &mut |leaf, context| {
            match leaf {
                Leaf::Task(task) => {
                    for interval in &task.time_intervals {
                        records.push(task_record(document, task, context, interval));
                    }
                }
                Leaf::Subtask { task, subtask } => {
                    for interval in &subtask.time_intervals {
                        records.push(subtask_record(document, task, subtask, context, interval));
                    }
                }
            }
            ControlFlow::Continue(())
        });
    }
    records.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    records
}

fn task_record(
    document: &ProjectDocument,
    task: &Task,
    context: &AncestorContext,
    interval: &TimeInterval,
) -> ShiftRecord {
    ShiftRecord {
        kind: ShiftRecordKind::Task,
        project_id: Some(document.project_id.clone()),
        project_name: document.project_name.clone(),
        task_id: Some(task.task_id.clone()),
        task_name: task.task_name.clone(),
        work_kind_id: context.work_kind_id.clone(),
        work_kind_name: context.work_kind_name.clone(),
        work_type_id: context.work_type_id.clone(),
        work_type_name: context.work_type_name.clone(),
        subtask_id: None,
        subtask_name: None,
        start_time: interval.start_time,
        end_time: interval.end_time,
        status: interval.status,
    }
}

fn subtask_record(
    document: &ProjectDocument,
    task: &Task,
    subtask: &Subtask,
    context: &AncestorContext,
    interval: &TimeInterval,
) -> ShiftRecord {
    let mut record = task_record(document, task, context, interval);
    record.kind = ShiftRecordKind::Subtask;
    record.subtask_id = Some(subtask.subtask_id.clone());
    record.subtask_name = subtask.subtask_name.clone();
    record
}
