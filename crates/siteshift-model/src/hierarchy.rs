//! The work hierarchy below a project: stages, work kinds, work types,
//! tasks, subtasks.
//!
//! Two document shapes coexist in the stored data:
//! - current: stage → `work_kinds` → `work_types` → tasks
//! - legacy: stage → `work_types` → tasks, where a work type may itself
//!   nest `work_kind` entries (an inversion kept for backward compatibility)
//!
//! The model carries both sets of fields; shape normalization happens in
//! the traversal layer, not here.

use crate::brigade::BrigadeSnapshot;
use crate::interval::TimeInterval;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Link to an uploaded report file on a subtask
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Planned execution window of a subtask
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

/// Deadline window of a subtask
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeadlineRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveDate>,
}

/// Machinery engaged on a subtask
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

/// Subtask: a leaf carrying its own interval log, report links and crew
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subtask {
    pub subtask_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtask_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtask_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtask_description: Option<String>,
    /// Id of the crew assigned to this subtask
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brigade_id: Option<String>,
    /// Crew composition captured at assignment time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brigade_snapshot: Option<BrigadeSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DeadlineRange>,
    #[serde(default, rename = "plannedQty", skip_serializing_if = "Option::is_none")]
    pub planned_qty: Option<f64>,
    #[serde(default, rename = "actualQty", skip_serializing_if = "Option::is_none")]
    pub actual_qty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine: Option<MachineInfo>,
    #[serde(default, rename = "reportLinks", skip_serializing_if = "Vec::is_empty")]
    pub report_links: Vec<ReportLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_intervals: Vec<TimeInterval>,
    /// Unknown fields, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Task: a leaf with its own interval log, owning subtasks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_intervals: Vec<TimeInterval>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Work type, owning tasks
///
/// The legacy inversion (`work_kind` nested *inside* a type) is kept as a
/// decoded field so old documents survive a round trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_type_status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,
    /// Legacy shape: kinds nested under the type
    #[serde(default, rename = "work_kind", skip_serializing_if = "Vec::is_empty")]
    pub work_kinds: Vec<WorkKind>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Work kind, grouping work types
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkKind {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_kind_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_kind_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub work_types: Vec<WorkType>,
    /// Legacy shape: tasks attached to the kind directly
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Work stage: the top level below the project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkStage {
    pub stage_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_status: Option<String>,
    /// Current shape
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub work_kinds: Vec<WorkKind>,
    /// Legacy shape: types attached to the stage directly
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub work_types: Vec<WorkType>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
