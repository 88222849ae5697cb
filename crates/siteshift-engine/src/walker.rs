//! Hierarchy walker
//!
//! Depth-first traversal of a project document emitting its task and
//! subtask leaves together with the ancestor chain they sit under.
//!
//! Three stored shapes are normalized here so no consumer ever branches on
//! them:
//! - current: stage → work_kinds → work_types → tasks
//! - legacy: stage → work_types → tasks (no kind level)
//! - legacy inversion: a work type nesting `work_kind` entries, and a kind
//!   carrying tasks directly

use siteshift_model::{ProjectDocument, Subtask, Task, TimeInterval, WorkKind, WorkStage, WorkType};
use std::ops::ControlFlow;

/// Identifiers and names accumulated on the way down to a leaf
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestorContext {
    pub stage_id: Option<String>,
    pub stage_name: Option<String>,
    pub work_kind_id: Option<String>,
    pub work_kind_name: Option<String>,
    pub work_type_id: Option<String>,
    pub work_type_name: Option<String>,
}

impl AncestorContext {
    fn for_stage(stage: &WorkStage) -> Self {
        Self {
            stage_id: Some(stage.stage_id.clone()),
            stage_name: stage.stage_name.clone(),
            ..Self::default()
        }
    }

    fn with_kind(&self, kind: &WorkKind) -> Self {
        let mut context = self.clone();
        context.work_kind_id = kind.work_kind_id.clone();
        context.work_kind_name = kind.work_kind_name.clone();
        context
    }

    fn with_type(&self, work_type: &WorkType) -> Self {
        let mut context = self.clone();
        context.work_type_id = work_type.work_type_id.clone();
        context.work_type_name = work_type.work_type_name.clone();
        context
    }
}

/// A task or subtask leaf, the only entities carrying interval logs
#[derive(Debug, Clone, Copy)]
pub enum Leaf<'a> {
    Task(&'a Task),
    /// A subtask together with its owning task (history records need both)
    Subtask {
        task: &'a Task,
        subtask: &'a Subtask,
    },
}

impl<'a> Leaf<'a> {
    /// The leaf's own id
    #[must_use]
    pub fn id(&self) -> &'a str {
        match self {
            Self::Task(task) => &task.task_id,
            Self::Subtask { subtask, .. } => &subtask.subtask_id,
        }
    }

    /// The leaf's interval log
    #[must_use]
    pub fn intervals(&self) -> &'a [TimeInterval] {
        match self {
            Self::Task(task) => &task.time_intervals,
            Self::Subtask { subtask, .. } => &subtask.time_intervals,
        }
    }
}

/// Mutable view of a leaf, exposing just what mutations need
#[derive(Debug)]
pub enum LeafMut<'a> {
    Task(&'a mut Task),
    Subtask(&'a mut Subtask),
}

impl LeafMut<'_> {
    /// The leaf's own id
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Task(task) => &task.task_id,
            Self::Subtask(subtask) => &subtask.subtask_id,
        }
    }

    /// The leaf's interval log
    pub fn intervals_mut(&mut self) -> &mut Vec<TimeInterval> {
        match self {
            Self::Task(task) => &mut task.time_intervals,
            Self::Subtask(subtask) => &mut subtask.time_intervals,
        }
    }
}

/// Visit every leaf of the document depth-first
///
/// The visitor may stop the walk early by returning
/// [`ControlFlow::Break`]; the overall return value reports whether that
/// happened.
pub fn visit_leaves<'a, F>(document: &'a ProjectDocument, visit: &mut F) -> ControlFlow<()>
where
    F: FnMut(Leaf<'a>, &AncestorContext) -> ControlFlow<()>,
{
    for stage in &document.work_stages {
        let context = AncestorContext::for_stage(stage);
        for kind in &stage.work_kinds {
            visit_kind(kind, &context, visit)?;
        }
        for work_type in &stage.work_types {
            visit_type(work_type, &context, visit)?;
        }
    }
    ControlFlow::Continue(())
}

fn visit_kind<'a, F>(
    kind: &'a WorkKind,
    context: &AncestorContext,
    visit: &mut F,
) -> ControlFlow<()>
where
    F: FnMut(Leaf<'a>, &AncestorContext) -> ControlFlow<()>,
{
    let context = context.with_kind(kind);
    for work_type in &kind.work_types {
        visit_type(work_type, &context, visit)?;
    }
    // Legacy: tasks attached to the kind directly
    for task in &kind.tasks {
        visit_task(task, &context, visit)?;
    }
    ControlFlow::Continue(())
}

fn visit_type<'a, F>(
    work_type: &'a WorkType,
    context: &AncestorContext,
    visit: &mut F,
) -> ControlFlow<()>
where
    F: FnMut(Leaf<'a>, &AncestorContext) -> ControlFlow<()>,
{
    let context = context.with_type(work_type);
    for task in &work_type.tasks {
        visit_task(task, &context, visit)?;
    }
    // Legacy inversion: kinds nested inside the type
    for kind in &work_type.work_kinds {
        visit_kind(kind, &context, visit)?;
    }
    ControlFlow::Continue(())
}

fn visit_task<'a, F>(task: &'a Task, context: &AncestorContext, visit: &mut F) -> ControlFlow<()>
where
    F: FnMut(Leaf<'a>, &AncestorContext) -> ControlFlow<()>,
{
    visit(Leaf::Task(task), context)?;
    for subtask in &task.subtasks {
        visit(Leaf::Subtask { task, subtask }, context)?;
    }
    ControlFlow::Continue(())
}

/// Visit every leaf of the document with mutable access
pub fn visit_leaves_mut<F>(document: &mut ProjectDocument, visit: &mut F)
where
    F: FnMut(LeafMut<'_>),
{
    for stage in &mut document.work_stages {
        for kind in &mut stage.work_kinds {
            visit_kind_mut(kind, visit);
        }
        for work_type in &mut stage.work_types {
            visit_type_mut(work_type, visit);
        }
    }
}

fn visit_kind_mut<F>(kind: &mut WorkKind, visit: &mut F)
where
    F: FnMut(LeafMut<'_>),
{
    for work_type in &mut kind.work_types {
        visit_type_mut(work_type, visit);
    }
    for task in &mut kind.tasks {
        visit_task_mut(task, visit);
    }
}

fn visit_type_mut<F>(work_type: &mut WorkType, visit: &mut F)
where
    F: FnMut(LeafMut<'_>),
{
    for task in &mut work_type.tasks {
        visit_task_mut(task, visit);
    }
    for kind in &mut work_type.work_kinds {
        visit_kind_mut(kind, visit);
    }
}

fn visit_task_mut<F>(task: &mut Task, visit: &mut F)
where
    F: FnMut(LeafMut<'_>),
{
    visit(LeafMut::Task(&mut *task));
    for subtask in &mut task.subtasks {
        visit(LeafMut::Subtask(subtask));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current_shape() -> ProjectDocument {
        ProjectDocument::from_value(json!({
            "project_id": "p1",
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
                            "subtasks": [{"subtask_id": "sub-1"}]
                        }]
                    }]
                }]
            }]
        }))
        .unwrap()
    }

    fn legacy_shape() -> ProjectDocument {
        ProjectDocument::from_value(json!({
            "project_id": "p2",
            "work_stages": [{
                "stage_id": "s1",
                "work_types": [{
                    "work_type_id": "t1",
                    "tasks": [{"task_id": "task-legacy"}]
                }]
            }]
        }))
        .unwrap()
    }

    fn inverted_shape() -> ProjectDocument {
        ProjectDocument::from_value(json!({
            "project_id": "p3",
            "work_stages": [{
                "stage_id": "s1",
                "work_types": [{
                    "work_type_id": "t1",
                    "work_kind": [{
                        "work_kind_id": "k1",
                        "tasks": [{"task_id": "task-inverted"}]
                    }]
                }]
            }]
        }))
        .unwrap()
    }

    fn collect_ids(document: &ProjectDocument) -> Vec<(String, AncestorContext)> {
        let mut seen = Vec::new();
        let _ = visit_leaves(document, &mut |leaf, context| {
            seen.push((leaf.id().to_string(), context.clone()));
            ControlFlow::Continue(())
        });
        seen
    }

    #[test]
    fn current_shape_yields_task_and_subtask_with_full_context() {
        let seen = collect_ids(&current_shape());
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "task-1");
        assert_eq!(seen[1].0, "sub-1");
        let context = &seen[0].1;
        assert_eq!(context.stage_id.as_deref(), Some("s1"));
        assert_eq!(context.work_kind_id.as_deref(), Some("k1"));
        assert_eq!(context.work_type_id.as_deref(), Some("t1"));
        assert_eq!(context.work_type_name.as_deref(), Some("Pouring"));
    }

    #[test]
    fn legacy_shape_yields_tasks_without_kind_context() {
        let seen = collect_ids(&legacy_shape());
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "task-legacy");
        assert_eq!(seen[0].1.work_kind_id, None);
        assert_eq!(seen[0].1.work_type_id.as_deref(), Some("t1"));
    }

    #[test]
    fn inverted_shape_carries_both_kind_and_type_context() {
        let seen = collect_ids(&inverted_shape());
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "task-inverted");
        assert_eq!(seen[0].1.work_kind_id.as_deref(), Some("k1"));
        assert_eq!(seen[0].1.work_type_id.as_deref(), Some("t1"));
    }

    #[test]
    fn walk_short_circuits_on_break() {
        let mut visited = 0;
        let outcome = visit_leaves(&current_shape(), &mut |_, _| {
            visited += 1;
            ControlFlow::Break(())
        });
        assert!(outcome.is_break());
        assert_eq!(visited, 1);
    }

    #[test]
    fn mutable_walk_reaches_every_leaf() {
        let mut document = current_shape();
        let mut ids = Vec::new();
        visit_leaves_mut(&mut document, &mut |mut leaf| {
            ids.push(leaf.id().to_string());
            leaf.intervals_mut().clear();
        });
        assert_eq!(ids, vec!["task-1", "sub-1"]);
    }
}
