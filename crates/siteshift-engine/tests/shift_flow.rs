//! End-to-end shift lifecycle against the in-memory store.

use siteshift_engine::{EngineError, ShiftEngine, ShiftScope, ShiftStatus, ShiftTargets};
use siteshift_model::{IntervalStatus, ProjectDocument};
use siteshift_store::{DocumentStore, MemoryStore};
use siteshift_test_utils::{legacy_project, sample_project, seeded_store, CountingStore};
use std::sync::Arc;

async fn read_project(store: &MemoryStore, id: &str) -> ProjectDocument {
    let versioned = store.get(id).await.unwrap();
    ProjectDocument::from_value(versioned.document).unwrap()
}

fn task_intervals(project: &ProjectDocument) -> &[siteshift_model::TimeInterval] {
    &project.work_stages[0].work_kinds[0].work_types[0].tasks[0].time_intervals
}

#[tokio::test]
async fn start_then_stop_full_cycle() {
    let store = Arc::new(seeded_store([sample_project("p1", "f1")]));
    let engine = ShiftEngine::new(Arc::clone(&store));
    let scope = ShiftScope::foreman("f1").with_project("p1");
    let targets = ShiftTargets::new(["task-1"], []);

    engine.start_shift(&scope, &targets).await.unwrap();
    let project = read_project(&store, "p1").await;
    let log = task_intervals(&project);
    assert_eq!(log.len(), 1);
    assert!(log[0].is_open());
    assert_eq!(log[0].status, Some(IntervalStatus::Active));
    assert_eq!(engine.shift_status(&scope).await.unwrap(), ShiftStatus::Working);

    // Second start is a no-op: the log stays at one open interval.
    engine.start_shift(&scope, &targets).await.unwrap();
    let project = read_project(&store, "p1").await;
    assert_eq!(task_intervals(&project).len(), 1);

    engine.stop_shift(&scope, &targets).await.unwrap();
    let project = read_project(&store, "p1").await;
    let log = task_intervals(&project);
    assert_eq!(log.len(), 1);
    assert!(!log[0].is_open());
    assert!(log[0].end_time.is_some());
    assert_eq!(log[0].status, Some(IntervalStatus::Closed));
    assert_eq!(
        engine.shift_status(&scope).await.unwrap(),
        ShiftStatus::NotWorking
    );
}

#[tokio::test]
async fn noop_start_skips_the_write() {
    let store = Arc::new(seeded_store([sample_project("p1", "f1")]));
    let engine = ShiftEngine::new(Arc::clone(&store));
    let scope = ShiftScope::foreman("f1").with_project("p1");
    let targets = ShiftTargets::new(["task-1"], []);

    engine.start_shift(&scope, &targets).await.unwrap();
    let version_after_first = store.get("p1").await.unwrap().version;

    engine.start_shift(&scope, &targets).await.unwrap();
    let version_after_second = store.get("p1").await.unwrap().version;
    assert_eq!(version_after_first, version_after_second);
}

#[tokio::test]
async fn unknown_target_ids_change_nothing() {
    let store = Arc::new(seeded_store([sample_project("p1", "f1")]));
    let engine = ShiftEngine::new(Arc::clone(&store));
    let scope = ShiftScope::foreman("f1").with_project("p1");

    engine
        .start_shift(&scope, &ShiftTargets::new(["task-nope"], []))
        .await
        .unwrap();
    let project = read_project(&store, "p1").await;
    assert!(task_intervals(&project).is_empty());
}

#[tokio::test]
async fn broad_scope_touches_every_matched_project() {
    let store = Arc::new(seeded_store([
        sample_project("p1", "f1"),
        sample_project("p2", "f1"),
        sample_project("p3", "f2"),
    ]));
    let engine = ShiftEngine::new(Arc::clone(&store));

    engine
        .start_shift(&ShiftScope::foreman("f1"), &ShiftTargets::new(["task-1"], []))
        .await
        .unwrap();

    assert_eq!(task_intervals(&read_project(&store, "p1").await).len(), 1);
    assert_eq!(task_intervals(&read_project(&store, "p2").await).len(), 1);
    assert!(task_intervals(&read_project(&store, "p3").await).is_empty());
}

#[tokio::test]
async fn narrowed_scope_leaves_other_projects_alone() {
    let store = Arc::new(seeded_store([
        sample_project("p1", "f1"),
        sample_project("p2", "f1"),
    ]));
    let engine = ShiftEngine::new(Arc::clone(&store));

    engine
        .start_shift(
            &ShiftScope::foreman("f1").with_project("p2"),
            &ShiftTargets::new(["task-1"], []),
        )
        .await
        .unwrap();

    assert!(task_intervals(&read_project(&store, "p1").await).is_empty());
    assert_eq!(task_intervals(&read_project(&store, "p2").await).len(), 1);
}

#[tokio::test]
async fn empty_targets_rejected_before_any_store_io() {
    let counting = Arc::new(CountingStore::new(seeded_store([sample_project(
        "p1", "f1",
    )])));
    let engine = ShiftEngine::new(Arc::clone(&counting));

    let error = engine
        .start_shift(
            &ShiftScope::foreman("f1"),
            &ShiftTargets::new(Vec::<String>::new(), Vec::<String>::new()),
        )
        .await
        .unwrap_err();
    assert!(matches!(error, EngineError::Validation(_)));
    assert_eq!(counting.operation_count(), 0);
}

#[tokio::test]
async fn legacy_shape_documents_are_mutated_transparently() {
    let store = Arc::new(seeded_store([legacy_project("p1", "f1")]));
    let engine = ShiftEngine::new(Arc::clone(&store));
    let scope = ShiftScope::foreman("f1").with_project("p1");

    engine
        .start_shift(&scope, &ShiftTargets::new(["task-1"], ["sub-1"]))
        .await
        .unwrap();

    let project = read_project(&store, "p1").await;
    let task = &project.work_stages[0].work_types[0].tasks[0];
    assert_eq!(task.time_intervals.len(), 1);
    assert_eq!(task.subtasks[0].time_intervals.len(), 1);
    assert_eq!(engine.shift_status(&scope).await.unwrap(), ShiftStatus::Working);
}

#[tokio::test]
async fn history_reflects_the_full_cycle() {
    let store = Arc::new(seeded_store([sample_project("p1", "f1")]));
    let engine = ShiftEngine::new(Arc::clone(&store));
    let scope = ShiftScope::foreman("f1").with_project("p1");
    let targets = ShiftTargets::new(["task-1"], ["sub-1"]);

    engine.start_shift(&scope, &targets).await.unwrap();
    engine.stop_shift(&scope, &targets).await.unwrap();
    engine.start_shift(&scope, &targets).await.unwrap();

    let records = engine.shift_history(&scope).await.unwrap();
    // Two cycles on the task leaf and two on the subtask leaf.
    assert_eq!(records.len(), 4);
    for pair in records.windows(2) {
        assert!(pair[0].start_time <= pair[1].start_time);
    }
    assert!(records
        .iter()
        .any(|record| record.subtask_id.as_deref() == Some("sub-1")));
    // Re-running the projection yields identical output.
    assert_eq!(records, engine.shift_history(&scope).await.unwrap());
}

#[tokio::test]
async fn unknown_document_fields_survive_a_shift_write() {
    let raw = {
        let mut document = sample_project("p1", "f1");
        document
            .extra
            .insert("contract_number".into(), serde_json::json!("N-2024-118"));
        document
    };
    let store = Arc::new(seeded_store([raw]));
    let engine = ShiftEngine::new(Arc::clone(&store));

    engine
        .start_shift(
            &ShiftScope::foreman("f1").with_project("p1"),
            &ShiftTargets::new(["task-1"], []),
        )
        .await
        .unwrap();

    let stored = store.get("p1").await.unwrap().document;
    assert_eq!(stored["contract_number"], "N-2024-118");
}
