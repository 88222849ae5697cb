//! History and status projections over pre-seeded interval logs.

use serde_json::json;
use siteshift_engine::{ShiftEngine, ShiftRecordKind, ShiftScope, ShiftStatus};
use siteshift_store::MemoryStore;
use siteshift_test_utils::{closed_interval, open_interval, ts};
use std::sync::Arc;

fn seeded() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert(
        "p1",
        json!({
            "project_id": "p1",
            "project_name": "Block A",
            "foreman_id": "f1",
            "work_stages": [{
                "stage_id": "s1",
                "work_kinds": [{
                    "work_kind_id": "k1",
                    "work_kind_name": "Concrete",
                    "work_types": [{
                        "work_type_id": "t1",
                        "work_type_name": "Pouring",
                        "tasks": [{
                            "task_id": "task-1",
                            "task_name": "Slab",
                            "time_intervals": [
                                closed_interval("2024-03-02T08:00:00Z", "2024-03-02T16:00:00Z")
                            ],
                            "subtasks": [{
                                "subtask_id": "sub-1",
                                "subtask_name": "Rebar",
                                "time_intervals": [
                                    closed_interval("2024-03-01T08:00:00Z", "2024-03-01T12:00:00Z"),
                                    open_interval("2024-03-03T07:30:00Z")
                                ]
                            }]
                        }]
                    }]
                }]
            }]
        }),
    );
    store
}

#[tokio::test]
async fn history_is_chronological_across_leaves() {
    let engine = ShiftEngine::new(Arc::new(seeded()));
    let scope = ShiftScope::foreman("f1").with_project("p1");

    let records = engine.shift_history(&scope).await.unwrap();
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].kind, ShiftRecordKind::Subtask);
    assert_eq!(records[0].start_time, Some(ts("2024-03-01T08:00:00Z")));
    assert_eq!(records[1].kind, ShiftRecordKind::Task);
    assert_eq!(records[1].start_time, Some(ts("2024-03-02T08:00:00Z")));
    assert_eq!(records[2].start_time, Some(ts("2024-03-03T07:30:00Z")));
    assert!(records[2].end_time.is_none());

    let subtask_record = &records[0];
    assert_eq!(subtask_record.project_name.as_deref(), Some("Block A"));
    assert_eq!(subtask_record.task_id.as_deref(), Some("task-1"));
    assert_eq!(subtask_record.subtask_name.as_deref(), Some("Rebar"));
    assert_eq!(subtask_record.work_kind_name.as_deref(), Some("Concrete"));
}

#[tokio::test]
async fn status_reflects_the_open_subtask_interval() {
    let engine = ShiftEngine::new(Arc::new(seeded()));
    let scope = ShiftScope::foreman("f1").with_project("p1");
    assert_eq!(engine.shift_status(&scope).await.unwrap(), ShiftStatus::Working);
}

#[tokio::test]
async fn status_over_an_empty_scope_is_not_working() {
    let engine = ShiftEngine::new(Arc::new(MemoryStore::new()));
    let scope = ShiftScope::foreman("f-nobody");
    assert_eq!(
        engine.shift_status(&scope).await.unwrap(),
        ShiftStatus::NotWorking
    );
}
