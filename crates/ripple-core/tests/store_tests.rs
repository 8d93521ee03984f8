use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;
use uuid::Uuid;

use ripple_core::completion::CompletionOrchestrator;
use ripple_core::db::establish_connection;
use ripple_core::error::CoreError;
use ripple_core::models::{
    CompletionReport, NewAttachmentData, NewTaskData, RecurrenceFrequency, TaskStatus,
    UpdateTaskData,
};
use ripple_core::notify::NullSink;
use ripple_core::store::{AttachmentStore, SqliteStore, TaskStore};

/// Helper function to create a test database
async fn setup_test_store() -> (Arc<SqliteStore>, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");

    let pool = establish_connection(&db_path.to_string_lossy())
        .await
        .expect("Failed to establish test database connection");

    (Arc::new(SqliteStore::new(pool)), temp_dir)
}

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn new_task(title: &str) -> NewTaskData {
    NewTaskData {
        title: title.to_string(),
        description: Some(format!("Test task: {}", title)),
        start_at: at(2025, 10, 20, 9, 0),
        due_at: at(2025, 10, 30, 17, 0),
        created_by: "tester".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn task_crud_round_trip() {
    let (store, _temp_dir) = setup_test_store().await;

    let mut data = new_task("Write minutes");
    data.tags = vec!["meeting".to_string(), "ops".to_string()];
    data.assignee = Some("robin".to_string());
    let task = store.create_task(data).await.unwrap();

    assert_eq!(task.status, TaskStatus::Todo);
    assert!(task.completed_at.is_none());
    assert!(!task.is_replication_product);

    let fetched = store.get_task(task.id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Write minutes");
    assert_eq!(fetched.assignee.as_deref(), Some("robin"));
    assert_eq!(fetched.start_at, task.start_at);
    assert_eq!(fetched.due_at, task.due_at);

    let tags = store.list_tags(task.id).await.unwrap();
    assert_eq!(tags, vec!["meeting".to_string(), "ops".to_string()]);

    let updated = store
        .update_task(
            task.id,
            UpdateTaskData {
                status: Some(TaskStatus::InProgress),
                assignee: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.assignee, None);

    store.delete_task(task.id).await.unwrap();
    assert!(store.get_task(task.id).await.unwrap().is_none());
}

#[tokio::test]
async fn create_rejects_due_before_start() {
    let (store, _temp_dir) = setup_test_store().await;

    let mut data = new_task("Backwards");
    data.due_at = data.start_at - Duration::hours(1);
    let err = store.create_task(data).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));
}

#[tokio::test]
async fn create_rejects_missing_parent() {
    let (store, _temp_dir) = setup_test_store().await;

    let mut data = new_task("Orphan");
    data.parent_id = Some(Uuid::now_v7());
    let err = store.create_task(data).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn subtasks_are_scoped_to_their_parent() {
    let (store, _temp_dir) = setup_test_store().await;

    let parent = store.create_task(new_task("Parent")).await.unwrap();
    let other = store.create_task(new_task("Other")).await.unwrap();

    let mut child = new_task("Child");
    child.parent_id = Some(parent.id);
    store.create_task(child).await.unwrap();

    let subtasks = store.subtasks_of(parent.id).await.unwrap();
    assert_eq!(subtasks.len(), 1);
    assert_eq!(subtasks[0].title, "Child");
    assert!(store.subtasks_of(other.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn comments_round_trip() {
    let (store, _temp_dir) = setup_test_store().await;

    let task = store.create_task(new_task("Discussed")).await.unwrap();
    store
        .add_comment(task.id, "robin", "double-check the totals")
        .await
        .unwrap();

    let comments = store.list_comments(task.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author, "robin");
    assert_eq!(comments[0].body, "double-check the totals");
}

#[tokio::test]
async fn id_prefix_lookup_finds_tasks() {
    let (store, _temp_dir) = setup_test_store().await;

    let task = store.create_task(new_task("Findable")).await.unwrap();
    let prefix = &task.id.to_string()[..8];

    let found = store.find_tasks_by_id_prefix(prefix).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, task.id);

    assert!(store
        .find_tasks_by_id_prefix("ffffffff")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn hierarchy_listing_tracks_depth_and_tags() {
    let (store, _temp_dir) = setup_test_store().await;

    let mut root = new_task("Root");
    root.tags = vec!["top".to_string()];
    let root = store.create_task(root).await.unwrap();
    let mut child = new_task("Child");
    child.parent_id = Some(root.id);
    store.create_task(child).await.unwrap();

    let rows = store.list_tasks_with_depth().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].title, "Root");
    assert_eq!(rows[0].depth, 0);
    assert_eq!(rows[0].tags.as_deref(), Some("top"));
    assert_eq!(rows[1].title, "Child");
    assert_eq!(rows[1].depth, 1);
}

#[tokio::test]
async fn attachments_copy_as_fresh_rows_on_the_target() {
    let (store, _temp_dir) = setup_test_store().await;

    let source = store.create_task(new_task("Source")).await.unwrap();
    let target = store.create_task(new_task("Target")).await.unwrap();
    store
        .add_attachment(NewAttachmentData {
            task_id: source.id,
            file_name: "contract.pdf".to_string(),
            uploaded_by: "robin".to_string(),
        })
        .await
        .unwrap();
    store
        .add_attachment(NewAttachmentData {
            task_id: source.id,
            file_name: "floorplan.png".to_string(),
            uploaded_by: "sam".to_string(),
        })
        .await
        .unwrap();

    let copy = store.copy_attachments(source.id, target.id).await.unwrap();
    assert_eq!(copy.copied_count, 2);

    let copied = store.list_attachments(target.id).await.unwrap();
    assert_eq!(copied.len(), 2);
    assert!(copied.iter().all(|a| a.task_id == target.id));
    // Fresh rows, not moved ones: the source keeps its attachments.
    assert_eq!(store.list_attachments(source.id).await.unwrap().len(), 2);

    let originals = store.list_attachments(source.id).await.unwrap();
    for replica in &copied {
        assert!(originals.iter().all(|o| o.id != replica.id));
    }
}

/// Full engine pass against the real store: a weekly task with two subtasks
/// replicates itself and cascades across both.
#[tokio::test]
async fn end_to_end_completion_cascade() {
    let (store, _temp_dir) = setup_test_store().await;
    let orchestrator: CompletionOrchestrator =
        CompletionOrchestrator::new(store.clone(), store.clone(), Arc::new(NullSink));

    let mut parent = new_task("Quarterly report");
    parent.status = TaskStatus::InProgress;
    parent.recurrence = RecurrenceFrequency::Weekly;
    parent.recurrence_interval = Some(1);
    let parent = store.create_task(parent).await.unwrap();

    for title in ["Collect figures", "Draft summary"] {
        let mut sub = new_task(title);
        sub.parent_id = Some(parent.id);
        sub.start_at = at(2025, 10, 21, 9, 0);
        sub.due_at = at(2025, 10, 25, 17, 0);
        let sub = store.create_task(sub).await.unwrap();
        store
            .update_task(
                sub.id,
                UpdateTaskData {
                    status: Some(TaskStatus::Completed),
                    completed_at: Some(Some(Utc::now())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .add_attachment(NewAttachmentData {
                task_id: sub.id,
                file_name: format!("{}.xlsx", title),
                uploaded_by: "robin".to_string(),
            })
            .await
            .unwrap();
    }

    let (completed, report) = orchestrator.complete(parent.id, "dana").await.unwrap();
    assert_eq!(completed.status, TaskStatus::Completed);

    let CompletionReport::Replicated { occurrence, cascade } = report else {
        panic!("expected a replicated occurrence");
    };
    assert_eq!(occurrence.start_at, at(2025, 10, 27, 9, 0));
    assert_eq!(occurrence.due_at, at(2025, 11, 6, 17, 0));

    let outcome = cascade.unwrap();
    assert_eq!(outcome.created, 2);
    assert_eq!(outcome.attempted, 2);
    assert!(outcome.errors.is_empty());

    let replicas = store.subtasks_of(occurrence.id).await.unwrap();
    assert_eq!(replicas.len(), 2);
    for replica in &replicas {
        assert_eq!(replica.status, TaskStatus::Todo);
        assert!(replica.completed_at.is_none());
        assert!(replica.is_replication_product);
        assert_eq!(replica.parent_id, Some(occurrence.id));
        assert_eq!(replica.start_at, at(2025, 10, 28, 9, 0));
        assert_eq!(replica.due_at, at(2025, 11, 1, 17, 0));
        assert_eq!(store.list_attachments(replica.id).await.unwrap().len(), 1);
        assert!(store.list_comments(replica.id).await.unwrap().is_empty());
    }

    // Completing the replicated occurrence immediately would be gated on its
    // open subtask replicas.
    let next = store
        .update_task(
            occurrence.id,
            UpdateTaskData {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let err = orchestrator.complete(next.id, "dana").await.unwrap_err();
    assert!(matches!(err, CoreError::SubtasksOpen));
}
