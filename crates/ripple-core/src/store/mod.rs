use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    Attachment, AttachmentCopy, Comment, NewAttachmentData, NewTaskData, RecurrenceFrequency,
    Task, TaskStatus, UpdateTaskData,
};

// Trait impls live in the domain modules
pub mod attachments;
pub mod tasks;

/// One row of the hierarchical task listing.
#[derive(Debug, Clone, FromRow)]
pub struct TaskListRow {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub title: String,
    pub status: TaskStatus,
    pub start_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub recurrence: RecurrenceFrequency,
    pub recurrence_interval: Option<i32>,
    pub assignee: Option<String>,
    pub is_replication_product: bool,
    pub depth: i32,
    pub tags: Option<String>,
}

/// The remote task API as the engine sees it. Creation assigns ids; every
/// call is a suspension point the caller awaits.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, data: NewTaskData) -> Result<Task, CoreError>;
    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, CoreError>;
    async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError>;
    async fn subtasks_of(&self, parent_id: Uuid) -> Result<Vec<Task>, CoreError>;
    async fn list_tags(&self, task_id: Uuid) -> Result<Vec<String>, CoreError>;
    async fn add_comment(&self, task_id: Uuid, author: &str, body: &str)
        -> Result<Comment, CoreError>;
    async fn list_comments(&self, task_id: Uuid) -> Result<Vec<Comment>, CoreError>;
    async fn find_tasks_by_id_prefix(&self, prefix: &str) -> Result<Vec<Task>, CoreError>;
    async fn list_tasks_with_depth(&self) -> Result<Vec<TaskListRow>, CoreError>;
}

/// Attachment storage, referenced by task id. Copying produces fresh rows on
/// the target task; callers treat a failed copy as non-fatal.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn add_attachment(&self, data: NewAttachmentData) -> Result<Attachment, CoreError>;
    async fn list_attachments(&self, task_id: Uuid) -> Result<Vec<Attachment>, CoreError>;
    async fn copy_attachments(
        &self,
        source_task_id: Uuid,
        target_task_id: Uuid,
    ) -> Result<AttachmentCopy, CoreError>;
}

/// SQLite implementation of both stores.
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Database pool for internal use across store modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}
