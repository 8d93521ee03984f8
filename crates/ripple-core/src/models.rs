use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
    Blocked,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task status: {0}")]
pub struct ParseTaskStatusError(String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todo" | "to-do" | "to_do" => Ok(TaskStatus::Todo),
            "inprogress" | "in-progress" | "in_progress" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            "blocked" => Ok(TaskStatus::Blocked),
            _ => Err(ParseTaskStatusError(s.to_string())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "To Do"),
            TaskStatus::InProgress => write!(f, "In Progress"),
            TaskStatus::Completed => write!(f, "Completed"),
            TaskStatus::Blocked => write!(f, "Blocked"),
        }
    }
}

/// How often a task recurs once completed. `OneOff` tasks never replicate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum RecurrenceFrequency {
    OneOff,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence frequency: {0}")]
pub struct ParseRecurrenceFrequencyError(String);

impl FromStr for RecurrenceFrequency {
    type Err = ParseRecurrenceFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "oneoff" | "one-off" | "once" | "none" => Ok(RecurrenceFrequency::OneOff),
            "daily" => Ok(RecurrenceFrequency::Daily),
            "weekly" => Ok(RecurrenceFrequency::Weekly),
            "monthly" => Ok(RecurrenceFrequency::Monthly),
            "yearly" => Ok(RecurrenceFrequency::Yearly),
            _ => Err(ParseRecurrenceFrequencyError(s.to_string())),
        }
    }
}

impl fmt::Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceFrequency::OneOff => write!(f, "one-off"),
            RecurrenceFrequency::Daily => write!(f, "daily"),
            RecurrenceFrequency::Weekly => write!(f, "weekly"),
            RecurrenceFrequency::Monthly => write!(f, "monthly"),
            RecurrenceFrequency::Yearly => write!(f, "yearly"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    /// Present exactly when this task is a subtask of another.
    pub parent_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub start_at: DateTime<Utc>,
    /// Must be >= `start_at`; enforced at the store boundary.
    pub due_at: DateTime<Utc>,
    /// Set exactly when `status == Completed`.
    pub completed_at: Option<DateTime<Utc>>,
    pub recurrence: RecurrenceFrequency,
    /// Meaningful only when `recurrence != OneOff`; must be positive to recur.
    pub recurrence_interval: Option<i32>,
    pub assignee: Option<String>,
    pub created_by: String,
    /// True for tasks this engine created as the next occurrence of another
    /// task. The cascade filter excludes flagged subtasks so a replicated
    /// sibling is never replicated again.
    pub is_replication_product: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            parent_id: None,
            title: "".to_string(),
            description: None,
            status: TaskStatus::Todo,
            start_at: Utc::now(),
            due_at: Utc::now(),
            completed_at: None,
            recurrence: RecurrenceFrequency::OneOff,
            recurrence_interval: None,
            assignee: None,
            created_by: "".to_string(),
            is_replication_product: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

impl Task {
    pub fn is_subtask(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Payload for creating a task. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewTaskData {
    pub title: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub status: TaskStatus,
    pub start_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub recurrence: RecurrenceFrequency,
    pub recurrence_interval: Option<i32>,
    pub assignee: Option<String>,
    pub created_by: String,
    pub is_replication_product: bool,
    pub tags: Vec<String>,
}

impl Default for NewTaskData {
    fn default() -> Self {
        Self {
            title: "".to_string(),
            description: None,
            parent_id: None,
            status: TaskStatus::Todo,
            start_at: Utc::now(),
            due_at: Utc::now(),
            recurrence: RecurrenceFrequency::OneOff,
            recurrence_interval: None,
            assignee: None,
            created_by: "".to_string(),
            is_replication_product: false,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTaskData {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    pub start_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub assignee: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub task_id: Uuid,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attachment {
    pub id: Uuid,
    pub task_id: Uuid,
    pub file_name: String,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAttachmentData {
    pub task_id: Uuid,
    pub file_name: String,
    pub uploaded_by: String,
}

/// Result of copying a task's attachments onto another task.
#[derive(Debug, Clone, Default)]
pub struct AttachmentCopy {
    pub copied_count: usize,
    pub copied: Vec<Attachment>,
}

/// One subtask that could not be replicated during a cascade.
#[derive(Debug, Clone)]
pub struct CascadeFailure {
    pub task_id: Uuid,
    pub title: String,
    pub reason: String,
}

impl fmt::Display for CascadeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': {}", self.title, self.reason)
    }
}

/// Aggregate outcome of replicating a completed task's subtasks.
///
/// `attempted` counts every eligible subtask; `created` counts the ones whose
/// replica was persisted. A failed subtask never stops its siblings.
#[derive(Debug, Default)]
pub struct CascadeOutcome {
    pub created: usize,
    pub attempted: usize,
    pub errors: Vec<CascadeFailure>,
}

impl CascadeOutcome {
    pub fn joined_errors(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// What a single completion did beyond flipping the task's status.
#[derive(Debug)]
pub enum CompletionReport {
    /// The task does not recur (or its next start would pass its due date).
    NotRecurring,
    /// The next occurrence could not be created; nothing was cascaded.
    OccurrenceFailed,
    /// The next occurrence exists. `cascade` is `None` when the subtask read
    /// itself failed, otherwise it holds the aggregate outcome.
    Replicated {
        occurrence: Task,
        cascade: Option<CascadeOutcome>,
    },
}
