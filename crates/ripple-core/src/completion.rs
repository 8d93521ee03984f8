//! The completion and recurrence cascade engine.
//!
//! Completing a task runs through four pieces, in order:
//!
//! 1. [`CompletionGate`]: a main task may not complete while any of its
//!    subtasks is still open; subtasks complete unconditionally.
//! 2. [`OccurrenceReplicator`]: a recurring task is cloned into its next
//!    occurrence with reset lifecycle fields; its attachments are copied
//!    best-effort.
//! 3. [`SubtaskCascadeReplicator`]: every original (non-replicated) subtask
//!    of the completed task is replicated under the new occurrence, each one
//!    independently; failures are aggregated, never fatal to siblings.
//! 4. [`CompletionOrchestrator`]: sequences the above and reports outcomes
//!    through the injected notification sink.
//!
//! Replication never mutates the completed task; it only produces payloads
//! for the store to create. There is no rollback: a partially replicated
//! cascade is a supported, reported state.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{
    CascadeFailure, CascadeOutcome, CompletionReport, NewTaskData, Task, TaskStatus,
    UpdateTaskData,
};
use crate::notify::{NotificationSink, Severity};
use crate::recurrence::{self, TaskWindow};
use crate::store::{AttachmentStore, TaskStore};

/// Read-only dependency check guarding the transition to `Completed`.
///
/// Callers run this *before* persisting the status flip. The adjacent
/// prior-state rule (only an in-progress task may complete) belongs to the
/// presentation layer; see [`may_complete_from`].
pub struct CompletionGate {
    tasks: Arc<dyn TaskStore>,
}

impl CompletionGate {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    /// `Ok(())` to allow, `Err(CoreError::SubtasksOpen)` to deny. A subtask
    /// is never denied on account of its siblings.
    pub async fn can_complete(&self, task: &Task) -> Result<(), CoreError> {
        if task.is_subtask() {
            return Ok(());
        }
        let subtasks = self.tasks.subtasks_of(task.id).await?;
        if subtasks.iter().any(|s| s.status != TaskStatus::Completed) {
            return Err(CoreError::SubtasksOpen);
        }
        Ok(())
    }
}

/// Prior-state business rule kept adjacent to the gate: only a task that is
/// currently in progress may move to `Completed`.
pub fn may_complete_from(status: TaskStatus) -> bool {
    status == TaskStatus::InProgress
}

/// Builds and commits the next occurrence of a completed, recurring task.
pub struct OccurrenceReplicator {
    tasks: Arc<dyn TaskStore>,
    attachments: Arc<dyn AttachmentStore>,
}

impl OccurrenceReplicator {
    pub fn new(tasks: Arc<dyn TaskStore>, attachments: Arc<dyn AttachmentStore>) -> Self {
        Self { tasks, attachments }
    }

    /// Produces the payload for the task's next occurrence, or `None` when
    /// the task does not recur.
    ///
    /// The payload copies the task verbatim except for the lifecycle fields:
    /// no id, shifted window, `To Do` status, no completion timestamp, no
    /// comments, and `created_by` set to the completing actor. The new
    /// occurrence is a sibling of the original, never its child.
    pub async fn replicate_task(
        &self,
        task: &Task,
        actor: &str,
    ) -> Result<Option<NewTaskData>, CoreError> {
        let Some(window) = recurrence::next_occurrence_window(task) else {
            return Ok(None);
        };
        let tags = self.tasks.list_tags(task.id).await?;
        Ok(Some(NewTaskData {
            title: task.title.clone(),
            description: task.description.clone(),
            parent_id: None,
            status: TaskStatus::Todo,
            start_at: window.start_at,
            due_at: window.due_at,
            recurrence: task.recurrence,
            recurrence_interval: task.recurrence_interval,
            assignee: task.assignee.clone(),
            created_by: actor.to_string(),
            is_replication_product: true,
            tags,
        }))
    }

    /// Submits the payload to the task store, then copies the source task's
    /// attachments onto the created occurrence. A failed attachment copy is
    /// logged and swallowed; the occurrence still counts as created. A failed
    /// create propagates to the caller.
    pub async fn commit(&self, source: &Task, payload: NewTaskData) -> Result<Task, CoreError> {
        let created = self.tasks.create_task(payload).await?;
        if let Err(err) = self
            .attachments
            .copy_attachments(source.id, created.id)
            .await
        {
            warn!(
                source_task = %source.id,
                new_task = %created.id,
                error = %err,
                "attachment copy failed; keeping the created occurrence"
            );
        }
        Ok(created)
    }
}

/// Replicates the completed task's original subtasks under its new
/// occurrence and aggregates the per-subtask outcomes.
pub struct SubtaskCascadeReplicator {
    tasks: Arc<dyn TaskStore>,
    attachments: Arc<dyn AttachmentStore>,
}

impl SubtaskCascadeReplicator {
    pub fn new(tasks: Arc<dyn TaskStore>, attachments: Arc<dyn AttachmentStore>) -> Self {
        Self { tasks, attachments }
    }

    /// Runs the cascade. Subtasks flagged as replication products are
    /// excluded up front, so re-running over the same parent never
    /// double-replicates a sibling this engine already produced.
    ///
    /// Each remaining subtask is processed independently and sequentially; a
    /// window violation or create failure is recorded against that subtask
    /// and the loop moves on.
    pub async fn cascade(
        &self,
        original_parent: &Task,
        new_parent: &Task,
        actor: &str,
    ) -> Result<CascadeOutcome, CoreError> {
        let subtasks = self.tasks.subtasks_of(original_parent.id).await?;
        let eligible: Vec<Task> = subtasks
            .into_iter()
            .filter(|s| !s.is_replication_product)
            .collect();

        let mut outcome = CascadeOutcome {
            attempted: eligible.len(),
            ..Default::default()
        };
        let frequency = original_parent.recurrence;
        let interval = original_parent.recurrence_interval.unwrap_or(0);

        for subtask in &eligible {
            let window = match recurrence::next_subtask_window(
                new_parent.due_at,
                subtask,
                frequency,
                interval,
            ) {
                Ok(window) => window,
                Err(violation) => {
                    outcome.errors.push(CascadeFailure {
                        task_id: subtask.id,
                        title: subtask.title.clone(),
                        reason: violation.to_string(),
                    });
                    continue;
                }
            };

            match self.replicate_one(subtask, new_parent.id, window, actor).await {
                Ok(created) => {
                    debug!(subtask = %subtask.id, replica = %created.id, "subtask replicated");
                    outcome.created += 1;
                }
                Err(err) => {
                    outcome.errors.push(CascadeFailure {
                        task_id: subtask.id,
                        title: subtask.title.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(outcome)
    }

    async fn replicate_one(
        &self,
        subtask: &Task,
        new_parent_id: Uuid,
        window: TaskWindow,
        actor: &str,
    ) -> Result<Task, CoreError> {
        let tags = self.tasks.list_tags(subtask.id).await?;
        let payload = NewTaskData {
            title: subtask.title.clone(),
            description: subtask.description.clone(),
            parent_id: Some(new_parent_id),
            status: TaskStatus::Todo,
            start_at: window.start_at,
            due_at: window.due_at,
            recurrence: subtask.recurrence,
            recurrence_interval: subtask.recurrence_interval,
            assignee: subtask.assignee.clone(),
            created_by: actor.to_string(),
            is_replication_product: true,
            tags,
        };
        let created = self.tasks.create_task(payload).await?;
        if let Err(err) = self
            .attachments
            .copy_attachments(subtask.id, created.id)
            .await
        {
            warn!(
                source_task = %subtask.id,
                new_task = %created.id,
                error = %err,
                "attachment copy failed; keeping the replicated subtask"
            );
        }
        Ok(created)
    }
}

/// Entry point for the presentation layer. Owns the gate, the replicators
/// and the notification sink. Store failures never panic the triggering
/// flow; they become notifications.
pub struct CompletionOrchestrator {
    tasks: Arc<dyn TaskStore>,
    gate: CompletionGate,
    replicator: OccurrenceReplicator,
    cascade: SubtaskCascadeReplicator,
    sink: Arc<dyn NotificationSink>,
}

impl CompletionOrchestrator {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        attachments: Arc<dyn AttachmentStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            gate: CompletionGate::new(tasks.clone()),
            replicator: OccurrenceReplicator::new(tasks.clone(), attachments.clone()),
            cascade: SubtaskCascadeReplicator::new(tasks.clone(), attachments),
            tasks,
            sink,
        }
    }

    /// Full completion flow: gate, persist the status flip, then replicate.
    ///
    /// A gate denial aborts before any mutation and surfaces as
    /// [`CoreError::SubtasksOpen`] with its actionable message.
    pub async fn complete(
        &self,
        task_id: Uuid,
        actor: &str,
    ) -> Result<(Task, CompletionReport), CoreError> {
        let task = self
            .tasks
            .get_task(task_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(task_id.to_string()))?;
        self.gate.can_complete(&task).await?;

        let completed = self
            .tasks
            .update_task(
                task_id,
                UpdateTaskData {
                    status: Some(TaskStatus::Completed),
                    completed_at: Some(Some(Utc::now())),
                    ..Default::default()
                },
            )
            .await?;

        let report = self.on_task_completed(&completed, actor).await;
        Ok((completed, report))
    }

    /// Reacts to a task that has already been persisted as `Completed`.
    ///
    /// Non-recurring tasks end the flow silently. Otherwise the next
    /// occurrence is committed first (the cascade needs its id and due date),
    /// then the subtask cascade runs and its aggregate is reported.
    pub async fn on_task_completed(&self, task: &Task, actor: &str) -> CompletionReport {
        let payload = match self.replicator.replicate_task(task, actor).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(task = %task.id, "task does not recur; nothing to replicate");
                return CompletionReport::NotRecurring;
            }
            Err(err) => {
                warn!(task = %task.id, error = %err, "building the next occurrence failed");
                self.sink
                    .notify("Failed to create replicated task. Please try again", Severity::Error);
                return CompletionReport::OccurrenceFailed;
            }
        };

        let occurrence = match self.replicator.commit(task, payload).await {
            Ok(occurrence) => occurrence,
            Err(err) => {
                warn!(task = %task.id, error = %err, "creating the next occurrence failed");
                self.sink
                    .notify("Failed to create replicated task. Please try again", Severity::Error);
                return CompletionReport::OccurrenceFailed;
            }
        };
        self.sink.notify("Replicated task created", Severity::Success);

        let cascade = match self.cascade.cascade(task, &occurrence, actor).await {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                warn!(task = %task.id, error = %err, "subtask cascade could not run");
                self.sink.notify(
                    &format!("Failed to replicate subtasks: {}", err),
                    Severity::Warning,
                );
                None
            }
        };

        if let Some(outcome) = &cascade {
            if outcome.attempted > 0 {
                if outcome.errors.is_empty() {
                    self.sink.notify(
                        &format!("{} recurring subtasks have been created.", outcome.created),
                        Severity::Success,
                    );
                } else {
                    self.sink.notify(
                        &format!(
                            "Only {} out of {} recurring subtasks have been created. Errors: {}",
                            outcome.created,
                            outcome.attempted,
                            outcome.joined_errors()
                        ),
                        Severity::Warning,
                    );
                }
            }
        }

        CompletionReport::Replicated { occurrence, cascade }
    }
}
