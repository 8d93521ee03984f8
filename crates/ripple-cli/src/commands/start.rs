use std::sync::Arc;

use anyhow::{anyhow, Result};
use ripple_core::models::{TaskStatus, UpdateTaskData};
use ripple_core::store::{SqliteStore, TaskStore};

use crate::cli::StartCommand;
use crate::util::resolve_task_id;

pub async fn start_task(store: &Arc<SqliteStore>, command: StartCommand) -> Result<()> {
    let task_id = resolve_task_id(store.as_ref(), &command.id).await?;
    let task = store
        .get_task(task_id)
        .await?
        .ok_or_else(|| anyhow!("Task with ID '{}' not found", task_id))?;

    match task.status {
        TaskStatus::Completed => {
            return Err(anyhow!("Task '{}' is already completed.", task.title))
        }
        TaskStatus::InProgress => {
            println!("Task '{}' is already in progress.", task.title);
            return Ok(());
        }
        TaskStatus::Todo | TaskStatus::Blocked => {}
    }

    let task = store
        .update_task(
            task_id,
            UpdateTaskData {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
        )
        .await?;
    println!("Started task: '{}'", task.title);
    Ok(())
}
