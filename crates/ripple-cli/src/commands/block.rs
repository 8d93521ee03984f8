use std::sync::Arc;

use anyhow::{anyhow, Result};
use ripple_core::models::{TaskStatus, UpdateTaskData};
use ripple_core::store::{SqliteStore, TaskStore};

use crate::cli::BlockCommand;
use crate::util::resolve_task_id;

pub async fn block_task(store: &Arc<SqliteStore>, command: BlockCommand) -> Result<()> {
    let task_id = resolve_task_id(store.as_ref(), &command.id).await?;
    let task = store
        .get_task(task_id)
        .await?
        .ok_or_else(|| anyhow!("Task with ID '{}' not found", task_id))?;

    if task.status == TaskStatus::Completed {
        return Err(anyhow!("Task '{}' is already completed.", task.title));
    }

    let task = store
        .update_task(
            task_id,
            UpdateTaskData {
                status: Some(TaskStatus::Blocked),
                ..Default::default()
            },
        )
        .await?;
    println!("Blocked task: '{}'", task.title);
    Ok(())
}
