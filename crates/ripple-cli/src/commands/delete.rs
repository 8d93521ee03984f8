use std::sync::Arc;

use anyhow::{anyhow, Result};
use dialoguer::Confirm;
use ripple_core::store::{SqliteStore, TaskStore};

use crate::cli::DeleteCommand;
use crate::util::resolve_task_id;

pub async fn delete_task(store: &Arc<SqliteStore>, command: DeleteCommand) -> Result<()> {
    let task_id = resolve_task_id(store.as_ref(), &command.id).await?;
    let task = store
        .get_task(task_id)
        .await?
        .ok_or_else(|| anyhow!("Task with ID '{}' not found", task_id))?;

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!(
                "Are you sure you want to delete task '{}' (subtasks go with it)?",
                task.title
            ))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    store.delete_task(task_id).await?;
    println!("Deleted task: '{}'", task.title);
    Ok(())
}
