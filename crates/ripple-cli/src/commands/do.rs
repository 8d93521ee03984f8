use std::sync::Arc;

use anyhow::{anyhow, Result};
use ripple_core::completion::{may_complete_from, CompletionOrchestrator};
use ripple_core::models::{CompletionReport, TaskStatus};
use ripple_core::store::{SqliteStore, TaskStore};

use crate::cli::DoCommand;
use crate::sink::ConsoleSink;
use crate::util::resolve_task_id;

pub async fn do_task(store: &Arc<SqliteStore>, command: DoCommand, actor: &str) -> Result<()> {
    let task_id = resolve_task_id(store.as_ref(), &command.id).await?;
    let task = store
        .get_task(task_id)
        .await?
        .ok_or_else(|| anyhow!("Task with ID '{}' not found", task_id))?;

    if task.status == TaskStatus::Completed {
        return Err(anyhow!("Task '{}' is already completed.", task.title));
    }
    if !may_complete_from(task.status) {
        return Err(anyhow!(
            "Only a task that is in progress can be completed. Start '{}' first.",
            task.title
        ));
    }

    let orchestrator =
        CompletionOrchestrator::new(store.clone(), store.clone(), Arc::new(ConsoleSink));
    let (completed, report) = orchestrator.complete(task_id, actor).await?;

    println!("Completed task: '{}'", completed.title);
    if let CompletionReport::Replicated { occurrence, .. } = report {
        println!(
            "Next occurrence of '{}' due {}",
            occurrence.title,
            occurrence.due_at.to_rfc2822()
        );
    }

    Ok(())
}
