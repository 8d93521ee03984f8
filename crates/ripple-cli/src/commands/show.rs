use std::sync::Arc;

use anyhow::{anyhow, Result};
use owo_colors::OwoColorize;
use ripple_core::models::RecurrenceFrequency;
use ripple_core::store::{AttachmentStore, SqliteStore, TaskStore};

use crate::cli::ShowCommand;
use crate::util::resolve_task_id;

pub async fn show_task(store: &Arc<SqliteStore>, command: ShowCommand) -> Result<()> {
    let task_id = resolve_task_id(store.as_ref(), &command.id).await?;
    let task = store
        .get_task(task_id)
        .await?
        .ok_or_else(|| anyhow!("Task with ID '{}' not found", task_id))?;

    println!("{} [{}]", task.title.bold(), task.status);
    println!("  ID:       {}", task.id.to_string().yellow());
    if let Some(parent_id) = task.parent_id {
        println!("  Parent:   {}", parent_id.to_string().yellow());
    }
    if let Some(description) = &task.description {
        println!("  About:    {}", description);
    }
    println!("  Window:   {} → {}", task.start_at.format("%Y-%m-%d %H:%M"), task.due_at.format("%Y-%m-%d %H:%M"));
    if let Some(completed_at) = task.completed_at {
        println!("  Done at:  {}", completed_at.format("%Y-%m-%d %H:%M"));
    }
    if task.recurrence != RecurrenceFrequency::OneOff {
        println!(
            "  Recurs:   {} (interval {})",
            task.recurrence,
            task.recurrence_interval.unwrap_or(1)
        );
    }
    if let Some(assignee) = &task.assignee {
        println!("  Assignee: {}", assignee);
    }
    println!("  Creator:  {}", task.created_by);
    if task.is_replication_product {
        println!("  {}", "Created by recurrence replication".bright_black());
    }

    let tags = store.list_tags(task.id).await?;
    if !tags.is_empty() {
        println!("  Tags:     {}", tags.join(", "));
    }

    let subtasks = store.subtasks_of(task.id).await?;
    if !subtasks.is_empty() {
        println!("\n{}", "Subtasks".bold());
        for subtask in &subtasks {
            println!(
                "  {} {} [{}]",
                (&subtask.id.to_string()[..7]).yellow(),
                subtask.title,
                subtask.status
            );
        }
    }

    let attachments = store.list_attachments(task.id).await?;
    if !attachments.is_empty() {
        println!("\n{}", "Attachments".bold());
        for attachment in &attachments {
            println!(
                "  {} (uploaded by {})",
                attachment.file_name, attachment.uploaded_by
            );
        }
    }

    let comments = store.list_comments(task.id).await?;
    if !comments.is_empty() {
        println!("\n{}", "Comments".bold());
        for comment in &comments {
            println!(
                "  {} ({}): {}",
                comment.author.bold(),
                comment.created_at.format("%Y-%m-%d %H:%M"),
                comment.body
            );
        }
    }

    Ok(())
}
