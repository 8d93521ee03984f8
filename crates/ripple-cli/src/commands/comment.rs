use std::sync::Arc;

use anyhow::Result;
use ripple_core::store::{SqliteStore, TaskStore};

use crate::cli::CommentCommand;
use crate::util::resolve_task_id;

pub async fn comment_on_task(
    store: &Arc<SqliteStore>,
    command: CommentCommand,
    actor: &str,
) -> Result<()> {
    let task_id = resolve_task_id(store.as_ref(), &command.id).await?;
    store.add_comment(task_id, actor, &command.text).await?;
    println!("Comment added.");
    Ok(())
}
