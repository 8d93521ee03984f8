use std::sync::Arc;

use anyhow::Result;
use ripple_core::models::NewAttachmentData;
use ripple_core::store::{AttachmentStore, SqliteStore};

use crate::cli::AttachCommand;
use crate::util::resolve_task_id;

pub async fn attach_file(store: &Arc<SqliteStore>, command: AttachCommand, actor: &str) -> Result<()> {
    let task_id = resolve_task_id(store.as_ref(), &command.id).await?;
    let attachment = store
        .add_attachment(NewAttachmentData {
            task_id,
            file_name: command.file_name,
            uploaded_by: actor.to_string(),
        })
        .await?;
    println!("Attached '{}' ({})", attachment.file_name, attachment.id);
    Ok(())
}
