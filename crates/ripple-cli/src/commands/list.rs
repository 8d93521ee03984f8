use std::sync::Arc;

use anyhow::Result;
use ripple_core::store::{SqliteStore, TaskStore};

use crate::views::table::display_tasks;

pub async fn list_tasks(store: &Arc<SqliteStore>) -> Result<()> {
    let rows = store.list_tasks_with_depth().await?;
    display_tasks(&rows);
    Ok(())
}
