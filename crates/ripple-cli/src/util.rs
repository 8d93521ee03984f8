use anyhow::{anyhow, Result};
use ripple_core::error::CoreError;
use ripple_core::store::TaskStore;
use uuid::Uuid;

use crate::config::Config;

pub async fn resolve_task_id(store: &dyn TaskStore, short_id: &str) -> Result<Uuid> {
    if short_id.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }
    let tasks = store.find_tasks_by_id_prefix(short_id).await?;
    if tasks.len() == 1 {
        Ok(tasks[0].id)
    } else if tasks.is_empty() {
        Err(anyhow!(CoreError::NotFound(format!(
            "No task found with ID prefix '{}'",
            short_id
        ))))
    } else {
        let task_info: Vec<(String, String)> = tasks
            .into_iter()
            .map(|t| (t.id.to_string(), t.title))
            .collect();
        Err(anyhow!(CoreError::AmbiguousId(task_info)))
    }
}

/// The actor recorded on creations and completions: configured name first,
/// then the login user, then a fixed fallback.
pub fn resolve_actor(config: &Config) -> String {
    if let Some(actor) = &config.actor {
        return actor.clone();
    }
    std::env::var("USER").unwrap_or_else(|_| "ripple".to_string())
}
