use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use owo_colors::{OwoColorize, Style};
use ripple_core::models::{NewTaskData, RecurrenceFrequency};
use ripple_core::store::{SqliteStore, TaskStore};

use crate::cli::AddCommand;
use crate::parser::parse_date;
use crate::util::resolve_task_id;

pub async fn add_task(store: &Arc<SqliteStore>, command: AddCommand, actor: &str) -> Result<()> {
    let start_at = command
        .start
        .as_deref()
        .map(parse_date)
        .transpose()?
        .unwrap_or_else(Utc::now);
    let due_at = parse_date(&command.due)?;

    let parent_id = match &command.parent {
        Some(parent) => Some(resolve_task_id(store.as_ref(), parent).await?),
        None => None,
    };

    let (recurrence, recurrence_interval) = match command.every {
        Some(every) => (every.into(), Some(command.interval)),
        None => (RecurrenceFrequency::OneOff, None),
    };

    let task = store
        .create_task(NewTaskData {
            title: command.title,
            description: command.description,
            parent_id,
            start_at,
            due_at,
            recurrence,
            recurrence_interval,
            assignee: command.assign,
            created_by: actor.to_string(),
            tags: command.tag,
            ..Default::default()
        })
        .await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();
    if recurrence == RecurrenceFrequency::OneOff {
        println!("{} Created task: {}", "✓".style(success_style), task.title.bold());
    } else {
        println!(
            "{} Created recurring task (every {} {}): {}",
            "✓".style(success_style),
            command.interval,
            unit_name(recurrence, command.interval),
            task.title.bold()
        );
    }
    println!("  {} Task ID: {}", "→".style(info_style), task.id.to_string().yellow());
    println!(
        "  {} Due: {}",
        "→".style(info_style),
        task.due_at.format("%Y-%m-%d %H:%M").to_string().cyan()
    );

    Ok(())
}

fn unit_name(frequency: RecurrenceFrequency, interval: i32) -> &'static str {
    let plural = interval != 1;
    match (frequency, plural) {
        (RecurrenceFrequency::Daily, false) => "day",
        (RecurrenceFrequency::Daily, true) => "days",
        (RecurrenceFrequency::Weekly, false) => "week",
        (RecurrenceFrequency::Weekly, true) => "weeks",
        (RecurrenceFrequency::Monthly, false) => "month",
        (RecurrenceFrequency::Monthly, true) => "months",
        (RecurrenceFrequency::Yearly, false) => "year",
        (RecurrenceFrequency::Yearly, true) => "years",
        (RecurrenceFrequency::OneOff, _) => "",
    }
}
