use chrono::Utc;
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use ripple_core::models::{RecurrenceFrequency, TaskStatus};
use ripple_core::store::TaskListRow;

pub fn display_tasks(tasks: &[TaskListRow]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Status", "Due", "Assignee", "Tags"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(&task.id.to_string()[..7]));

        let indentation = "  ".repeat(task.depth as usize);

        let mut display_title = String::new();
        display_title.push_str(&indentation);
        if task.recurrence_interval.is_some() && task.recurrence != RecurrenceFrequency::OneOff {
            display_title.push('↻');
            display_title.push(' ');
        }
        display_title.push_str(&task.title);
        if task.is_replication_product {
            display_title.push_str(" (replica)");
        }

        let mut title_cell = Cell::new(display_title);
        title_cell = match task.status {
            TaskStatus::Completed => title_cell
                .add_attribute(Attribute::CrossedOut)
                .fg(Color::DarkGrey),
            TaskStatus::Blocked => title_cell.fg(Color::Red),
            TaskStatus::InProgress => title_cell.fg(Color::Yellow),
            TaskStatus::Todo => title_cell,
        };
        row.add_cell(title_cell);

        let mut status_cell = Cell::new(task.status.to_string());
        status_cell = match task.status {
            TaskStatus::Completed => status_cell.fg(Color::Green),
            TaskStatus::Blocked => status_cell.fg(Color::Red),
            TaskStatus::InProgress => status_cell.fg(Color::Yellow),
            TaskStatus::Todo => status_cell,
        };
        row.add_cell(status_cell);

        let due_text = task.due_at.humanize();
        let due_cell = if task.status != TaskStatus::Completed && task.due_at < Utc::now() {
            Cell::new(due_text).fg(Color::Red) // Overdue
        } else {
            Cell::new(due_text)
        };
        row.add_cell(due_cell);

        row.add_cell(Cell::new(task.assignee.as_deref().unwrap_or("None")));
        row.add_cell(Cell::new(task.tags.as_deref().unwrap_or("None")));
        table.add_row(row);
    }

    println!("{table}");
}
