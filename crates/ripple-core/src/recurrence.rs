//! Pure recurrence arithmetic. No I/O, and expected outcomes are values,
//! never errors: a task that simply does not recur yields `None`, and a
//! subtask window that falls outside its parent's yields a typed
//! [`WindowError`].

use chrono::{DateTime, Duration, Months, Utc};
use thiserror::Error;

use crate::models::{RecurrenceFrequency, Task};

/// Why a shifted subtask window is not usable under its new parent.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowError {
    #[error("start date exceeds parent task due date")]
    StartExceedsParentDue,

    #[error("due date exceeds parent task due date")]
    DueExceedsParentDue,

    #[error("shifted date is out of range")]
    OutOfRange,
}

/// The `{start, due}` pair describing when one occurrence is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskWindow {
    pub start_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
}

/// Advances `from` by `interval` units of `frequency`.
///
/// Monthly and yearly shifts clamp to the last day of the target month
/// (Jan 31 + 1 month = Feb 28/29). Returns `None` for `OneOff`, a
/// non-positive interval, or a result outside chrono's representable range.
pub fn shift(
    from: DateTime<Utc>,
    frequency: RecurrenceFrequency,
    interval: i32,
) -> Option<DateTime<Utc>> {
    if interval <= 0 {
        return None;
    }
    match frequency {
        RecurrenceFrequency::OneOff => None,
        RecurrenceFrequency::Daily => from.checked_add_signed(Duration::days(interval as i64)),
        RecurrenceFrequency::Weekly => from.checked_add_signed(Duration::weeks(interval as i64)),
        RecurrenceFrequency::Monthly => from.checked_add_months(Months::new(interval as u32)),
        RecurrenceFrequency::Yearly => (interval as u32)
            .checked_mul(12)
            .and_then(|months| from.checked_add_months(Months::new(months))),
    }
}

/// Computes the start of the task's next occurrence, or `None` when the task
/// does not recur: it is one-off, its interval is absent or non-positive, or
/// the candidate start would land strictly after the current due date.
pub fn next_occurrence_start(task: &Task) -> Option<DateTime<Utc>> {
    let interval = task.recurrence_interval?;
    let candidate = shift(task.start_at, task.recurrence, interval)?;
    if candidate > task.due_at {
        return None;
    }
    Some(candidate)
}

/// The full window of the task's next occurrence.
///
/// Both ends move by the same offset, so the occurrence keeps its duration.
/// Suppression is decided by [`next_occurrence_start`] alone: the candidate
/// start is compared against the *original* due date.
pub fn next_occurrence_window(task: &Task) -> Option<TaskWindow> {
    let start_at = next_occurrence_start(task)?;
    let due_at = shift(task.due_at, task.recurrence, task.recurrence_interval?)?;
    Some(TaskWindow { start_at, due_at })
}

/// Shifts a subtask's window in lock-step with its parent's recurrence and
/// validates it against the parent's new due date.
///
/// Subtasks do not recur independently: `frequency` and `interval` are the
/// *parent's*, and both bounds of the shifted window must fall on or before
/// `parent_new_due`.
pub fn next_subtask_window(
    parent_new_due: DateTime<Utc>,
    subtask: &Task,
    frequency: RecurrenceFrequency,
    interval: i32,
) -> Result<TaskWindow, WindowError> {
    let new_start = shift(subtask.start_at, frequency, interval).ok_or(WindowError::OutOfRange)?;
    let new_due = shift(subtask.due_at, frequency, interval).ok_or(WindowError::OutOfRange)?;
    if new_start > parent_new_due {
        return Err(WindowError::StartExceedsParentDue);
    }
    if new_due > parent_new_due {
        return Err(WindowError::DueExceedsParentDue);
    }
    Ok(TaskWindow {
        start_at: new_start,
        due_at: new_due,
    })
}
