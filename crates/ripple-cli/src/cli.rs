use clap::{Parser, Subcommand, ValueEnum};
use ripple_core::models::RecurrenceFrequency;

/// Task management with recurrence that ripples across subtasks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new task
    Add(AddCommand),
    /// List tasks
    List,
    /// Show a task with its subtasks, attachments and comments
    Show(ShowCommand),
    /// Move a task to In Progress
    Start(StartCommand),
    /// Mark a task as Blocked
    Block(BlockCommand),
    /// Complete a task (and replicate it if it recurs)
    Do(DoCommand),
    /// Delete a task
    Delete(DeleteCommand),
    /// Attach a file reference to a task
    Attach(AttachCommand),
    /// Comment on a task
    Comment(CommentCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the task
    pub title: String,
    /// The description of the task
    #[clap(short, long)]
    pub description: Option<String>,
    /// The start date of the task (defaults to now)
    #[clap(short, long)]
    pub start: Option<String>,
    /// The due date of the task
    #[clap(long)]
    pub due: String,
    /// Who the task is assigned to
    #[clap(short, long)]
    pub assign: Option<String>,
    /// Tags to add to the task
    #[clap(short, long, num_args = 1..)]
    pub tag: Vec<String>,
    /// The parent task ID (makes this a subtask)
    #[clap(long)]
    pub parent: Option<String>,
    /// Recurrence frequency
    #[clap(long, value_enum)]
    pub every: Option<FrequencyArg>,
    /// Recurrence interval in units of the frequency
    #[clap(long, default_value = "1", requires = "every")]
    pub interval: i32,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// The ID of the task to show
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct StartCommand {
    /// The ID of the task to start
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct BlockCommand {
    /// The ID of the task to mark as blocked
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DoCommand {
    /// The ID of the task to mark as completed
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the task to delete
    pub id: String,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct AttachCommand {
    /// The ID of the task to attach to
    pub id: String,
    /// The file name to register
    pub file_name: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CommentCommand {
    /// The ID of the task to comment on
    pub id: String,
    /// The comment text
    pub text: String,
}

/// Human-friendly recurrence frequencies
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyArg {
    /// Every N days
    Daily,
    /// Every N weeks
    Weekly,
    /// Every N months
    Monthly,
    /// Every N years
    Yearly,
}

impl From<FrequencyArg> for RecurrenceFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Daily => RecurrenceFrequency::Daily,
            FrequencyArg::Weekly => RecurrenceFrequency::Weekly,
            FrequencyArg::Monthly => RecurrenceFrequency::Monthly,
            FrequencyArg::Yearly => RecurrenceFrequency::Yearly,
        }
    }
}
