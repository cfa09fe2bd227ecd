//! Command-line interface for taskflow.
//!
//! Subcommands mirror what the list and board views let a person do by hand,
//! plus `command` for invoking the named commands an assistant would use.

mod run;

#[cfg(test)]
mod tests;

pub use run::{run, CliOutput};

use crate::persistence::dates;
use crate::tasks::{Priority, Status};
use crate::theme::Theme;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

/// Taskflow - a task list and Kanban board kept in one local store.
///
/// Data lives in `$TASKFLOW_HOME` or `~/.taskflow`.
#[derive(Parser, Debug)]
#[command(name = "taskflow")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a task.
    ///
    /// The title is trimmed and must not be empty. New tasks start in "todo".
    Add {
        /// Task title
        title: String,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,

        /// Priority: low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: Priority,

        /// Grouping label
        #[arg(short, long)]
        category: Option<String>,

        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Due date, YYYY-MM-DD or RFC 3339
        #[arg(long, value_parser = parse_due)]
        due: Option<DateTime<Utc>>,

        /// Person responsible
        #[arg(short, long)]
        assignee: Option<String>,
    },

    /// Show every task with completion stats.
    List {
        /// Only show tasks with this priority
        #[arg(short, long)]
        priority: Option<Priority>,
    },

    /// Show the board: one column per status.
    Board,

    /// Move a task to another column.
    Move {
        /// Task ID
        id: String,

        /// Target status: todo, in_progress or done
        status: Status,
    },

    /// Change fields of a task.
    ///
    /// Only the given fields change. An unknown ID with a --title creates
    /// the task under that ID.
    Edit {
        /// Task ID
        id: String,

        /// Fields to change
        #[command(flatten)]
        changes: TaskEdit,
    },

    /// Flip a task between "done" and "todo".
    Toggle {
        /// Task ID
        id: String,
    },

    /// Delete a task.
    Delete {
        /// Task ID
        id: String,
    },

    /// Show or change the theme.
    Theme {
        /// New theme: light, dark, ocean, sunset, forest or cyberpunk
        name: Option<Theme>,
    },

    /// Run a named command with JSON arguments.
    ///
    /// Prints the same response an assistant would receive, e.g.
    ///   taskflow command move_todos '{"from":"todo","to":"done"}'
    Command {
        /// Command name, e.g. `bulk_delete`
        name: String,

        /// JSON object with the command's arguments
        #[arg(default_value = "{}")]
        args: String,
    },

    /// Print the status report (same as the `read_todos` command).
    Report,

    /// Create the config file with defaults if it does not exist.
    #[command(name = "ensure-config")]
    EnsureConfig,
}

impl Command {
    /// Returns true if this command can change stored state.
    #[must_use]
    pub const fn mutates(&self) -> bool {
        matches!(
            self,
            Self::Add { .. }
                | Self::Move { .. }
                | Self::Edit { .. }
                | Self::Toggle { .. }
                | Self::Delete { .. }
                | Self::Theme { name: Some(_) }
                | Self::Command { .. }
        )
    }
}

/// Field changes for `edit`. Empty text clears an optional field.
#[derive(Args, Debug, Clone, Default)]
pub struct TaskEdit {
    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// New description
    #[arg(short, long)]
    pub description: Option<String>,

    /// New priority: low, medium or high
    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// New status: todo, in_progress or done
    #[arg(short, long)]
    pub status: Option<Status>,

    /// New grouping label
    #[arg(short, long)]
    pub category: Option<String>,

    /// New due date, YYYY-MM-DD or RFC 3339
    #[arg(long, value_parser = parse_due)]
    pub due: Option<DateTime<Utc>>,

    /// New assignee
    #[arg(short, long)]
    pub assignee: Option<String>,
}

fn parse_due(text: &str) -> Result<DateTime<Utc>, String> {
    dates::parse(text).map_err(|e| format!("invalid date '{text}': {e}"))
}
