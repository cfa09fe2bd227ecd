//! Per-command argument decoding.
//!
//! Every command receives its arguments as a JSON-encoded string. Decoding
//! turns that string into a [`Command`] with validated, typed fields, or a
//! [`CommandError`] whose `Display` is the exact sentence sent back to the
//! caller.

use crate::commands::CommandName;
use crate::tasks::bulk::{parse_status_pair, RangeRequest, ValidationError};
use crate::tasks::{Priority, Status, TaskCriteria};
use crate::theme::Theme;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// A decode or validation failure, rendered as a fixed sentence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Arguments are not a JSON object of the expected shape.
    #[error("Error: Invalid arguments. Expected a JSON object.")]
    InvalidArguments,

    /// `move_todos` without both statuses.
    #[error("Error: 'from' and 'to' are required.")]
    MissingStatusRange,

    /// A status name matched nothing.
    #[error("Error: Invalid status '{0}'. Use one of: todo, in_progress, done.")]
    InvalidStatus(String),

    /// A priority name matched nothing.
    #[error("Error: Invalid priority '{0}'. Use one of: low, medium, high.")]
    InvalidPriority(String),

    /// A range bound is not an integer.
    #[error("Error: 'from' and 'to' must be integers.")]
    InvalidRangeBound,

    /// `create_bulk_tasks` with neither a table nor a full range.
    #[error("Error: Provide either 'csv' or both 'from' and 'to'.")]
    MissingBulkSource,

    /// A range spans more tasks than allowed.
    #[error("Error: Range too large ({requested} tasks requested, maximum is {max}).")]
    RangeTooLarge {
        /// Tasks the range spans.
        requested: u64,
        /// Configured maximum.
        max: usize,
    },

    /// A task title is blank.
    #[error("Error: Title is required.")]
    EmptyTitle,

    /// `change_theme` without a theme.
    #[error("Error: 'theme' is required.")]
    MissingTheme,

    /// A theme name matched nothing.
    #[error("Error: Unknown theme '{0}'. Use one of: light, dark, ocean, sunset, forest, cyberpunk.")]
    UnknownTheme(String),

    /// No handler is registered under the name.
    #[error("Error: Unknown command '{0}'.")]
    UnknownCommand(String),

    /// The command ran but its output could not be produced.
    #[error("Error: {0}")]
    Internal(String),
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingStatusRange => Self::MissingStatusRange,
            ValidationError::InvalidStatus(s) => Self::InvalidStatus(s),
            ValidationError::InvalidPriority(p) => Self::InvalidPriority(p),
            ValidationError::InvalidRangeBound(_) => Self::InvalidRangeBound,
            ValidationError::RangeTooLarge { requested, max } => {
                Self::RangeTooLarge { requested, max }
            }
            ValidationError::EmptyTitle => Self::EmptyTitle,
        }
    }
}

/// A decoded command, ready to run against a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch to a theme.
    ChangeTheme(Theme),
    /// Delete tasks matching the criteria (empty means done-only).
    BulkDelete(TaskCriteria),
    /// Move tasks between statuses.
    MoveTodos {
        /// Source status.
        from: Status,
        /// Target status.
        to: Status,
        /// Extra filters; status is never set here.
        criteria: TaskCriteria,
    },
    /// Create one task per integer in a range.
    CreateFromRange(RangeRequest),
    /// Create tasks from a delimited table.
    CreateFromCsv {
        /// Table text including its header line.
        csv: String,
        /// Tag for every created task.
        tag: Option<String>,
    },
    /// Render the grouped report.
    ReadTodos,
    /// Switch to the focus theme.
    ActivateFocusMode,
    /// Leave the focus theme.
    DeactivateFocusMode,
}

#[derive(Debug, Default, Deserialize)]
struct ThemeArgs {
    theme: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FilterArgs {
    status: Option<String>,
    category: Option<String>,
    priority: Option<String>,
    tag: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MoveArgs {
    from: Option<String>,
    to: Option<String>,
    category: Option<String>,
    priority: Option<String>,
    tag: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BulkCreateArgs {
    csv: Option<String>,
    from: Option<Value>,
    to: Option<Value>,
    category: Option<String>,
    priority: Option<String>,
    tag: Option<String>,
}

/// Parse `args` as a JSON object into `T`.
fn parse_object<T: DeserializeOwned>(args: &str) -> Result<T, CommandError> {
    let text = if args.trim().is_empty() { "{}" } else { args };
    let value: Value = serde_json::from_str(text).map_err(|_| CommandError::InvalidArguments)?;
    if !value.is_object() {
        return Err(CommandError::InvalidArguments);
    }
    serde_json::from_value(value).map_err(|_| CommandError::InvalidArguments)
}

/// Blank strings count as absent.
fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_status(text: &str) -> Result<Status, CommandError> {
    text.parse().map_err(|_| CommandError::InvalidStatus(text.to_string()))
}

fn parse_priority(text: &str) -> Result<Priority, CommandError> {
    text.parse().map_err(|_| CommandError::InvalidPriority(text.to_string()))
}

/// A range bound as text: integers and strings pass through, anything else is rejected.
fn bound_text(value: Option<Value>) -> Result<Option<String>, CommandError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::String(s)) => Ok(present(Some(s))),
        Some(_) => Err(CommandError::InvalidRangeBound),
    }
}

/// Criteria from optional category, priority and tag.
fn optional_criteria(
    category: Option<String>,
    priority: Option<String>,
    tag: Option<String>,
) -> Result<TaskCriteria, CommandError> {
    Ok(TaskCriteria {
        status: None,
        category: present(category),
        priority: present(priority).as_deref().map(parse_priority).transpose()?,
        tag: present(tag),
    })
}

impl Command {
    /// Decode the arguments for `name`.
    ///
    /// # Errors
    ///
    /// Returns the [`CommandError`] to report when the arguments are not a
    /// JSON object or fail the command's validation.
    pub fn decode(name: CommandName, args: &str) -> Result<Self, CommandError> {
        match name {
            CommandName::ChangeTheme => {
                let args: ThemeArgs = parse_object(args)?;
                let theme = present(args.theme).ok_or(CommandError::MissingTheme)?;
                theme.parse().map(Self::ChangeTheme).map_err(|_| CommandError::UnknownTheme(theme))
            }
            CommandName::BulkDelete => {
                let args: FilterArgs = parse_object(args)?;
                let mut criteria = optional_criteria(args.category, args.priority, args.tag)?;
                criteria.status = present(args.status).as_deref().map(parse_status).transpose()?;
                Ok(Self::BulkDelete(criteria))
            }
            CommandName::MoveTodos => {
                let args: MoveArgs = parse_object(args)?;
                let (from, to) = parse_status_pair(args.from.as_deref(), args.to.as_deref())?;
                let criteria = optional_criteria(args.category, args.priority, args.tag)?;
                Ok(Self::MoveTodos { from, to, criteria })
            }
            CommandName::CreateBulkTasks => {
                let args: BulkCreateArgs = parse_object(args)?;
                if let Some(csv) = args.csv.filter(|c| !c.trim().is_empty()) {
                    return Ok(Self::CreateFromCsv { csv, tag: present(args.tag) });
                }
                match (bound_text(args.from)?, bound_text(args.to)?) {
                    (Some(from), Some(to)) => Ok(Self::CreateFromRange(RangeRequest {
                        from,
                        to,
                        category: present(args.category),
                        priority: present(args.priority),
                        tag: present(args.tag),
                    })),
                    _ => Err(CommandError::MissingBulkSource),
                }
            }
            CommandName::ReadTodos => Ok(Self::ReadTodos),
            CommandName::ActivateFocusMode => Ok(Self::ActivateFocusMode),
            CommandName::DeactivateFocusMode => Ok(Self::DeactivateFocusMode),
        }
    }
}
