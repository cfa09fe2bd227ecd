//! Task model types: the record schema plus column and priority metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Task priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority (default).
    #[default]
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// All priority levels, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Get the string representation of the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Display metadata for this priority.
    #[must_use]
    pub fn config(self) -> &'static PriorityConfig {
        match self {
            Self::Low => &PRIORITY_CONFIG[0],
            Self::Medium => &PRIORITY_CONFIG[1],
            Self::High => &PRIORITY_CONFIG[2],
        }
    }
}

impl FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(InvalidPriority(s.to_string())),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when an invalid priority string is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPriority(pub String);

impl std::fmt::Display for InvalidPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid priority: '{}' (must be one of: low, medium, high)", self.0)
    }
}

impl std::error::Error for InvalidPriority {}

/// Task status. Determines board column and completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Ready to be started.
    #[default]
    Todo,
    /// Currently being worked on.
    InProgress,
    /// Completed.
    Done,
}

impl Status {
    /// All statuses in board column order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Get the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// The board column this status maps to.
    #[must_use]
    pub fn column(self) -> &'static Column {
        match self {
            Self::Todo => &COLUMNS[0],
            Self::InProgress => &COLUMNS[1],
            Self::Done => &COLUMNS[2],
        }
    }

    /// The status the list view's complete checkbox flips to.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Done => Self::Todo,
            Self::Todo | Self::InProgress => Self::Done,
        }
    }
}

impl FromStr for Status {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when an invalid status string is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatus(pub String);

impl std::fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid status: '{}' (must be one of: todo, in_progress, done)", self.0)
    }
}

impl std::error::Error for InvalidStatus {}

/// A board column. Static layout metadata, not user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Status whose tasks live in this column.
    pub id: Status,
    /// Column heading.
    pub title: &'static str,
    /// One-line explanation shown under the heading.
    pub description: &'static str,
}

/// The three board columns, in display order.
pub static COLUMNS: [Column; 3] = [
    Column { id: Status::Todo, title: "To Do", description: "Tasks ready to be started" },
    Column {
        id: Status::InProgress,
        title: "In Progress",
        description: "Currently being worked on",
    },
    Column { id: Status::Done, title: "Done", description: "Completed tasks" },
];

/// Display metadata for a priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityConfig {
    /// Human-readable label.
    pub label: &'static str,
    /// Single-glyph icon.
    pub icon: &'static str,
}

/// Priority display metadata, indexed low → high.
pub static PRIORITY_CONFIG: [PriorityConfig; 3] = [
    PriorityConfig { label: "Low", icon: "○" },
    PriorityConfig { label: "Medium", icon: "◐" },
    PriorityConfig { label: "High", icon: "●" },
];

/// A task tracked by the store.
///
/// Serialized with camelCase field names and ISO-8601 timestamps; optional
/// fields are omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, fixed for the task's lifetime.
    pub id: String,
    /// Display text.
    pub title: String,
    /// Optional free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Priority level.
    pub priority: Priority,
    /// Current status.
    pub status: Status,
    /// When the task was created.
    #[serde(with = "crate::persistence::dates")]
    pub created_at: DateTime<Utc>,
    /// When an observable field last changed.
    #[serde(with = "crate::persistence::dates")]
    pub updated_at: DateTime<Utc>,
    /// Optional deadline.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::persistence::dates::option"
    )]
    pub due_date: Option<DateTime<Utc>>,
    /// Free-text labels, insertion order preserved.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Optional person responsible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Optional grouping label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Task {
    /// Build a task from creation fields with the given id and timestamp.
    #[must_use]
    pub fn from_new(id: String, fields: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            priority: fields.priority,
            status: fields.status,
            created_at: now,
            updated_at: now,
            due_date: fields.due_date,
            tags: fields.tags,
            assignee: fields.assignee,
            category: fields.category,
        }
    }

    /// Whether the task is in the done column.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }

    /// A task is overdue iff it has a due date earlier than `now`.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| due < now)
    }

    /// Whether the task carries the given tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Every task field except the ones the store assigns (`id`, timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Display text. Callers trim and reject empty titles before creating.
    pub title: String,
    /// Optional free text.
    #[serde(default)]
    pub description: Option<String>,
    /// Priority level.
    #[serde(default)]
    pub priority: Priority,
    /// Initial status.
    #[serde(default)]
    pub status: Status,
    /// Optional deadline.
    #[serde(default, with = "crate::persistence::dates::option")]
    pub due_date: Option<DateTime<Utc>>,
    /// Free-text labels.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional person responsible.
    #[serde(default)]
    pub assignee: Option<String>,
    /// Optional grouping label.
    #[serde(default)]
    pub category: Option<String>,
}

impl NewTask {
    /// Start a `todo`, medium-priority task with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Append a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Set the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}
