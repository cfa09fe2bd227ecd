//! Read-only projections over the task collection.
//!
//! Everything here borrows tasks and never mutates them.

use crate::tasks::models::{Column, Priority, Status, Task, COLUMNS};
use chrono::{DateTime, Utc};

/// Tasks of one board column, in collection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnGroup<'a> {
    /// The column's static metadata.
    pub column: &'static Column,
    /// Tasks whose status maps to this column.
    pub tasks: Vec<&'a Task>,
}

impl ColumnGroup<'_> {
    /// Count and high-priority count for the column header.
    #[must_use]
    pub fn stats(&self) -> ColumnStats {
        ColumnStats {
            total: self.tasks.len(),
            high_priority: self.tasks.iter().filter(|t| t.priority == Priority::High).count(),
        }
    }
}

/// Per-column header numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnStats {
    /// Tasks in the column.
    pub total: usize,
    /// High-priority tasks in the column.
    pub high_priority: usize,
}

/// Totals shown above the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    /// All tasks.
    pub total: usize,
    /// Tasks with status `done`.
    pub completed: usize,
    /// Everything else.
    pub remaining: usize,
}

/// Group tasks into the three board columns, in column order.
#[must_use]
pub fn group_by_status(tasks: &[Task]) -> Vec<ColumnGroup<'_>> {
    COLUMNS
        .iter()
        .map(|column| ColumnGroup { column, tasks: with_status(tasks, column.id) })
        .collect()
}

/// Tasks with the given status, in collection order.
#[must_use]
pub fn with_status(tasks: &[Task], status: Status) -> Vec<&Task> {
    tasks.iter().filter(|t| t.status == status).collect()
}

/// Tasks with the given priority, in collection order.
#[must_use]
pub fn filter_by_priority(tasks: &[Task], priority: Priority) -> Vec<&Task> {
    tasks.iter().filter(|t| t.priority == priority).collect()
}

/// Tasks whose due date has passed.
#[must_use]
pub fn overdue(tasks: &[Task], now: DateTime<Utc>) -> Vec<&Task> {
    tasks.iter().filter(|t| t.is_overdue(now)).collect()
}

/// Total, completed and remaining counts.
#[must_use]
pub fn stats(tasks: &[Task]) -> TaskStats {
    let completed = tasks.iter().filter(|t| t.is_done()).count();
    TaskStats { total: tasks.len(), completed, remaining: tasks.len() - completed }
}
