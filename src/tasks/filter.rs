//! Filter criteria for bulk operations.
//!
//! A criteria set is a conjunction: a task matches iff every *specified*
//! criterion matches, and unspecified criteria match everything. Category and
//! tag comparisons ignore ASCII case.

use crate::tasks::models::{Priority, Status, Task};
use std::fmt;

/// Optional AND-combined filters over status, category, priority and tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskCriteria {
    /// Match tasks with this status.
    pub status: Option<Status>,
    /// Match tasks in this category.
    pub category: Option<String>,
    /// Match tasks with this priority.
    pub priority: Option<Priority>,
    /// Match tasks carrying this tag.
    pub tag: Option<String>,
}

impl TaskCriteria {
    /// Criteria that match every task.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Restrict to a status.
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to a priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restrict to a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// True when no criterion is specified.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.tag.is_none()
    }

    /// Whether `task` satisfies every specified criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        if let Some(category) = &self.category {
            let same = task.category.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(category));
            if !same {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !task.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }
        true
    }

    /// The specified criteria as `(name, value)` pairs, in a fixed order.
    #[must_use]
    pub fn applied(&self) -> Vec<(&'static str, String)> {
        let mut applied = Vec::new();
        if let Some(status) = self.status {
            applied.push(("status", status.as_str().to_string()));
        }
        if let Some(category) = &self.category {
            applied.push(("category", category.clone()));
        }
        if let Some(priority) = self.priority {
            applied.push(("priority", priority.as_str().to_string()));
        }
        if let Some(tag) = &self.tag {
            applied.push(("tag", tag.clone()));
        }
        applied
    }
}

/// Renders as `status "done", category "work"`; empty criteria render as nothing.
impl fmt::Display for TaskCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> =
            self.applied().into_iter().map(|(name, value)| format!("{name} \"{value}\"")).collect();
        f.write_str(&parts.join(", "))
    }
}
