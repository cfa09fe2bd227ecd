//! Bulk operation inputs: validation, integer ranges and delimited tables.
//!
//! These helpers turn loosely-typed text (as it arrives from an external
//! actor) into the typed requests the [`TaskStore`](crate::tasks::TaskStore)
//! bulk operations consume.
//!
//! # Delimited table format
//!
//! ```text
//! category,priority,title
//! work,high,Prepare quarterly report
//! home,low,"Buy paint, brushes"
//! ```
//!
//! The first line is a header and is skipped. Each remaining line must split
//! into at least three comma-separated fields (`category, priority, title`);
//! anything shorter is dropped silently. Double-quoted fields may contain
//! commas, and `""` inside quotes is a literal quote. Priority text is
//! lower-cased and falls back to `medium` when unrecognised.

use crate::tasks::models::{Priority, Status};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::RangeInclusive;

/// Default upper bound on how many tasks a single range request may create.
pub const DEFAULT_MAX_BULK_CREATE: usize = 500;

/// One delimiter plus the field after it: a quoted string or a run of non-commas.
///
/// Lines are matched with a leading comma added, so every field match
/// consumes a delimiter and an empty first field is still its own match.
static TABLE_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#",[ \t]*(?:"((?:[^"]|"")*)"|([^,]*))"#).expect("valid table field regex")
});

/// Input rejected by a bulk store operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A status range is missing one or both ends.
    #[error("'from' and 'to' are required")]
    MissingStatusRange,

    /// A status name is not one of the three columns.
    #[error("invalid status: '{0}'")]
    InvalidStatus(String),

    /// An explicit priority is not one of the three levels.
    #[error("invalid priority: '{0}'")]
    InvalidPriority(String),

    /// A range bound does not parse as an integer.
    #[error("range bound is not an integer: '{0}'")]
    InvalidRangeBound(String),

    /// A range would create more tasks than allowed.
    #[error("range of {requested} tasks exceeds the maximum of {max}")]
    RangeTooLarge {
        /// Number of tasks the range spans.
        requested: u64,
        /// Configured maximum.
        max: usize,
    },

    /// A task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,
}

/// A request to create one task per integer in an inclusive range.
///
/// Bounds and priority are kept as text; they are validated when the
/// request is executed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeRequest {
    /// Lower bound, as text.
    pub from: String,
    /// Upper bound, as text.
    pub to: String,
    /// Category for every created task.
    pub category: Option<String>,
    /// Explicit priority name; `None` means `medium`.
    pub priority: Option<String>,
    /// Single tag for every created task.
    pub tag: Option<String>,
}

impl RangeRequest {
    /// A range request with no optional fields.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { from: from.into(), to: to.into(), ..Self::default() }
    }
}

/// One parsed row of a delimited table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Category; `None` when the field was blank.
    pub category: Option<String>,
    /// Normalized priority.
    pub priority: Priority,
    /// Task title.
    pub title: String,
}

/// Parse a required status pair.
///
/// # Errors
///
/// Returns [`ValidationError::MissingStatusRange`] if either end is absent or
/// blank and [`ValidationError::InvalidStatus`] if either names no status.
pub fn parse_status_pair(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(Status, Status), ValidationError> {
    let (Some(from), Some(to)) = (non_blank(from), non_blank(to)) else {
        return Err(ValidationError::MissingStatusRange);
    };
    let parse = |s: &str| s.parse::<Status>().map_err(|e| ValidationError::InvalidStatus(e.0));
    Ok((parse(from)?, parse(to)?))
}

/// Parse an optional explicit priority, defaulting to `medium`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidPriority`] if a priority is given but is
/// not `low`, `medium` or `high`.
pub fn parse_priority(priority: Option<&str>) -> Result<Priority, ValidationError> {
    non_blank(priority).map_or(Ok(Priority::Medium), |p| {
        p.parse().map_err(|_| ValidationError::InvalidPriority(p.to_string()))
    })
}

/// Parse the integer bounds of a range.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidRangeBound`] naming the first bound that
/// is not an integer.
pub fn parse_range(from: &str, to: &str) -> Result<RangeInclusive<i64>, ValidationError> {
    let parse = |s: &str| {
        s.trim().parse::<i64>().map_err(|_| ValidationError::InvalidRangeBound(s.to_string()))
    };
    Ok(parse(from)?..=parse(to)?)
}

/// Number of integers in an inclusive range; zero when `start > end`.
#[must_use]
pub fn range_len(range: &RangeInclusive<i64>) -> u64 {
    if range.start() > range.end() {
        return 0;
    }
    let span = i128::from(*range.end()) - i128::from(*range.start()) + 1;
    u64::try_from(span).unwrap_or(u64::MAX)
}

/// Title given to the task created for integer `i` of a range.
#[must_use]
pub fn range_title(i: i64) -> String {
    format!("Task {i}")
}

/// Split one delimited line into trimmed fields.
fn split_fields(line: &str) -> Vec<String> {
    let line = format!(",{line}");
    TABLE_FIELD
        .captures_iter(&line)
        .map(|caps| {
            caps.get(1).map_or_else(
                || caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
                |quoted| quoted.as_str().replace("\"\"", "\""),
            )
        })
        .collect()
}

/// Parse delimited text into rows, skipping the header line.
///
/// Rows with fewer than three fields or a blank title are dropped.
#[must_use]
pub fn parse_table(text: &str) -> Vec<TableRow> {
    text.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let fields = split_fields(line);
            if fields.len() < 3 {
                return None;
            }
            let title = fields[2].trim().to_string();
            if title.is_empty() {
                return None;
            }
            let category = Some(fields[0].trim().to_string()).filter(|c| !c.is_empty());
            let priority = fields[1].trim().to_lowercase().parse().unwrap_or(Priority::Medium);
            Some(TableRow { category, priority, title })
        })
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
