//! Task management core.
//!
//! This module provides:
//! - The task record and its static column/priority metadata ([`models`])
//! - The in-memory [`TaskStore`] with single and bulk mutations
//! - Filter criteria for bulk operations ([`TaskCriteria`])
//! - Parsing of bulk inputs: status pairs, integer ranges, delimited tables ([`bulk`])
//! - Read-only projections for list and board views ([`view`])
//!
//! # Example
//!
//! ```
//! use taskflow::tasks::{NewTask, Priority, RangeRequest, Status, TaskCriteria, TaskStore};
//!
//! let mut store = TaskStore::new();
//! store.create(NewTask::new("Fix login bug").with_priority(Priority::High));
//! store.bulk_create_from_range(&RangeRequest::new("1", "3")).unwrap();
//!
//! let moved = store.move_matching(
//!     Status::Todo,
//!     Status::InProgress,
//!     &TaskCriteria::any().with_priority(Priority::High),
//! );
//! assert_eq!(moved, 1);
//! assert_eq!(store.len(), 4);
//! ```

pub mod bulk;
pub mod filter;
pub mod id;
pub mod models;
pub mod store;
pub mod view;

pub use bulk::{RangeRequest, TableRow, ValidationError, DEFAULT_MAX_BULK_CREATE};
pub use filter::TaskCriteria;
pub use models::{
    Column, InvalidPriority, InvalidStatus, NewTask, Priority, PriorityConfig, Status, Task,
    COLUMNS, PRIORITY_CONFIG,
};
pub use store::{BulkDeleteOutcome, TaskStore, UpdateOutcome};
