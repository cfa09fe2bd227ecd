//! The in-memory task store.
//!
//! [`TaskStore`] is the sole owner of the task collection. Every structural
//! change goes through one of its methods, each of which leaves the
//! collection fully settled before returning. New tasks are prepended, so the
//! collection reads newest first.

use crate::tasks::bulk::{
    self, parse_priority, parse_range, parse_status_pair, range_len, range_title, RangeRequest,
    TableRow, ValidationError, DEFAULT_MAX_BULK_CREATE,
};
use crate::tasks::filter::TaskCriteria;
use crate::tasks::id::generate_task_id;
use crate::tasks::models::{NewTask, Status, Task};
use crate::traits::{Clock, SystemClock};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// What [`TaskStore::update`] did with the given record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A task with the same id was replaced in place.
    Replaced,
    /// No task had the id, so the record was prepended.
    Inserted,
}

/// Result of [`TaskStore::bulk_delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDeleteOutcome {
    /// Number of tasks removed.
    pub removed: usize,
    /// The criteria actually applied.
    pub criteria: TaskCriteria,
    /// True when no criteria were given and `status == done` was used.
    pub defaulted: bool,
}

/// Authoritative task collection with its mutation interface.
///
/// The store keeps a revision counter that increases on every mutation that
/// changed the collection. Persistence compares revisions to decide whether
/// a write is due.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    revision: u64,
    max_bulk_create: usize,
    clock: Box<dyn Clock>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// An empty store on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// An empty store reading time from `clock`.
    #[must_use]
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self { tasks: Vec::new(), revision: 0, max_bulk_create: DEFAULT_MAX_BULK_CREATE, clock }
    }

    /// Seed the store with previously persisted tasks.
    ///
    /// Later records whose id duplicates an earlier one are dropped. Seeding
    /// does not count as a mutation.
    #[must_use]
    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        let mut seen = HashSet::with_capacity(tasks.len());
        let before = tasks.len();
        self.tasks = tasks.into_iter().filter(|t| seen.insert(t.id.clone())).collect();
        if self.tasks.len() < before {
            tracing::warn!(dropped = before - self.tasks.len(), "dropped tasks with duplicate ids");
        }
        self
    }

    /// Cap the number of tasks one range request may create.
    #[must_use]
    pub const fn with_max_bulk_create(mut self, max: usize) -> Self {
        self.max_bulk_create = max;
        self
    }

    /// The configured range cap.
    #[must_use]
    pub const fn max_bulk_create(&self) -> usize {
        self.max_bulk_create
    }

    /// Current time according to the store's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Counter bumped by every mutation that changed the collection.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Read-only view of the collection, newest first.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True when the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Mint an id that is neither live nor already in `taken`, and reserve it.
    fn mint_id(title: &str, taken: &mut HashSet<String>) -> String {
        loop {
            let id = generate_task_id(title);
            if taken.insert(id.clone()) {
                return id;
            }
        }
    }

    fn live_ids(&self) -> HashSet<String> {
        self.tasks.iter().map(|t| t.id.clone()).collect()
    }

    /// Prepend a batch, keeping its internal order.
    fn prepend(&mut self, batch: Vec<Task>) {
        if batch.is_empty() {
            return;
        }
        self.tasks.splice(0..0, batch);
        self.touch();
    }

    /// Create a task and prepend it.
    ///
    /// The title is taken as given; callers trim and reject empty titles.
    pub fn create(&mut self, fields: NewTask) -> Task {
        let mut taken = self.live_ids();
        let id = Self::mint_id(&fields.title, &mut taken);
        let task = Task::from_new(id, fields, self.now());
        tracing::debug!(id = %task.id, "created task");
        self.prepend(vec![task.clone()]);
        task
    }

    /// Replace the task with the same id, or prepend the record if there is none.
    ///
    /// Replacement is whole-record and keeps the collection position. The
    /// record is stored exactly as given.
    pub fn update(&mut self, task: Task) -> UpdateOutcome {
        let outcome = if let Some(index) = self.position(&task.id) {
            self.tasks[index] = task;
            UpdateOutcome::Replaced
        } else {
            tracing::debug!(id = %task.id, "update of unknown id, inserting");
            self.tasks.insert(0, task);
            UpdateOutcome::Inserted
        };
        self.touch();
        outcome
    }

    /// Remove the task with `id`. Returns whether one was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.tasks.remove(index);
        self.touch();
        tracing::debug!(id, "deleted task");
        true
    }

    /// Move one task to `status`, refreshing `updatedAt`.
    ///
    /// Returns the task if it exists. Setting the status it already has
    /// changes nothing.
    pub fn set_status(&mut self, id: &str, status: Status) -> Option<Task> {
        let now = self.now();
        let index = self.position(id)?;
        if self.tasks[index].status != status {
            let task = &mut self.tasks[index];
            task.status = status;
            task.updated_at = now.max(task.created_at);
            self.touch();
        }
        Some(self.tasks[index].clone())
    }

    /// Flip a task between `done` and `todo` (an `in_progress` task becomes `done`).
    pub fn toggle_complete(&mut self, id: &str) -> Option<Task> {
        let status = self.get(id)?.status.toggled();
        self.set_status(id, status)
    }

    /// Delete every task matching `criteria`.
    ///
    /// Empty criteria are replaced by `status == done` so that an empty
    /// filter never clears the whole collection.
    pub fn bulk_delete(&mut self, criteria: TaskCriteria) -> BulkDeleteOutcome {
        let defaulted = criteria.is_empty();
        let criteria =
            if defaulted { TaskCriteria::any().with_status(Status::Done) } else { criteria };

        let before = self.tasks.len();
        self.tasks.retain(|t| !criteria.matches(t));
        let removed = before - self.tasks.len();
        if removed > 0 {
            self.touch();
        }
        tracing::info!(removed, filters = %criteria, defaulted, "bulk delete");
        BulkDeleteOutcome { removed, criteria, defaulted }
    }

    /// Move every task in `from` that matches `criteria` to `to`.
    ///
    /// Any status in `criteria` is ignored in favour of `from`. Returns the
    /// number of tasks matched.
    pub fn move_matching(&mut self, from: Status, to: Status, criteria: &TaskCriteria) -> usize {
        let criteria = TaskCriteria { status: Some(from), ..criteria.clone() };
        let now = self.now();
        let mut moved = 0;
        for task in self.tasks.iter_mut().filter(|t| criteria.matches(t)) {
            moved += 1;
            if from != to {
                task.status = to;
                task.updated_at = now.max(task.created_at);
            }
        }
        if moved > 0 && from != to {
            self.touch();
        }
        tracing::info!(moved, %from, %to, filters = %criteria, "bulk move");
        moved
    }

    /// Validate a status pair given as text, then [`move_matching`](Self::move_matching).
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if either status is missing or invalid;
    /// nothing is moved in that case.
    pub fn bulk_move(
        &mut self,
        from: Option<&str>,
        to: Option<&str>,
        criteria: &TaskCriteria,
    ) -> Result<usize, ValidationError> {
        let (from, to) = parse_status_pair(from, to)?;
        Ok(self.move_matching(from, to, criteria))
    }

    /// Create one `todo` task per integer in the request's inclusive range.
    ///
    /// The batch is prepended in ascending order and shares one timestamp.
    /// An empty range (`from > to`) creates nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a bound is not an integer, an explicit
    /// priority is invalid, or the range exceeds
    /// [`max_bulk_create`](Self::max_bulk_create). Nothing is created on error.
    pub fn bulk_create_from_range(
        &mut self,
        request: &RangeRequest,
    ) -> Result<Vec<Task>, ValidationError> {
        let range = parse_range(&request.from, &request.to)?;
        let priority = parse_priority(request.priority.as_deref())?;
        let requested = range_len(&range);
        if requested > self.max_bulk_create as u64 {
            return Err(ValidationError::RangeTooLarge { requested, max: self.max_bulk_create });
        }

        let category = non_empty(request.category.as_deref());
        let tag = non_empty(request.tag.as_deref());
        let now = self.now();
        let mut taken = self.live_ids();
        let batch: Vec<Task> = if requested == 0 {
            Vec::new()
        } else {
            range
                .map(|i| {
                    let title = range_title(i);
                    let fields = NewTask {
                        title,
                        priority,
                        category: category.clone(),
                        tags: tag.iter().cloned().collect(),
                        ..NewTask::default()
                    };
                    Task::from_new(Self::mint_id(&fields.title, &mut taken), fields, now)
                })
                .collect()
        };

        tracing::info!(
            created = batch.len(),
            from = %request.from,
            to = %request.to,
            "bulk create from range"
        );
        self.prepend(batch.clone());
        Ok(batch)
    }

    /// Create one `todo` task per table row, prepended as a batch in row order.
    pub fn bulk_create_from_table(&mut self, rows: Vec<TableRow>, tag: Option<&str>) -> Vec<Task> {
        let tag = non_empty(tag);
        let now = self.now();
        let mut taken = self.live_ids();
        let batch: Vec<Task> = rows
            .into_iter()
            .map(|row| {
                let fields = NewTask {
                    title: row.title,
                    priority: row.priority,
                    category: row.category,
                    tags: tag.iter().cloned().collect(),
                    ..NewTask::default()
                };
                Task::from_new(Self::mint_id(&fields.title, &mut taken), fields, now)
            })
            .collect();

        tracing::info!(created = batch.len(), "bulk create from table");
        self.prepend(batch.clone());
        batch
    }

    /// Parse delimited text and [`bulk_create_from_table`](Self::bulk_create_from_table).
    pub fn bulk_create_from_csv(&mut self, text: &str, tag: Option<&str>) -> Vec<Task> {
        self.bulk_create_from_table(bulk::parse_table(text), tag)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}
