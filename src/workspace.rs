//! Owned application state.
//!
//! A [`Workspace`] holds the task store, the theme, the persistence adapter
//! and the command table. Every mutation goes through [`Workspace::mutate`],
//! which writes the collection back whenever the store's revision moved.
//! A failed write is logged and otherwise ignored: the in-memory state stays
//! authoritative and the next mutation retries.

use crate::commands::{CommandTable, ToolCall};
use crate::config::TaskflowConfig;
use crate::error::Result;
use crate::persistence::Persistence;
use crate::storage::SqliteKeyValueStore;
use crate::tasks::{NewTask, Status, Task, TaskStore, ValidationError};
use crate::theme::{Theme, ThemeController};
use crate::traits::{Clock, SystemClock};
use std::path::Path;

/// Store, theme and persistence, kept in sync.
#[derive(Debug)]
pub struct Workspace {
    store: TaskStore,
    theme: ThemeController,
    persistence: Persistence,
    commands: CommandTable,
}

impl Workspace {
    /// Restore state from `persistence` using the system clock.
    #[must_use]
    pub fn new(persistence: Persistence, config: &TaskflowConfig) -> Self {
        Self::with_clock(persistence, config, Box::new(SystemClock))
    }

    /// Restore state from `persistence`, reading time from `clock`.
    #[must_use]
    pub fn with_clock(
        mut persistence: Persistence,
        config: &TaskflowConfig,
        clock: Box<dyn Clock>,
    ) -> Self {
        let store = TaskStore::with_clock(clock)
            .with_max_bulk_create(config.max_bulk_create)
            .with_tasks(persistence.load_tasks());
        persistence.mark_synced(store.revision());
        let theme = ThemeController::load(&persistence, config.default_theme);
        tracing::info!(tasks = store.len(), theme = %theme.current(), "workspace loaded");
        Self { store, theme, persistence, commands: CommandTable::new() }
    }

    /// Open the SQLite-backed workspace for `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(config: &TaskflowConfig, data_dir: &Path) -> Result<Self> {
        let db_path = config.resolved_storage_path(data_dir);
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let backend = SqliteKeyValueStore::new(&db_path)?;
        tracing::debug!(path = %db_path.display(), "opened storage");
        Ok(Self::new(Persistence::new(Box::new(backend)), config))
    }

    /// A fresh workspace backed by memory, with default settings.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Persistence::in_memory(), &TaskflowConfig::default())
    }

    /// The task store.
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    /// The persistence adapter.
    #[must_use]
    pub const fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// Run `f` against the store, then write the collection back if it changed.
    pub fn mutate<T>(&mut self, f: impl FnOnce(&mut TaskStore) -> T) -> T {
        let result = f(&mut self.store);
        match self.persistence.sync(&self.store) {
            Ok(true) => tracing::debug!(revision = self.store.revision(), "tasks saved"),
            Ok(false) => {}
            Err(e) => tracing::error!(error = %e, "failed to save tasks"),
        }
        result
    }

    /// The active theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme.current()
    }

    /// Switch themes and persist the choice.
    pub fn set_theme(&mut self, theme: Theme) {
        if let Err(e) = self.theme.set(theme, &self.persistence) {
            tracing::error!(error = %e, %theme, "failed to save theme");
        }
    }

    /// Create one task the way the new-task form does.
    ///
    /// The title and description are trimmed; an empty description is
    /// dropped and the task always starts in `todo`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] if the trimmed title is empty.
    pub fn submit_new_task(
        &mut self,
        mut fields: NewTask,
    ) -> std::result::Result<Task, ValidationError> {
        fields.title = fields.title.trim().to_string();
        if fields.title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        fields.description =
            fields.description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty());
        fields.status = Status::Todo;
        Ok(self.mutate(|store| store.create(fields)))
    }

    /// Register the builtin commands.
    pub fn activate(&mut self) {
        self.commands.register_builtin();
        tracing::info!("workspace active");
    }

    /// Unregister the builtin commands.
    pub fn deactivate(&mut self) {
        self.commands.unregister_builtin();
        tracing::info!("workspace inactive");
    }

    /// The command table.
    #[must_use]
    pub const fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// The command table, for registering extra commands.
    pub fn commands_mut(&mut self) -> &mut CommandTable {
        &mut self.commands
    }

    /// Run the command `name` and return its response.
    pub fn dispatch(&mut self, name: &str, args: &str) -> String {
        let commands = std::mem::take(&mut self.commands);
        let mut response = String::new();
        commands.dispatch(self, name, args, |r| response = r);
        // Handlers cannot reach the table while it is taken out.
        self.commands = commands;
        response
    }

    /// Decode a tool-call envelope and run the command it names.
    pub fn dispatch_envelope(&mut self, text: &str) -> String {
        match ToolCall::from_envelope(text) {
            Ok(call) => self.dispatch(&call.name, &call.arguments),
            Err(e) => {
                tracing::warn!("malformed tool call envelope");
                e.to_string()
            }
        }
    }
}
