//! Command execution for the CLI.
//!
//! This module handles running CLI commands and producing output.

use crate::cli::{Command, TaskEdit};
use crate::config::{self, TaskflowConfig};
use crate::paths;
use crate::report;
use crate::tasks::{view, NewTask, Task, UpdateOutcome, ValidationError};
use crate::theme::Theme;
use crate::workspace::Workspace;
use std::path::Path;
use std::process::ExitCode;

/// Output from running the CLI, with separate stdout and stderr messages.
#[derive(Debug)]
pub struct CliOutput {
    /// Exit code for the process.
    pub exit_code: ExitCode,
    /// Messages to print to stdout.
    pub stdout: Vec<String>,
    /// Messages to print to stderr.
    pub stderr: Vec<String>,
}

impl CliOutput {
    fn ok(message: impl Into<String>) -> Self {
        Self { exit_code: ExitCode::SUCCESS, stdout: vec![message.into()], stderr: vec![] }
    }

    fn error(message: impl Into<String>) -> Self {
        Self { exit_code: ExitCode::from(1), stdout: vec![], stderr: vec![message.into()] }
    }
}

/// Run a CLI command against the data in `data_dir`.
pub fn run(command: Command, config: &TaskflowConfig, data_dir: &Path) -> CliOutput {
    tracing::debug!(?command, mutates = command.mutates(), "running cli command");

    match command {
        Command::EnsureConfig => run_ensure_config(data_dir),
        Command::Add { title, description, priority, category, tags, due, assignee } => {
            let fields = NewTask {
                title,
                description,
                priority,
                due_date: due,
                tags,
                assignee,
                category,
                ..NewTask::default()
            };
            with_workspace(config, data_dir, |ws| run_add(ws, fields))
        }
        Command::List { priority } => with_workspace(config, data_dir, |ws| {
            let store = ws.store();
            let tasks: Vec<Task> = match priority {
                Some(p) => {
                    view::filter_by_priority(store.tasks(), p).into_iter().cloned().collect()
                }
                None => store.tasks().to_vec(),
            };
            rendered(report::list(&tasks, store.now()))
        }),
        Command::Board => with_workspace(config, data_dir, |ws| {
            let store = ws.store();
            rendered(report::board(store.tasks(), store.now()))
        }),
        Command::Report => with_workspace(config, data_dir, |ws| {
            let store = ws.store();
            rendered(report::read_todos(store.tasks(), store.now()))
        }),
        Command::Move { id, status } => with_workspace(config, data_dir, |ws| {
            match ws.mutate(|store| store.set_status(&id, status)) {
                Some(task) => CliOutput::ok(format!("Moved '{}' to {}", task.title, task.status)),
                None => not_found(&id),
            }
        }),
        Command::Edit { id, changes } => {
            with_workspace(config, data_dir, |ws| run_edit(ws, &id, changes))
        }
        Command::Toggle { id } => with_workspace(config, data_dir, |ws| {
            match ws.mutate(|store| store.toggle_complete(&id)) {
                Some(task) => CliOutput::ok(format!("'{}' is now {}", task.title, task.status)),
                None => not_found(&id),
            }
        }),
        Command::Delete { id } => with_workspace(config, data_dir, |ws| {
            if ws.mutate(|store| store.delete(&id)) {
                CliOutput::ok(format!("Deleted task {id}"))
            } else {
                not_found(&id)
            }
        }),
        Command::Theme { name } => with_workspace(config, data_dir, |ws| run_theme(ws, name)),
        Command::Command { name, args } => with_workspace(config, data_dir, |ws| {
            ws.activate();
            let response = ws.dispatch(&name, &args);
            ws.deactivate();
            if response.starts_with("Error: ") {
                CliOutput::error(response)
            } else {
                CliOutput::ok(response)
            }
        }),
    }
}

/// Open the workspace in `data_dir` and run `f` against it.
fn with_workspace(
    config: &TaskflowConfig,
    data_dir: &Path,
    f: impl FnOnce(&mut Workspace) -> CliOutput,
) -> CliOutput {
    match Workspace::open(config, data_dir) {
        Ok(mut workspace) => f(&mut workspace),
        Err(e) => CliOutput::error(format!("Error opening storage: {e}")),
    }
}

fn rendered(result: crate::error::Result<String>) -> CliOutput {
    match result {
        Ok(text) => CliOutput::ok(text),
        Err(e) => CliOutput::error(format!("Error rendering view: {e}")),
    }
}

fn not_found(id: &str) -> CliOutput {
    CliOutput::error(format!("Task not found: {id}"))
}

fn run_add(workspace: &mut Workspace, fields: NewTask) -> CliOutput {
    match workspace.submit_new_task(fields) {
        Ok(task) => CliOutput::ok(format!("Created task {}: {}", task.id, task.title)),
        Err(e) => CliOutput::error(format!("Error: {e}")),
    }
}

/// Apply `changes` to task `id`, creating it when the ID is unknown and a
/// title is given. Empty text clears an optional field.
fn run_edit(workspace: &mut Workspace, id: &str, changes: TaskEdit) -> CliOutput {
    let title = match changes.title.as_deref().map(str::trim) {
        Some("") => return CliOutput::error(format!("Error: {}", ValidationError::EmptyTitle)),
        title => title.map(str::to_string),
    };

    let now = workspace.store().now();
    let mut task = match (workspace.store().get(id), &title) {
        (Some(existing), _) => existing.clone(),
        (None, Some(title)) => Task::from_new(id.to_string(), NewTask::new(title.clone()), now),
        (None, None) => return not_found(id),
    };

    if let Some(title) = title {
        task.title = title;
    }
    if let Some(description) = changes.description {
        task.description = non_empty(description);
    }
    if let Some(priority) = changes.priority {
        task.priority = priority;
    }
    if let Some(status) = changes.status {
        task.status = status;
    }
    if let Some(category) = changes.category {
        task.category = non_empty(category);
    }
    if let Some(due) = changes.due {
        task.due_date = Some(due);
    }
    if let Some(assignee) = changes.assignee {
        task.assignee = non_empty(assignee);
    }
    task.updated_at = now.max(task.created_at);

    let title = task.title.clone();
    match workspace.mutate(|store| store.update(task)) {
        UpdateOutcome::Replaced => CliOutput::ok(format!("Updated task {id}: {title}")),
        UpdateOutcome::Inserted => CliOutput::ok(format!("Inserted task {id}: {title}")),
    }
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn run_theme(workspace: &mut Workspace, name: Option<Theme>) -> CliOutput {
    match name {
        Some(theme) => {
            workspace.set_theme(theme);
            CliOutput::ok(format!("Theme changed to {theme}"))
        }
        None => {
            let current = workspace.theme();
            CliOutput::ok(format!("{} ({current})", current.label()))
        }
    }
}

fn run_ensure_config(data_dir: &Path) -> CliOutput {
    match config::ensure_config_in(data_dir) {
        Ok(config) => {
            let mut messages =
                vec![format!("Config ensured at {}", paths::config_path_in(data_dir).display())];
            messages.push(format!("  log_level: {}", config.log_level));
            messages.push(format!("  max_bulk_create: {}", config.max_bulk_create));
            messages.push(format!("  default_theme: {}", config.default_theme));
            CliOutput { exit_code: ExitCode::SUCCESS, stdout: vec![], stderr: messages }
        }
        Err(e) => CliOutput::error(format!("Error ensuring config: {e}")),
    }
}
