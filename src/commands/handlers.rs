//! Command execution and response wording.

use crate::commands::{Command, CommandError, CommandName};
use crate::report::{self, task_noun};
use crate::tasks::bulk::RangeRequest;
use crate::tasks::TaskCriteria;
use crate::theme::Theme;
use crate::workspace::Workspace;

/// Theme used while focus mode is on.
pub const FOCUS_THEME: Theme = Theme::Dark;

/// Theme restored when focus mode ends.
pub const UNFOCUSED_THEME: Theme = Theme::Light;

/// Decode and execute one command, returning the response text.
pub fn run(name: CommandName, workspace: &mut Workspace, args: &str) -> String {
    let result = Command::decode(name, args).and_then(|command| execute(command, workspace));
    match result {
        Ok(response) => response,
        Err(err) => {
            tracing::info!(command = %name, error = %err, "command rejected");
            err.to_string()
        }
    }
}

/// Execute a decoded command.
///
/// # Errors
///
/// Returns a [`CommandError`] if store-level validation rejects the request
/// (nothing is changed in that case) or the report cannot be rendered.
pub fn execute(command: Command, workspace: &mut Workspace) -> Result<String, CommandError> {
    match command {
        Command::ChangeTheme(theme) => {
            workspace.set_theme(theme);
            Ok(format!("Theme changed to {theme}"))
        }
        Command::ActivateFocusMode => {
            workspace.set_theme(FOCUS_THEME);
            Ok("Focus mode activated.".to_string())
        }
        Command::DeactivateFocusMode => {
            workspace.set_theme(UNFOCUSED_THEME);
            Ok("Focus mode deactivated.".to_string())
        }
        Command::BulkDelete(criteria) => {
            let outcome = workspace.mutate(|store| store.bulk_delete(criteria));
            let suffix = if outcome.defaulted { " (default filter)" } else { "" };
            Ok(format!(
                "Deleted {} {} matching {}{suffix}.",
                outcome.removed,
                task_noun(outcome.removed),
                outcome.criteria
            ))
        }
        Command::MoveTodos { from, to, criteria } => {
            let moved = workspace.mutate(|store| store.move_matching(from, to, &criteria));
            let noun = task_noun(moved);
            Ok(format!("Moved {moved} {noun} from {from} to {to}.{}", filters(&criteria)))
        }
        Command::CreateFromRange(request) => {
            let created = workspace.mutate(|store| store.bulk_create_from_range(&request))?;
            Ok(range_message(created.len(), &request))
        }
        Command::CreateFromCsv { csv, tag } => {
            let created =
                workspace.mutate(|store| store.bulk_create_from_csv(&csv, tag.as_deref())).len();
            let tag = tag.map(|t| format!(" Tag: \"{t}\".")).unwrap_or_default();
            Ok(format!("Created {created} {} from CSV.{tag}", task_noun(created)))
        }
        Command::ReadTodos => {
            let store = workspace.store();
            report::read_todos(store.tasks(), store.now())
                .map_err(|e| CommandError::Internal(e.to_string()))
        }
    }
}

/// ` Filters: category "work", priority "high".` or nothing.
fn filters(criteria: &TaskCriteria) -> String {
    let criteria = TaskCriteria { status: None, ..criteria.clone() };
    if criteria.is_empty() {
        String::new()
    } else {
        format!(" Filters: {criteria}.")
    }
}

fn range_message(created: usize, request: &RangeRequest) -> String {
    let mut message = format!(
        "Created {created} {} (Task {} to Task {}).",
        task_noun(created),
        request.from.trim(),
        request.to.trim()
    );
    if let Some(category) = &request.category {
        message.push_str(&format!(" Category: \"{category}\"."));
    }
    if let Some(priority) = &request.priority {
        message.push_str(&format!(" Priority: {}.", priority.to_lowercase()));
    }
    if let Some(tag) = &request.tag {
        message.push_str(&format!(" Tag: \"{tag}\"."));
    }
    message
}
