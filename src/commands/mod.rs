//! Named commands for external actors.
//!
//! An external actor (an assistant, a script) invokes a command by name with
//! a JSON-encoded argument string and gets back exactly one human-readable
//! response. Commands live in a [`CommandTable`] that maps names to handlers;
//! the builtin set is registered when a workspace becomes active and removed
//! when it becomes inactive.
//!
//! Calls usually arrive wrapped in a tool-call envelope:
//!
//! ```json
//! {"action": {"tool": {"function": {"name": "move_todos", "arguments": "{\"from\":\"todo\",\"to\":\"done\"}"}}}}
//! ```
//!
//! A missing `arguments` field behaves like `"{}"`.

pub mod args;
pub mod handlers;

pub use args::{Command, CommandError};

use crate::workspace::Workspace;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Names of the builtin commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandName {
    /// Set the active theme.
    ChangeTheme,
    /// Delete matching tasks.
    BulkDelete,
    /// Move matching tasks between statuses.
    MoveTodos,
    /// Create tasks from a range or a table.
    CreateBulkTasks,
    /// Report all tasks grouped by status.
    ReadTodos,
    /// Switch to the dark theme.
    ActivateFocusMode,
    /// Switch back to the light theme.
    DeactivateFocusMode,
}

impl CommandName {
    /// Every builtin command.
    pub const ALL: [Self; 7] = [
        Self::ChangeTheme,
        Self::BulkDelete,
        Self::MoveTodos,
        Self::CreateBulkTasks,
        Self::ReadTodos,
        Self::ActivateFocusMode,
        Self::DeactivateFocusMode,
    ];

    /// The wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ChangeTheme => "change_theme",
            Self::BulkDelete => "bulk_delete",
            Self::MoveTodos => "move_todos",
            Self::CreateBulkTasks => "create_bulk_tasks",
            Self::ReadTodos => "read_todos",
            Self::ActivateFocusMode => "activate_focus_mode",
            Self::DeactivateFocusMode => "deactivate_focus_mode",
        }
    }
}

impl FromStr for CommandName {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| CommandError::UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command handler: takes the workspace and raw arguments, returns the response.
pub type Handler = Box<dyn Fn(&mut Workspace, &str) -> String>;

/// Name → handler map.
///
/// Registration replaces any handler already under the name, so registering
/// twice leaves one handler. Unregistering an absent name does nothing.
#[derive(Default)]
pub struct CommandTable {
    handlers: BTreeMap<String, Handler>,
}

impl fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTable").field("names", &self.names()).finish()
    }
}

impl CommandTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`. Returns false if the name was
    /// already registered (its handler is replaced).
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl Fn(&mut Workspace, &str) -> String + 'static,
    ) -> bool {
        self.handlers.insert(name.into(), Box::new(handler)).is_none()
    }

    /// Remove the handler under `name`. Returns whether one was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.handlers.remove(name).is_some()
    }

    /// Register every builtin command.
    pub fn register_builtin(&mut self) {
        for name in CommandName::ALL {
            self.register(name.as_str(), move |ws: &mut Workspace, args: &str| {
                handlers::run(name, ws, args)
            });
        }
        tracing::debug!(count = CommandName::ALL.len(), "registered builtin commands");
    }

    /// Unregister every builtin command.
    pub fn unregister_builtin(&mut self) {
        for name in CommandName::ALL {
            self.unregister(name.as_str());
        }
        tracing::debug!("unregistered builtin commands");
    }

    /// Whether a handler is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the handler for `name` and pass its response to `respond`.
    ///
    /// `respond` is called exactly once, with an error sentence when no
    /// handler is registered under `name`.
    pub fn dispatch(
        &self,
        workspace: &mut Workspace,
        name: &str,
        args: &str,
        respond: impl FnOnce(String),
    ) {
        let response = match self.handlers.get(name) {
            Some(handler) => {
                tracing::info!(command = name, "dispatching command");
                handler(workspace, args)
            }
            None => {
                tracing::warn!(command = name, "unknown command");
                CommandError::UnknownCommand(name.to_string()).to_string()
            }
        };
        respond(response);
    }
}

/// A decoded tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    /// Command name.
    pub name: String,
    /// JSON-encoded arguments.
    pub arguments: String,
}

#[derive(Deserialize)]
struct Envelope {
    action: EnvelopeAction,
}

#[derive(Deserialize)]
struct EnvelopeAction {
    tool: EnvelopeTool,
}

#[derive(Deserialize)]
struct EnvelopeTool {
    function: EnvelopeFunction,
}

#[derive(Deserialize)]
struct EnvelopeFunction {
    name: String,
    #[serde(default)]
    arguments: Option<String>,
}

impl ToolCall {
    /// Unwrap a tool-call envelope.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidArguments`] if the text is not an
    /// envelope with a function name.
    pub fn from_envelope(text: &str) -> Result<Self, CommandError> {
        let envelope: Envelope =
            serde_json::from_str(text).map_err(|_| CommandError::InvalidArguments)?;
        let function = envelope.action.tool.function;
        Ok(Self {
            name: function.name,
            arguments: function.arguments.unwrap_or_else(|| "{}".to_string()),
        })
    }
}
