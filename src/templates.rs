//! Template loading and rendering using Tera.
//!
//! Text reports (the `read_todos` command, the CLI list and board views) are
//! rendered from templates. Files under `<data dir>/templates` override the
//! embedded defaults by name.

use crate::error::{Error, Result};
use crate::paths;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tera::{Context, Tera};

/// Report of all tasks grouped by status.
pub const READ_TODOS: &str = "messages/read_todos.tera";

/// Board view with per-column stats.
pub const BOARD: &str = "messages/board.tera";

/// Flat list view with completion stats.
pub const LIST: &str = "messages/list.tera";

/// Built-in report templates, keyed by name.
static BUILTIN: [(&str, &str); 3] = [
    (READ_TODOS, include_str!("../templates/messages/read_todos.tera")),
    (BOARD, include_str!("../templates/messages/board.tera")),
    (LIST, include_str!("../templates/messages/list.tera")),
];

/// The loaded engine; `None` until first use or after [`reset_cache`].
static ENGINE: Lazy<RwLock<Option<Tera>>> = Lazy::new(|| RwLock::new(None));

fn lock_error(e: impl std::fmt::Display) -> Error {
    Error::Template(format!("template cache lock poisoned: {e}"))
}

/// Build an engine from the override directory, topped up with built-ins.
fn load_engine(overrides: Option<&Path>) -> Result<Tera> {
    let mut tera = match overrides.filter(|d| d.is_dir()) {
        Some(dir) => {
            let tera = Tera::new(&format!("{}/**/*.tera", dir.display())).map_err(|e| {
                Error::Template(format!("bad template override in {}: {e}", dir.display()))
            })?;
            let count = tera.get_template_names().count();
            tracing::debug!(dir = %dir.display(), count, "loaded template overrides");
            tera
        }
        None => Tera::default(),
    };

    let missing: Vec<(&str, &str)> =
        BUILTIN.iter().copied().filter(|(name, _)| tera.get_template(name).is_err()).collect();
    tera.add_raw_templates(missing)
        .map_err(|e| Error::Template(format!("built-in template failed to parse: {e}")))?;
    Ok(tera)
}

/// Load templates, replacing whatever engine is cached.
///
/// `templates_dir` defaults to `<data dir>/templates`. A missing directory
/// means only the built-in templates are used.
///
/// # Errors
///
/// Returns an error if an override template does not parse.
pub fn init_templates(templates_dir: Option<&Path>) -> Result<()> {
    let dir: Option<PathBuf> = templates_dir
        .map(Path::to_path_buf)
        .or_else(|| paths::data_dir().map(|d| d.join(paths::TEMPLATES_DIR_NAME)));
    let tera = load_engine(dir.as_deref())?;
    *ENGINE.write().map_err(lock_error)? = Some(tera);
    Ok(())
}

/// Render `name` with `context`, loading templates on first use.
///
/// Surrounding whitespace is trimmed from the output.
///
/// # Errors
///
/// Returns an error if the template is unknown or fails to render.
pub fn render(name: &str, context: &Context) -> Result<String> {
    if ENGINE.read().map_err(lock_error)?.is_none() {
        init_templates(None)?;
    }

    let engine = ENGINE.read().map_err(lock_error)?;
    let text = engine
        .as_ref()
        .ok_or_else(|| Error::Template("templates not loaded".to_string()))?
        .render(name, context)
        .map_err(|e| Error::Template(format!("cannot render {name}: {e}")))?;
    Ok(text.trim().to_string())
}

/// Drop the cached engine so the next render reloads templates.
///
/// # Errors
///
/// Returns an error if the cache lock is poisoned.
pub fn reset_cache() -> Result<()> {
    ENGINE.write().map_err(lock_error)?.take();
    Ok(())
}

/// Names of the built-in templates.
#[must_use]
pub fn embedded_template_names() -> Vec<&'static str> {
    BUILTIN.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn sample_context() -> Context {
        let task = json!({
            "title": "Write report", "category": "work", "icon": "●", "id": "write-report-1",
            "done": false, "due": null, "overdue": false
        });
        let mut ctx = Context::new();
        ctx.insert(
            "sections",
            &json!([
                { "title": "To Do", "count": 1, "noun": "task", "tasks": [task] },
                { "title": "Done", "count": 0, "noun": "tasks", "tasks": [] }
            ]),
        );
        ctx.insert(
            "columns",
            &json!([{ "title": "To Do", "description": "Tasks ready to be started",
                      "total": 1, "high_priority": 1, "tasks": [task] }]),
        );
        ctx.insert("stats", &json!({ "total": 1, "completed": 0, "remaining": 1 }));
        ctx.insert("tasks", &json!([task]));
        ctx
    }

    #[test]
    #[serial_test::serial]
    fn test_all_embedded_templates_render() {
        reset_cache().unwrap();
        init_templates(Some(Path::new("/nonexistent"))).unwrap();

        let ctx = sample_context();
        for name in embedded_template_names() {
            let rendered = render(name, &ctx).unwrap();
            assert!(rendered.contains("Write report"), "{name} rendered: {rendered}");
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_read_todos_layout() {
        reset_cache().unwrap();
        init_templates(Some(Path::new("/nonexistent"))).unwrap();

        let rendered = render(READ_TODOS, &sample_context()).unwrap();
        assert_eq!(rendered, "To Do (1 task):\n1. Write report [work]\n\nDone (0 tasks):\nNo tasks.");
    }

    #[test]
    #[serial_test::serial]
    fn test_filesystem_templates_override_embedded() {
        reset_cache().unwrap();

        let dir = TempDir::new().unwrap();
        let template_dir = dir.path().join("messages");
        fs::create_dir_all(&template_dir).unwrap();
        fs::write(template_dir.join("list.tera"), "CUSTOM: {{ stats.total }}").unwrap();

        init_templates(Some(dir.path())).unwrap();

        assert_eq!(render(LIST, &sample_context()).unwrap(), "CUSTOM: 1");
        // Templates without an override still come from the embedded set
        assert!(render(BOARD, &sample_context()).unwrap().contains("== To Do (1, 1 high) =="));

        reset_cache().unwrap();
    }

    #[test]
    #[serial_test::serial]
    fn test_invalid_template_dir_fails() {
        reset_cache().unwrap();

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.tera"), "{% if %}").unwrap();

        assert!(init_templates(Some(dir.path())).is_err());
        reset_cache().unwrap();
    }

    #[test]
    #[serial_test::serial]
    fn test_render_missing_template_fails() {
        reset_cache().unwrap();
        init_templates(Some(Path::new("/nonexistent"))).unwrap();

        assert!(render("nonexistent/template.tera", &Context::new()).is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_lazy_init() {
        reset_cache().unwrap();
        let rendered = render(LIST, &sample_context()).unwrap();
        assert!(rendered.starts_with("0 of 1 completed"));
    }
}
