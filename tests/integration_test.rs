//! Integration tests for `taskflow`.

use taskflow::config::TaskflowConfig;
use taskflow::persistence::{Persistence, THEME_KEY, TODOS_KEY};
use taskflow::storage::{MemoryKeyValueStore, SqliteKeyValueStore};
use taskflow::tasks::{NewTask, Priority, Status, Task};
use taskflow::testing::FixedClock;
use taskflow::theme::Theme;
use taskflow::traits::KeyValueStore;
use taskflow::workspace::Workspace;
use taskflow::VERSION;
use tempfile::TempDir;

fn envelope(name: &str, arguments: &str) -> String {
    serde_json::json!({
        "action": { "tool": { "function": { "name": name, "arguments": arguments } } }
    })
    .to_string()
}

fn active_workspace() -> Workspace {
    let mut ws = Workspace::in_memory();
    ws.activate();
    ws
}

fn stored_tasks(ws: &Workspace) -> Vec<Task> {
    let json = ws.persistence().backend().get(TODOS_KEY).unwrap().unwrap_or_default();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_version_exists() {
    assert!(!VERSION.is_empty());
}

#[test]
fn test_move_single_high_priority_task() {
    let mut ws = active_workspace();
    ws.submit_new_task(NewTask::new("Release").with_priority(Priority::High)).unwrap();

    let response = ws.dispatch_envelope(&envelope("move_todos", r#"{"from":"todo","to":"done"}"#));
    assert!(response.starts_with("Moved 1 task"), "{response}");
    assert_eq!(ws.store().tasks()[0].status, Status::Done);
    assert_eq!(stored_tasks(&ws)[0].status, Status::Done);
}

#[test]
fn test_assistant_session() {
    let mut ws = active_workspace();

    let created = ws.dispatch(
        "create_bulk_tasks",
        r#"{"from":"1","to":"4","category":"sprint","priority":"high"}"#,
    );
    assert_eq!(
        created,
        r#"Created 4 tasks (Task 1 to Task 4). Category: "sprint". Priority: high."#
    );

    let moved = ws.dispatch("move_todos", r#"{"from":"todo","to":"done","category":"SPRINT"}"#);
    assert_eq!(moved, r#"Moved 4 tasks from todo to done. Filters: category "SPRINT"."#);

    let deleted = ws.dispatch("bulk_delete", "{}");
    assert_eq!(deleted, r#"Deleted 4 tasks matching status "done" (default filter)."#);
    assert!(ws.store().is_empty());
    assert!(stored_tasks(&ws).is_empty());
}

#[test]
fn test_validation_errors_change_nothing() {
    let mut ws = active_workspace();
    ws.dispatch("create_bulk_tasks", r#"{"from":1,"to":2}"#);
    let before = stored_tasks(&ws);

    for (name, args) in [
        ("create_bulk_tasks", r#"{"from":"a","to":"5"}"#),
        ("move_todos", r#"{"from":"todo"}"#),
        ("move_todos", r#"{"from":"todo","to":"later"}"#),
        ("bulk_delete", "not json"),
        ("change_theme", r#"{"theme":"neon"}"#),
    ] {
        let response = ws.dispatch(name, args);
        assert!(response.starts_with("Error: "), "{name}: {response}");
    }

    assert_eq!(stored_tasks(&ws), before);
    assert_eq!(ws.theme(), Theme::Light);
}

#[test]
fn test_csv_import_normalizes_priority() {
    let mut ws = active_workspace();
    let csv = "category,priority,title\n\"Home, garden\",HIGH,Mow lawn\n,unknown,Call mom\n";
    let response = ws.dispatch("create_bulk_tasks", &serde_json::json!({ "csv": csv }).to_string());
    assert_eq!(response, "Created 2 tasks from CSV.");

    let tasks = ws.store().tasks();
    assert_eq!(tasks[0].title, "Mow lawn");
    assert_eq!(tasks[0].category.as_deref(), Some("Home, garden"));
    assert_eq!(tasks[0].priority, Priority::High);
    assert_eq!(tasks[1].category, None);
    assert_eq!(tasks[1].priority, Priority::Medium);
}

#[test]
fn test_sqlite_persistence_across_sessions() {
    let dir = TempDir::new().unwrap();
    let config = TaskflowConfig::default();

    {
        let mut ws = Workspace::open(&config, dir.path()).unwrap();
        ws.activate();
        ws.dispatch("create_bulk_tasks", r#"{"from":1,"to":3,"tag":"batch"}"#);
        ws.dispatch("activate_focus_mode", "{}");
    }

    let backend = SqliteKeyValueStore::new(dir.path().join("storage.sqlite3")).unwrap();
    assert_eq!(backend.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

    let ws = Workspace::open(&config, dir.path()).unwrap();
    assert_eq!(ws.theme(), Theme::Dark);
    let titles: Vec<&str> = ws.store().tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Task 1", "Task 2", "Task 3"]);
    assert!(ws.store().tasks().iter().all(|t| t.has_tag("batch")));
}

#[test]
fn test_stored_dates_have_millisecond_precision() {
    let clock = FixedClock::at_millis(1_714_555_800_123);
    let mut ws = Workspace::with_clock(
        Persistence::new(Box::new(MemoryKeyValueStore::new())),
        &TaskflowConfig::default(),
        clock.boxed(),
    );
    ws.submit_new_task(NewTask::new("Stamp")).unwrap();

    let json = ws.persistence().backend().get(TODOS_KEY).unwrap().unwrap();
    assert!(json.contains(r#""createdAt":"2024-05-01T09:30:00.123Z""#), "{json}");
    assert!(!json.contains("dueDate"));
}

#[test]
fn test_unknown_command_and_bad_envelope() {
    let mut ws = active_workspace();
    assert_eq!(
        ws.dispatch_envelope(&envelope("summon_dragon", "{}")),
        "Error: Unknown command 'summon_dragon'."
    );
    assert_eq!(
        ws.dispatch_envelope(r#"{"tool":"read_todos"}"#),
        "Error: Invalid arguments. Expected a JSON object."
    );
}
