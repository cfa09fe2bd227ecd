//! Tests for the CLI module.

use super::*;
use crate::config::TaskflowConfig;
use crate::tasks::{Priority, Status};
use crate::templates;
use crate::workspace::Workspace;
use clap::Parser;
use serial_test::serial;
use std::process::ExitCode;
use tempfile::TempDir;

fn run_in(dir: &TempDir, command: Command) -> CliOutput {
    run(command, &TaskflowConfig::default(), dir.path())
}

fn add(dir: &TempDir, title: &str) -> CliOutput {
    run_in(
        dir,
        Command::Add {
            title: title.to_string(),
            description: None,
            priority: Priority::Medium,
            category: None,
            tags: vec![],
            due: None,
            assignee: None,
        },
    )
}

fn first_task_id(dir: &TempDir) -> String {
    let ws = Workspace::open(&TaskflowConfig::default(), dir.path()).unwrap();
    ws.store().tasks()[0].id.clone()
}

fn init_embedded_templates() {
    templates::reset_cache().unwrap();
    templates::init_templates(Some(std::path::Path::new("/nonexistent"))).unwrap();
}

#[test]
fn test_parse_add_with_options() {
    let cli = Cli::try_parse_from([
        "taskflow", "add", "Write docs", "-p", "high", "--category", "work", "-t", "a", "-t",
        "b", "--due", "2024-06-01",
    ])
    .unwrap();
    let Command::Add { title, priority, category, tags, due, .. } = cli.command else {
        panic!("expected add");
    };
    assert_eq!(title, "Write docs");
    assert_eq!(priority, Priority::High);
    assert_eq!(category.as_deref(), Some("work"));
    assert_eq!(tags, vec!["a", "b"]);
    assert_eq!(due.unwrap().to_rfc3339(), "2024-06-01T00:00:00+00:00");
}

#[test]
fn test_parse_rejects_bad_values() {
    assert!(Cli::try_parse_from(["taskflow", "move", "x", "finished"]).is_err());
    assert!(Cli::try_parse_from(["taskflow", "add", "t", "-p", "urgent"]).is_err());
    assert!(Cli::try_parse_from(["taskflow", "theme", "neon"]).is_err());
    assert!(Cli::try_parse_from(["taskflow", "add", "t", "--due", "soon"]).is_err());
}

#[test]
fn test_parse_command_defaults_args() {
    let cli = Cli::try_parse_from(["taskflow", "command", "read_todos"]).unwrap();
    let Command::Command { name, args } = cli.command else {
        panic!("expected command");
    };
    assert_eq!(name, "read_todos");
    assert_eq!(args, "{}");
}

#[test]
fn test_mutates() {
    assert!(!Command::Board.mutates());
    assert!(!Command::Report.mutates());
    assert!(!Command::Theme { name: None }.mutates());
    assert!(Command::Theme { name: Some(Theme::Dark) }.mutates());
    assert!(Command::Toggle { id: "x".to_string() }.mutates());
    assert!(Command::Edit { id: "x".to_string(), changes: TaskEdit::default() }.mutates());
}

#[test]
fn test_parse_edit() {
    let cli = Cli::try_parse_from([
        "taskflow", "edit", "abc", "--title", "New", "-p", "low", "--status", "done", "-c", "",
    ])
    .unwrap();
    let Command::Edit { id, changes } = cli.command else {
        panic!("expected edit");
    };
    assert_eq!(id, "abc");
    assert_eq!(changes.title.as_deref(), Some("New"));
    assert_eq!(changes.priority, Some(Priority::Low));
    assert_eq!(changes.status, Some(Status::Done));
    assert_eq!(changes.category.as_deref(), Some(""));
    assert_eq!(changes.description, None);
    assert!(Cli::try_parse_from(["taskflow", "edit", "abc", "--status", "finished"]).is_err());
}

#[test]
fn test_add_then_move_and_toggle() {
    let dir = TempDir::new().unwrap();
    let output = add(&dir, "  Review PR  ");
    assert_eq!(output.exit_code, ExitCode::SUCCESS);
    assert!(output.stdout[0].ends_with(": Review PR"));

    let id = first_task_id(&dir);
    let output = run_in(&dir, Command::Move { id: id.clone(), status: Status::InProgress });
    assert_eq!(output.stdout, vec!["Moved 'Review PR' to in_progress"]);

    let output = run_in(&dir, Command::Toggle { id: id.clone() });
    assert_eq!(output.stdout, vec!["'Review PR' is now done"]);
    let output = run_in(&dir, Command::Toggle { id });
    assert_eq!(output.stdout, vec!["'Review PR' is now todo"]);
}

#[test]
fn test_add_rejects_blank_title() {
    let dir = TempDir::new().unwrap();
    let output = add(&dir, "   ");
    assert_eq!(output.exit_code, ExitCode::from(1));
    assert_eq!(output.stderr, vec!["Error: task title must not be empty"]);
}

#[test]
fn test_missing_task() {
    let dir = TempDir::new().unwrap();
    let output = run_in(&dir, Command::Delete { id: "nope".to_string() });
    assert_eq!(output.exit_code, ExitCode::from(1));
    assert_eq!(output.stderr, vec!["Task not found: nope"]);

    let output = run_in(&dir, Command::Move { id: "nope".to_string(), status: Status::Done });
    assert_eq!(output.stderr, vec!["Task not found: nope"]);
}

#[test]
fn test_delete() {
    let dir = TempDir::new().unwrap();
    add(&dir, "Temporary");
    let id = first_task_id(&dir);

    let output = run_in(&dir, Command::Delete { id: id.clone() });
    assert_eq!(output.stdout, vec![format!("Deleted task {id}")]);
    assert!(Workspace::open(&TaskflowConfig::default(), dir.path()).unwrap().store().is_empty());
}

#[test]
fn test_edit_replaces_fields_in_place() {
    let dir = TempDir::new().unwrap();
    add(&dir, "Second");
    add(&dir, "First");
    let id = first_task_id(&dir);
    run_in(&dir, Command::Edit {
        id: id.clone(),
        changes: TaskEdit { category: Some("work".to_string()), ..TaskEdit::default() },
    });

    let changes = TaskEdit {
        title: Some("  Renamed  ".to_string()),
        priority: Some(Priority::High),
        status: Some(Status::InProgress),
        category: Some(String::new()),
        assignee: Some("sam".to_string()),
        ..TaskEdit::default()
    };
    let output = run_in(&dir, Command::Edit { id: id.clone(), changes });
    assert_eq!(output.exit_code, ExitCode::SUCCESS);
    assert_eq!(output.stdout, vec![format!("Updated task {id}: Renamed")]);

    let ws = Workspace::open(&TaskflowConfig::default(), dir.path()).unwrap();
    let tasks = ws.store().tasks();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, id);
    assert_eq!(tasks[0].title, "Renamed");
    assert_eq!(tasks[0].priority, Priority::High);
    assert_eq!(tasks[0].status, Status::InProgress);
    assert_eq!(tasks[0].category, None);
    assert_eq!(tasks[0].assignee.as_deref(), Some("sam"));
    assert!(tasks[0].updated_at >= tasks[0].created_at);
    assert_eq!(tasks[1].title, "Second");
}

#[test]
fn test_edit_unknown_id() {
    let dir = TempDir::new().unwrap();
    add(&dir, "Existing");

    let output = run_in(&dir, Command::Edit {
        id: "ghost".to_string(),
        changes: TaskEdit { priority: Some(Priority::Low), ..TaskEdit::default() },
    });
    assert_eq!(output.exit_code, ExitCode::from(1));
    assert_eq!(output.stderr, vec!["Task not found: ghost"]);

    let changes = TaskEdit { title: Some("Imported".to_string()), ..TaskEdit::default() };
    let output = run_in(&dir, Command::Edit { id: "ghost".to_string(), changes });
    assert_eq!(output.stdout, vec!["Inserted task ghost: Imported"]);

    let ws = Workspace::open(&TaskflowConfig::default(), dir.path()).unwrap();
    let ids: Vec<&str> = ws.store().tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids[0], "ghost");
    assert_eq!(ids.len(), 2);
    assert_eq!(ws.store().tasks()[0].status, Status::Todo);
}

#[test]
fn test_edit_rejects_blank_title() {
    let dir = TempDir::new().unwrap();
    add(&dir, "Keep me");
    let id = first_task_id(&dir);

    let changes = TaskEdit { title: Some("   ".to_string()), ..TaskEdit::default() };
    let output = run_in(&dir, Command::Edit { id, changes });
    assert_eq!(output.exit_code, ExitCode::from(1));
    assert_eq!(output.stderr, vec!["Error: task title must not be empty"]);

    let ws = Workspace::open(&TaskflowConfig::default(), dir.path()).unwrap();
    assert_eq!(ws.store().tasks()[0].title, "Keep me");
}

#[test]
fn test_theme_show_and_change() {
    let dir = TempDir::new().unwrap();
    let output = run_in(&dir, Command::Theme { name: None });
    assert_eq!(output.stdout, vec!["Light (light)"]);

    run_in(&dir, Command::Theme { name: Some(Theme::Cyberpunk) });
    let output = run_in(&dir, Command::Theme { name: None });
    assert_eq!(output.stdout, vec!["Cyberpunk (cyberpunk)"]);
}

#[test]
fn test_named_command() {
    let dir = TempDir::new().unwrap();
    let output = run_in(
        &dir,
        Command::Command {
            name: "create_bulk_tasks".to_string(),
            args: r#"{"from":1,"to":3}"#.to_string(),
        },
    );
    assert_eq!(output.exit_code, ExitCode::SUCCESS);
    assert_eq!(output.stdout, vec!["Created 3 tasks (Task 1 to Task 3)."]);

    let output = run_in(
        &dir,
        Command::Command { name: "bulk_delete".to_string(), args: "[]".to_string() },
    );
    assert_eq!(output.exit_code, ExitCode::from(1));
    assert_eq!(output.stderr, vec!["Error: Invalid arguments. Expected a JSON object."]);
}

#[test]
#[serial]
fn test_views_render() {
    init_embedded_templates();
    let dir = TempDir::new().unwrap();
    add(&dir, "Only task");

    let board = run_in(&dir, Command::Board);
    assert!(board.stdout[0].contains("== To Do (1) =="));

    let list = run_in(&dir, Command::List { priority: None });
    assert!(list.stdout[0].starts_with("0 of 1 completed, 1 remaining"));

    let filtered = run_in(&dir, Command::List { priority: Some(Priority::High) });
    assert!(filtered.stdout[0].ends_with("No tasks yet"));

    let report = run_in(&dir, Command::Report);
    assert!(report.stdout[0].starts_with("To Do (1 task):\n1. Only task"));
}

#[test]
fn test_ensure_config() {
    let dir = TempDir::new().unwrap();
    let output = run_in(&dir, Command::EnsureConfig);
    assert_eq!(output.exit_code, ExitCode::SUCCESS);
    assert!(dir.path().join("config.yaml").exists());
    assert!(output.stderr.iter().any(|m| m == "  max_bulk_create: 500"));
    // Only the config file is written; task storage is left untouched
    assert!(!crate::paths::db_path_in(dir.path()).exists());
}
