//! Text renderings of the task collection.
//!
//! Each function builds a serializable context from the tasks and renders
//! one of the templates in [`crate::templates`].

use crate::error::Result;
use crate::tasks::view::{self, ColumnGroup};
use crate::tasks::Task;
use crate::templates;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tera::Context;

/// "task" or "tasks" for a count.
#[must_use]
pub const fn task_noun(count: usize) -> &'static str {
    if count == 1 {
        "task"
    } else {
        "tasks"
    }
}

#[derive(Serialize)]
struct TaskLine<'a> {
    id: &'a str,
    title: &'a str,
    category: Option<&'a str>,
    icon: &'static str,
    done: bool,
    due: Option<String>,
    overdue: bool,
}

impl<'a> TaskLine<'a> {
    fn new(task: &'a Task, now: DateTime<Utc>) -> Self {
        Self {
            id: &task.id,
            title: &task.title,
            category: task.category.as_deref(),
            icon: task.priority.config().icon,
            done: task.is_done(),
            due: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
            overdue: task.is_overdue(now),
        }
    }
}

#[derive(Serialize)]
struct Section<'a> {
    title: &'static str,
    count: usize,
    noun: &'static str,
    tasks: Vec<TaskLine<'a>>,
}

#[derive(Serialize)]
struct BoardColumn<'a> {
    title: &'static str,
    description: &'static str,
    total: usize,
    high_priority: usize,
    tasks: Vec<TaskLine<'a>>,
}

fn lines<'a>(group: &ColumnGroup<'a>, now: DateTime<Utc>) -> Vec<TaskLine<'a>> {
    group.tasks.iter().map(|t| TaskLine::new(t, now)).collect()
}

/// The `read_todos` report: one section per status with numbered tasks.
///
/// # Errors
///
/// Returns an error if the template cannot be rendered.
pub fn read_todos(tasks: &[Task], now: DateTime<Utc>) -> Result<String> {
    let sections: Vec<Section<'_>> = view::group_by_status(tasks)
        .iter()
        .map(|group| Section {
            title: group.column.title,
            count: group.tasks.len(),
            noun: task_noun(group.tasks.len()),
            tasks: lines(group, now),
        })
        .collect();

    let mut context = Context::new();
    context.insert("sections", &sections);
    templates::render(templates::READ_TODOS, &context)
}

/// The board view: columns with stats and task lines.
///
/// # Errors
///
/// Returns an error if the template cannot be rendered.
pub fn board(tasks: &[Task], now: DateTime<Utc>) -> Result<String> {
    let columns: Vec<BoardColumn<'_>> = view::group_by_status(tasks)
        .iter()
        .map(|group| {
            let stats = group.stats();
            BoardColumn {
                title: group.column.title,
                description: group.column.description,
                total: stats.total,
                high_priority: stats.high_priority,
                tasks: lines(group, now),
            }
        })
        .collect();

    let mut context = Context::new();
    context.insert("columns", &columns);
    templates::render(templates::BOARD, &context)
}

/// The flat list view with completion stats.
///
/// # Errors
///
/// Returns an error if the template cannot be rendered.
pub fn list(tasks: &[Task], now: DateTime<Utc>) -> Result<String> {
    let stats = view::stats(tasks);
    let task_lines: Vec<TaskLine<'_>> = tasks.iter().map(|t| TaskLine::new(t, now)).collect();

    let mut context = Context::new();
    context.insert(
        "stats",
        &serde_json::json!({
            "total": stats.total,
            "completed": stats.completed,
            "remaining": stats.remaining,
        }),
    );
    context.insert("tasks", &task_lines);
    templates::render(templates::LIST, &context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{NewTask, Priority, Status};
    use chrono::{Duration, TimeZone};
    use serial_test::serial;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn sample() -> Vec<Task> {
        let make = |id: &str, fields: NewTask| Task::from_new(id.to_string(), fields, now());
        vec![
            make("a-1", NewTask::new("Write report").with_category("work")),
            make("b-2", NewTask::new("Buy milk")),
            make(
                "c-3",
                NewTask::new("Fix bug")
                    .with_status(Status::InProgress)
                    .with_priority(Priority::High)
                    .with_due_date(now() - Duration::days(2)),
            ),
        ]
    }

    #[test]
    fn test_task_noun() {
        assert_eq!(task_noun(0), "tasks");
        assert_eq!(task_noun(1), "task");
        assert_eq!(task_noun(2), "tasks");
    }

    #[test]
    #[serial]
    fn test_read_todos_report() {
        templates::reset_cache().unwrap();
        templates::init_templates(Some(std::path::Path::new("/nonexistent"))).unwrap();

        let report = read_todos(&sample(), now()).unwrap();
        assert_eq!(
            report,
            "To Do (2 tasks):\n1. Write report [work]\n2. Buy milk\n\n\
             In Progress (1 task):\n1. Fix bug\n\n\
             Done (0 tasks):\nNo tasks."
        );
    }

    #[test]
    #[serial]
    fn test_read_todos_empty_collection() {
        templates::reset_cache().unwrap();
        templates::init_templates(Some(std::path::Path::new("/nonexistent"))).unwrap();

        let report = read_todos(&[], now()).unwrap();
        assert_eq!(report.matches("No tasks.").count(), 3);
    }

    #[test]
    #[serial]
    fn test_board_view() {
        templates::reset_cache().unwrap();
        templates::init_templates(Some(std::path::Path::new("/nonexistent"))).unwrap();

        let rendered = board(&sample(), now()).unwrap();
        assert!(rendered.contains("== To Do (2) =="));
        assert!(rendered.contains("== In Progress (1, 1 high) =="));
        assert!(rendered.contains("● Fix bug (due 2024-05-30, overdue)  c-3"));
        assert!(rendered.contains("No tasks in done"));
    }

    #[test]
    #[serial]
    fn test_list_view() {
        templates::reset_cache().unwrap();
        templates::init_templates(Some(std::path::Path::new("/nonexistent"))).unwrap();

        let mut tasks = sample();
        tasks[1].status = Status::Done;
        let rendered = list(&tasks, now()).unwrap();
        assert!(rendered.starts_with("1 of 3 completed, 2 remaining"));
        assert!(rendered.contains("[x] ◐ Buy milk  b-2"));
        assert!(rendered.contains("[ ] ◐ Write report [work]  a-1"));

        assert!(list(&[], now()).unwrap().ends_with("No tasks yet"));
    }
}
