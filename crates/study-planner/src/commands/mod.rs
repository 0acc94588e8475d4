use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use study_planner_app::{TaskPatch, TaskSession, ViewQueryBuilder};
use study_planner_core::{Clock, DueDate, Task, TaskId, TaskType, ViewFilter};
use study_planner_store::Slot;

use crate::{Command, ListFormat};

pub mod shell;
mod view;

/// Execute a single planner command against an open session.
pub fn run<S, C>(command: Command, session: &mut TaskSession<S, C>, out: &mut impl Write) -> Result<()>
where
    S: Slot,
    C: Clock,
{
    match command {
        Command::Add { title, kind, due } => {
            let title = parse_title(&title)?;
            let kind = parse_type(&kind)?;
            let due = due.as_deref().map(parse_due).transpose()?;
            let id = session.add(title, due, kind);
            let task = find(session.tasks(), &id)?;
            writeln!(out, "created task: {} {}", view::short_id(&id), task.title)?;
        }
        Command::List {
            status,
            kind,
            search,
            format,
        } => {
            let filter = ViewQueryBuilder::new()
                .with_status(&status)
                .and_then(|builder| builder.with_type(&kind))
                .map_err(|err| anyhow!(err.describe_user_facing()))?
                .with_search(search.as_deref())
                .build();
            let rows = session.view(&filter);
            match format {
                ListFormat::Table => {
                    let filtered = filter != ViewFilter::default();
                    view::render_table(&rows, session.stats(), filtered, out)?;
                }
                ListFormat::Json => {
                    let tasks: Vec<&Task> = rows.iter().map(|row| row.task).collect();
                    writeln!(out, "{}", serde_json::to_string_pretty(&tasks)?)?;
                }
            }
        }
        Command::Toggle { id } => {
            let id = resolve_task_id(session.tasks(), &id)?;
            session.toggle(&id);
            let task = find(session.tasks(), &id)?;
            let verb = if task.is_completed { "completed" } else { "reopened" };
            writeln!(out, "{verb}: {}", task.title)?;
        }
        Command::Edit {
            id,
            title,
            kind,
            due,
            clear_due,
        } => {
            let id = resolve_task_id(session.tasks(), &id)?;
            let patch = TaskPatch {
                title: title.as_deref().map(parse_title).transpose()?,
                kind: kind.as_deref().map(parse_type).transpose()?,
                due_date: if clear_due {
                    Some(None)
                } else {
                    due.as_deref().map(parse_due).transpose()?.map(Some)
                },
            };
            if patch.is_empty() {
                bail!("nothing to change; pass --title, --type, --due or --clear-due");
            }
            session.update(&id, patch);
            let task = find(session.tasks(), &id)?;
            writeln!(out, "updated: {}", task.title)?;
        }
        Command::Delete { id } => {
            let id = resolve_task_id(session.tasks(), &id)?;
            let title = find(session.tasks(), &id)?.title.clone();
            session.delete(&id);
            writeln!(out, "deleted: {title}")?;
        }
        Command::MarkAll => {
            let stats = session.stats();
            if stats.can_mark_all() {
                session.mark_all_completed();
                writeln!(out, "marked {} tasks completed", stats.active())?;
            } else {
                writeln!(out, "No open tasks")?;
            }
        }
        Command::ClearCompleted => {
            let stats = session.stats();
            if stats.can_clear() {
                session.clear_completed();
                writeln!(out, "removed {} completed tasks", stats.completed)?;
            } else {
                writeln!(out, "No completed tasks")?;
            }
        }
        Command::Stats => {
            let stats = session.stats();
            writeln!(out, "{}", view::summary(stats))?;
            writeln!(out, "{} open", stats.active())?;
        }
        Command::Shell => bail!("the shell cannot be started from inside a command"),
    }

    Ok(())
}

/// Resolve a full id or a unique id prefix.
fn resolve_task_id(tasks: &[Task], raw: &str) -> Result<TaskId> {
    let needle = raw.trim();
    if needle.is_empty() {
        bail!("task id must not be empty");
    }
    if let Some(task) = tasks.iter().find(|task| task.id.as_str() == needle) {
        return Ok(task.id.clone());
    }
    let mut matches = tasks.iter().filter(|task| task.id.as_str().starts_with(needle));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id.clone()),
        (None, _) => bail!("no task matches id '{needle}'"),
        (Some(_), Some(_)) => bail!("task id prefix '{needle}' is ambiguous"),
    }
}

fn find<'a>(tasks: &'a [Task], id: &TaskId) -> Result<&'a Task> {
    tasks
        .iter()
        .find(|task| task.id == *id)
        .with_context(|| format!("task {id} disappeared"))
}

fn parse_title(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("title must not be empty");
    }
    Ok(trimmed.to_owned())
}

fn parse_type(raw: &str) -> Result<TaskType> {
    TaskType::from_str(&raw.trim().to_ascii_lowercase()).with_context(|| {
        let known: Vec<&str> = TaskType::ALL.iter().map(|kind| kind.as_str()).collect();
        format!("expected one of: {}", known.join(", "))
    })
}

fn parse_due(raw: &str) -> Result<DueDate> {
    Ok(DueDate::parse_strict(raw)?)
}
