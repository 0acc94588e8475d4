//! Pure state transitions over a [`TaskEnvelope`].

use study_planner_core::{DueDate, Task, TaskEnvelope, TaskId, TaskType, Timestamp};

use crate::task_patch::TaskPatch;

/// A single mutation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the whole state.
    Init(TaskEnvelope),
    /// Append a freshly created task.
    Add {
        /// Task title.
        title: String,
        /// Optional due day.
        due_date: Option<DueDate>,
        /// Category.
        kind: TaskType,
    },
    /// Flip completion of one task.
    Toggle(TaskId),
    /// Apply a partial update to one task.
    Update {
        /// Target task.
        id: TaskId,
        /// Fields to change.
        patch: TaskPatch,
    },
    /// Remove one task.
    Delete(TaskId),
    /// Re-insert a previously removed task.
    Restore(Task),
    /// Complete every incomplete task.
    MarkAll,
    /// Drop every completed task.
    ClearCompleted,
}

impl Action {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Add { .. } => "add",
            Self::Toggle(_) => "toggle",
            Self::Update { .. } => "update",
            Self::Delete(_) => "delete",
            Self::Restore(_) => "restore",
            Self::MarkAll => "mark_all",
            Self::ClearCompleted => "clear_completed",
        }
    }
}

/// Apply `action` in place. Returns whether the state changed.
///
/// Unknown ids and duplicate restores leave the state untouched; no action
/// fails.
pub fn apply(state: &mut TaskEnvelope, action: Action, now: Timestamp) -> bool {
    match action {
        Action::Init(envelope) => {
            *state = envelope;
            true
        }
        Action::Add { title, due_date, kind } => {
            state.todos.push(Task::create(title, due_date, kind, now));
            true
        }
        Action::Toggle(id) => with_task(state, &id, |task| {
            task.is_completed = !task.is_completed;
            task.touch(now);
        }),
        Action::Update { id, patch } => with_task(state, &id, |task| {
            patch.apply_to(task);
            task.touch(now);
        }),
        Action::Delete(id) => {
            let before = state.todos.len();
            state.todos.retain(|task| task.id != id);
            state.todos.len() != before
        }
        Action::Restore(task) => {
            if state.contains(&task.id) {
                return false;
            }
            state.todos.push(task.normalized());
            true
        }
        Action::MarkAll => {
            let mut changed = false;
            for task in state.todos.iter_mut().filter(|task| !task.is_completed) {
                task.is_completed = true;
                task.touch(now);
                changed = true;
            }
            changed
        }
        Action::ClearCompleted => {
            let before = state.todos.len();
            state.todos.retain(|task| !task.is_completed);
            state.todos.len() != before
        }
    }
}

/// Apply `action` to a copy of `state`.
#[must_use]
pub fn reduce(state: &TaskEnvelope, action: Action, now: Timestamp) -> TaskEnvelope {
    let mut next = state.clone();
    apply(&mut next, action, now);
    next
}

fn with_task(state: &mut TaskEnvelope, id: &TaskId, f: impl FnOnce(&mut Task)) -> bool {
    let Some(task) = state.todos.iter_mut().find(|task| task.id == *id) else {
        return false;
    };
    f(task);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> Timestamp {
        Timestamp::parse(text).unwrap_or_else(|err| panic!("must parse timestamp: {err}"))
    }

    fn id(raw: &str) -> TaskId {
        raw.parse().unwrap_or_else(|err| panic!("id: {err}"))
    }

    fn task(raw_id: &str, title: &str, done: bool) -> Task {
        let mut task = Task::create(title, None, TaskType::Other, at("2026-02-10T00:00:00Z"));
        task.id = id(raw_id);
        task.is_completed = done;
        task
    }

    fn state() -> TaskEnvelope {
        TaskEnvelope::new(vec![task("a", "open", false), task("b", "done", true)])
    }

    #[test]
    fn add_appends_incomplete_task() {
        let now = at("2026-02-19T08:00:00Z");
        let next = reduce(
            &state(),
            Action::Add {
                title: "Read".into(),
                due_date: DueDate::new("2026-02-20"),
                kind: TaskType::Homework,
            },
            now,
        );
        let Some(added) = next.todos.last() else {
            panic!("task appended");
        };
        assert_eq!(next.todos.len(), 3);
        assert_eq!(added.title, "Read");
        assert!(!added.is_completed);
        assert_eq!(added.created_at, now);
        assert_eq!(added.updated_at, now);
    }

    #[test]
    fn toggle_flips_and_refreshes() {
        let now = at("2026-02-19T08:00:00Z");
        let mut current = state();
        assert!(apply(&mut current, Action::Toggle(id("a")), now));
        assert!(current.todos[0].is_completed);
        assert_eq!(current.todos[0].updated_at, now);

        assert!(!apply(&mut current, Action::Toggle(id("zzz")), now));
    }

    #[test]
    fn update_missing_id_changes_nothing() {
        let before = state();
        let after = reduce(
            &before,
            Action::Update {
                id: id("missing-id"),
                patch: TaskPatch::title("Y"),
            },
            at("2026-02-19T08:00:00Z"),
        );
        assert_eq!(after, before);
    }

    #[test]
    fn update_refreshes_even_when_patch_is_empty() {
        let now = at("2026-02-19T08:00:00Z");
        let after = reduce(
            &state(),
            Action::Update {
                id: id("a"),
                patch: TaskPatch::default(),
            },
            now,
        );
        assert_eq!(after.todos[0].title, "open");
        assert_eq!(after.todos[0].updated_at, now);
    }

    #[test]
    fn mistyped_patch_fields_do_not_block_valid_ones() {
        let now = at("2026-02-19T08:00:00Z");
        let patch = TaskPatch::from_json(&serde_json::json!({ "title": 7, "type": "exam" }));
        let after = reduce(&state(), Action::Update { id: id("a"), patch }, now);

        assert_eq!(after.todos[0].title, "open");
        assert_eq!(after.todos[0].kind, TaskType::Exam);
        assert_eq!(after.todos[0].updated_at, now);
    }

    #[test]
    fn mark_all_leaves_completed_tasks_untouched() {
        let before = state();
        let after = reduce(&before, Action::MarkAll, at("2026-02-19T08:00:00Z"));
        assert!(after.todos.iter().all(|task| task.is_completed));
        assert_eq!(after.todos[1].updated_at, before.todos[1].updated_at);
        assert_ne!(after.todos[0].updated_at, before.todos[0].updated_at);
    }

    #[test]
    fn restore_of_existing_id_is_noop() {
        let mut current = state();
        let mut clone = task("a", "imposter", false);
        clone.is_completed = true;
        assert!(!apply(&mut current, Action::Restore(clone), Timestamp::now()));
        assert_eq!(current, state());
    }

    #[test]
    fn delete_then_restore_round_trips() {
        let mut current = state();
        let removed = current.todos[0].clone();
        assert!(apply(&mut current, Action::Delete(id("a")), Timestamp::now()));
        assert!(!apply(&mut current, Action::Delete(id("a")), Timestamp::now()));
        assert!(apply(&mut current, Action::Restore(removed.clone()), Timestamp::now()));
        assert_eq!(current.find(&id("a")), Some(&removed));
    }

    #[test]
    fn clear_completed_keeps_active() {
        let mut current = state();
        assert!(apply(&mut current, Action::ClearCompleted, Timestamp::now()));
        assert_eq!(current.todos.len(), 1);
        assert!(!apply(&mut current, Action::ClearCompleted, Timestamp::now()));
    }
}
