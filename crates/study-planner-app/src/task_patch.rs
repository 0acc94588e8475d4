use serde_json::Value;
use study_planner_core::{DueDate, Task, TaskType};

/// Partial update for a single task.
///
/// `due_date` is doubly optional: `None` leaves the date alone, `Some(None)`
/// clears it and `Some(Some(date))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement category.
    pub kind: Option<TaskType>,
    /// Replacement or removal of the due date.
    pub due_date: Option<Option<DueDate>>,
}

impl TaskPatch {
    /// Patch that only renames the task.
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Build a patch from a loosely typed JSON object.
    ///
    /// Fields with the wrong JSON type are ignored. Non-objects yield an empty
    /// patch.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };
        Self {
            title: fields.get("title").and_then(Value::as_str).map(str::to_owned),
            kind: fields
                .get("type")
                .and_then(Value::as_str)
                .map(TaskType::parse_or_default),
            due_date: match fields.get("dueDate") {
                Some(Value::Null) => Some(None),
                Some(Value::String(raw)) => Some(DueDate::new(raw.as_str())),
                _ => None,
            },
        }
    }

    /// Returns true when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.kind.is_none() && self.due_date.is_none()
    }

    /// Write the present fields into `task`. Timestamps are left to the caller.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(kind) = self.kind {
            task.kind = kind;
        }
        if let Some(due_date) = &self.due_date {
            task.due_date.clone_from(due_date);
        }
    }
}
