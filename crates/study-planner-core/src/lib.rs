//! Domain types, ranking and filtering for the study planner.

/// Time sources.
pub mod clock;
/// Calendar due dates.
pub mod due;
/// View filters and derivation.
pub mod filter;
/// Identifier types.
pub mod id;
/// Task categories.
pub mod kind;
/// Lenient decoding of stored tasks.
pub mod normalize;
/// Urgency ranking.
pub mod ranking;
/// Case-insensitive title search.
pub mod text_matcher;
/// Millisecond UTC timestamps.
pub mod timestamp;

use serde::{Deserialize, Serialize};

pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::due::{DueDate, DueDateError};
pub use crate::filter::{StatusFilter, TypeFilter, ViewFilter, derive_view};
pub use crate::id::TaskId;
pub use crate::kind::TaskType;
pub use crate::ranking::{DueStatus, Rank, RankGroup, TaskRow};
pub use crate::text_matcher::TextMatcher;
pub use crate::timestamp::Timestamp;

/// Version written into every persisted envelope.
pub const STORAGE_VERSION: u32 = 2;

/// A single study task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, immutable identifier.
    pub id: TaskId,
    /// Display title.
    pub title: String,
    /// Category.
    #[serde(rename = "type")]
    pub kind: TaskType,
    /// Completion flag.
    pub is_completed: bool,
    /// Creation instant; never changes.
    pub created_at: Timestamp,
    /// Last mutation instant; never earlier than `created_at`.
    pub updated_at: Timestamp,
    /// Optional due day.
    pub due_date: Option<DueDate>,
}

impl Task {
    /// Create an incomplete task stamped with `now`.
    ///
    /// Titles are not validated here; callers only submit non-empty ones.
    #[must_use]
    pub fn create(
        title: impl Into<String>,
        due_date: Option<DueDate>,
        kind: TaskType,
        now: Timestamp,
    ) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            kind,
            is_completed: false,
            created_at: now,
            updated_at: now,
            due_date,
        }
    }

    /// Create a task stamped with the wall clock.
    #[must_use]
    pub fn new(title: impl Into<String>, due_date: Option<DueDate>, kind: TaskType) -> Self {
        Self::create(title, due_date, kind, Timestamp::now())
    }

    /// Refresh `updated_at`, keeping it at or after `created_at`.
    pub fn touch(&mut self, now: Timestamp) {
        self.updated_at = now.max(self.created_at);
    }
}

/// Versioned wrapper around the persisted task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEnvelope {
    /// Storage schema version.
    pub version: u32,
    /// Tasks in insertion order.
    pub todos: Vec<Task>,
}

impl Default for TaskEnvelope {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TaskEnvelope {
    /// Wrap tasks in a current-version envelope.
    #[must_use]
    pub const fn new(todos: Vec<Task>) -> Self {
        Self {
            version: STORAGE_VERSION,
            todos,
        }
    }

    /// Look up a task by id.
    #[must_use]
    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.todos.iter().find(|task| task.id == *id)
    }

    /// Returns true when a task with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &TaskId) -> bool {
        self.find(id).is_some()
    }

    /// Counters for the current list.
    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats::from_tasks(&self.todos)
    }
}

/// Total/completed counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Number of tasks.
    pub total: usize,
    /// Number of completed tasks.
    pub completed: usize,
}

impl Stats {
    /// Count the given tasks.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            total: tasks.len(),
            completed: tasks.iter().filter(|task| task.is_completed).count(),
        }
    }

    /// Number of incomplete tasks.
    #[must_use]
    pub const fn active(self) -> usize {
        self.total - self.completed
    }

    /// "Mark all" does something only when an incomplete task exists.
    #[must_use]
    pub const fn can_mark_all(self) -> bool {
        self.total > 0 && self.completed < self.total
    }

    /// "Clear completed" does something only when a completed task exists.
    #[must_use]
    pub const fn can_clear(self) -> bool {
        self.completed > 0
    }
}
