use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Date;

use crate::kind::TaskType;
use crate::ranking::{TaskRow, rank_rows};
use crate::text_matcher::TextMatcher;
use crate::Task;

/// Completion-state filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// Keep everything.
    #[default]
    All,
    /// Keep incomplete tasks.
    Active,
    /// Keep completed tasks.
    Completed,
}

/// Category filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    /// Keep every category.
    #[default]
    All,
    /// Keep a single category.
    Only(TaskType),
}

/// Returned when a filter token is not recognized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown filter value: {0}")]
pub struct UnknownFilter(pub String);

impl StatusFilter {
    /// Wire/CLI representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Whether `task` passes this filter.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.is_completed,
            Self::Completed => task.is_completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownFilter(other.to_owned())),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TypeFilter {
    /// Whether `task` passes this filter.
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(kind) => task.kind == kind,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse::<TaskType>()
            .map(Self::Only)
            .map_err(|_| UnknownFilter(s.to_owned()))
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(kind) => kind.fmt(f),
        }
    }
}

/// Status, type and search narrowing applied before ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    /// Completion-state filter.
    pub status: StatusFilter,
    /// Category filter.
    pub kind: TypeFilter,
    /// Optional title search.
    pub search: Option<TextMatcher>,
}

impl ViewFilter {
    /// Build a filter; blank search text keeps everything.
    #[must_use]
    pub fn new(status: StatusFilter, kind: TypeFilter, search: &str) -> Self {
        Self {
            status,
            kind,
            search: TextMatcher::new(search),
        }
    }

    /// Whether `task` passes every clause.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.matches(task)
            && self.kind.matches(task)
            && self.search.as_ref().is_none_or(|matcher| matcher.matches(task))
    }

    /// Filter and rank `tasks` into display rows.
    #[must_use]
    pub fn rows<'a>(&self, tasks: &'a [Task], today: Date) -> Vec<TaskRow<'a>> {
        rank_rows(tasks.iter().filter(|task| self.matches(task)), today)
    }
}

/// Filter `tasks` and order the survivors by urgency relative to `today`.
#[must_use]
pub fn derive_view<'a>(
    tasks: &'a [Task],
    status: StatusFilter,
    kind: TypeFilter,
    search: &str,
    today: Date,
) -> Vec<&'a Task> {
    ViewFilter::new(status, kind, search)
        .rows(tasks, today)
        .into_iter()
        .map(|row| row.task)
        .collect()
}
