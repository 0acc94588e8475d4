use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Category of a study task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Short in-class quiz.
    Quiz,
    /// Midterm or final exam.
    Exam,
    /// Homework assignment.
    Homework,
    /// Longer-running project.
    Project,
    /// Anything else. Unknown categories collapse here.
    #[default]
    Other,
}

/// Returned by the strict [`FromStr`] implementation of [`TaskType`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task type: {0}")]
pub struct UnknownTaskType(pub String);

impl TaskType {
    /// Every category in display order.
    pub const ALL: [Self; 5] = [Self::Quiz, Self::Exam, Self::Homework, Self::Project, Self::Other];

    /// Wire representation used in persisted data.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quiz => "quiz",
            Self::Exam => "exam",
            Self::Homework => "homework",
            Self::Project => "project",
            Self::Other => "other",
        }
    }

    /// Human-friendly label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Quiz => "Quiz",
            Self::Exam => "Exam",
            Self::Homework => "Homework",
            Self::Project => "Project",
            Self::Other => "Other",
        }
    }

    /// Lenient parse used by normalization: unknown values become [`TaskType::Other`].
    #[must_use]
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = UnknownTaskType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownTaskType(s.to_owned()))
    }
}
