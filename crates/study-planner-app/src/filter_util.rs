use std::fmt::{self, Display};

use study_planner_core::{StatusFilter, TypeFilter, ViewFilter};
use thiserror::Error;

/// Error type returned while constructing view filters from user-facing inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterBuildError {
    #[error("invalid status filter: {token}")]
    InvalidStatus { token: String },
    #[error("invalid type filter: {token}")]
    InvalidType { token: String },
}

/// Result alias for filter construction helpers.
pub type FilterBuildResult<T> = Result<T, FilterBuildError>;

/// Builder that accepts user-facing strings and normalizes them into [`ViewFilter`] values.
#[derive(Debug, Clone, Default)]
pub struct ViewQueryBuilder {
    status: StatusFilter,
    kind: TypeFilter,
    search: Option<String>,
}

impl ViewQueryBuilder {
    /// Create a builder that keeps every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the completion filter (`all`, `active` or `completed`, case-insensitive).
    ///
    /// # Errors
    /// Returns an error if the token is not a known status.
    pub fn with_status(mut self, token: &str) -> FilterBuildResult<Self> {
        self.status = normalize_token(token)
            .parse()
            .map_err(|_| FilterBuildError::InvalidStatus {
                token: token.to_string(),
            })?;
        Ok(self)
    }

    /// Configure the category filter (`all` or a task type, case-insensitive).
    ///
    /// # Errors
    /// Returns an error if the token is neither `all` nor a known task type.
    pub fn with_type(mut self, token: &str) -> FilterBuildResult<Self> {
        self.kind = normalize_token(token)
            .parse()
            .map_err(|_| FilterBuildError::InvalidType {
                token: token.to_string(),
            })?;
        Ok(self)
    }

    /// Configure the optional search text (whitespace-only inputs become `None`).
    #[must_use]
    pub fn with_search(mut self, text: Option<&str>) -> Self {
        self.search = text.and_then(|raw| {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });
        self
    }

    /// Build the final [`ViewFilter`].
    #[must_use]
    pub fn build(self) -> ViewFilter {
        ViewFilter::new(self.status, self.kind, self.search.as_deref().unwrap_or_default())
    }
}

fn normalize_token(token: &str) -> String {
    token.trim().to_ascii_lowercase()
}

impl FilterBuildError {
    /// Convert the error into a message that is friendly for end-users.
    #[must_use]
    pub fn describe_user_facing(&self) -> String {
        match self {
            Self::InvalidStatus { token } => {
                format!("Unknown status '{token}'. Use one of: all, active, completed.")
            }
            Self::InvalidType { token } => {
                format!("Unknown type '{token}'. Use one of: all, quiz, exam, homework, project, other.")
            }
        }
    }
}

impl Display for ViewQueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewQueryBuilder")
            .field("status", &self.status)
            .field("kind", &self.kind)
            .field("search", &self.search)
            .finish()
    }
}
