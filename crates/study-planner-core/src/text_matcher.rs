use crate::Task;

/// Case-insensitive substring matcher for task titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query string into a matcher. Returns `None` for blank inputs.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_lowercase(),
        })
    }

    /// Lowercased query text.
    #[must_use]
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Determine whether the task title contains the query.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        task.title.to_lowercase().contains(&self.needle)
    }
}
