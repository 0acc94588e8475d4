//! Calendar due dates.
//!
//! A due date is stored as the text the user entered (`YYYY-MM-DD`) and is only
//! interpreted when a calendar day is needed. Text that fails numeric
//! decomposition simply has no day.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, Month};

const DAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const SHORT_LABEL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day]");

/// Error returned by [`DueDate::parse_strict`].
#[derive(Debug, Error)]
pub enum DueDateError {
    /// Input was empty after trimming.
    #[error("due date must not be empty")]
    Empty,
    /// Input was not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid due date `{input}` (expected YYYY-MM-DD): {source}")]
    Invalid {
        /// Rejected input.
        input: String,
        /// Underlying parse failure.
        #[source]
        source: time::error::Parse,
    },
}

/// Due date text, interpreted as a local calendar day.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DueDate(String);

impl DueDate {
    /// Wrap raw due date text. Empty text means "no due date".
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        (!raw.is_empty()).then_some(Self(raw))
    }

    /// Build a due date from a calendar day.
    #[must_use]
    pub fn from_date(date: Date) -> Self {
        Self(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        ))
    }

    /// Parse user input, accepting only real `YYYY-MM-DD` dates.
    ///
    /// # Errors
    /// Returns an error for blank input or text that is not a valid calendar date.
    pub fn parse_strict(input: &str) -> Result<Self, DueDateError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DueDateError::Empty);
        }
        Date::parse(trimmed, DAY_FORMAT)
            .map(Self::from_date)
            .map_err(|source| DueDateError::Invalid {
                input: trimmed.to_owned(),
                source,
            })
    }

    /// Raw text as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Calendar day denoted by the text, if it decomposes into three non-zero numbers.
    ///
    /// Month and day overflow roll into the following months, so `2026-02-30`
    /// is the 2nd of March.
    #[must_use]
    pub fn day(&self) -> Option<Date> {
        let mut parts = self.0.split('-');
        let year = numeric_part(parts.next())?;
        let month = numeric_part(parts.next())?;
        let day = numeric_part(parts.next())?;
        // Two-digit years mean the 1900s.
        let year = if (0..=99).contains(&year) { year + 1900 } else { year };

        let month_index = year.checked_mul(12)?.checked_add(month - 1)?;
        let year = i32::try_from(month_index.div_euclid(12)).ok()?;
        let month = u8::try_from(month_index.rem_euclid(12) + 1).ok()?;
        let first = Date::from_calendar_date(year, Month::try_from(month).ok()?, 1).ok()?;
        first.checked_add(Duration::seconds(day.checked_sub(1)?.checked_mul(86_400)?))
    }

    /// Signed number of calendar days from `today` to the due day.
    #[must_use]
    pub fn days_until(&self, today: Date) -> Option<i64> {
        self.day().map(|due| (due - today).whole_days())
    }

    /// Short label such as `Feb 19`.
    #[must_use]
    pub fn short_label(&self) -> Option<String> {
        self.day().and_then(|day| day.format(SHORT_LABEL_FORMAT).ok())
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn numeric_part(part: Option<&str>) -> Option<i64> {
    let value: i64 = part?.trim().parse().ok()?;
    (value != 0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn due(raw: &str) -> DueDate {
        DueDate::new(raw).unwrap_or_else(|| panic!("non-empty due date"))
    }

    #[test]
    fn empty_text_is_no_due_date() {
        assert!(DueDate::new("").is_none());
    }

    #[test]
    fn decomposes_plain_dates() {
        assert_eq!(due("2026-02-19").day(), Some(date!(2026 - 02 - 19)));
        assert_eq!(due("2026-2-9").day(), Some(date!(2026 - 02 - 09)));
    }

    #[test]
    fn rolls_over_out_of_range_components() {
        assert_eq!(due("2026-02-30").day(), Some(date!(2026 - 03 - 02)));
        assert_eq!(due("2026-13-01").day(), Some(date!(2027 - 01 - 01)));
    }

    #[test]
    fn rejects_non_numeric_or_zero_parts() {
        assert_eq!(due("soon").day(), None);
        assert_eq!(due("2026-00-10").day(), None);
        assert_eq!(due("2026-02").day(), None);
        assert_eq!(due("2026-xx-10").day(), None);
    }

    #[test]
    fn counts_calendar_days() {
        let today = date!(2026 - 02 - 19);
        assert_eq!(due("2026-02-17").days_until(today), Some(-2));
        assert_eq!(due("2026-02-19").days_until(today), Some(0));
        assert_eq!(due("2026-02-20").days_until(today), Some(1));
        assert_eq!(due("2026-03-01").days_until(today), Some(10));
        assert_eq!(due("garbage").days_until(today), None);
    }

    #[test]
    fn short_label_uses_month_abbreviation() {
        assert_eq!(due("2026-02-09").short_label().as_deref(), Some("Feb 09"));
        assert_eq!(due("nope").short_label(), None);
    }

    #[test]
    fn strict_parse_requires_real_dates() {
        assert_eq!(
            DueDate::parse_strict(" 2026-02-19 ")
                .unwrap_or_else(|err| panic!("must parse: {err}"))
                .as_str(),
            "2026-02-19"
        );
        assert!(matches!(DueDate::parse_strict("2026-02-30"), Err(DueDateError::Invalid { .. })));
        assert!(matches!(DueDate::parse_strict("  "), Err(DueDateError::Empty)));
    }
}
