//! Urgency ranking.
//!
//! Every task gets a [`Rank`] relative to a calendar day. Sorting is by group,
//! then (for dated incomplete tasks) by days remaining and due day, and finally
//! by creation time. The sort is stable, so fully tied tasks keep list order.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;
use time::Date;

use crate::Task;

/// Ranking bucket. Lower buckets sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankGroup {
    /// Incomplete, due before today.
    Overdue = 0,
    /// Incomplete, due today.
    Today = 1,
    /// Incomplete, due tomorrow.
    Tomorrow = 2,
    /// Incomplete, due later.
    Upcoming = 3,
    /// Completed, whatever the due date.
    Completed = 5,
    /// Incomplete without a usable due date.
    Unscheduled = 6,
}

impl RankGroup {
    /// Numeric bucket value.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Buckets ordered by due date inside the bucket.
    #[must_use]
    pub const fn is_dated(self) -> bool {
        matches!(self, Self::Overdue | Self::Today | Self::Tomorrow | Self::Upcoming)
    }
}

/// Rank tuple `(group, due_days)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rank {
    /// Ranking bucket.
    pub group: RankGroup,
    /// Signed days until the due day; only set for dated buckets.
    pub due_days: Option<i64>,
}

/// Badge shown next to incomplete tasks that are due soon or late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DueStatus {
    /// Due day has passed.
    Overdue,
    /// Due today.
    Today,
    /// Due tomorrow.
    Tomorrow,
}

impl DueStatus {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overdue => "Overdue",
            Self::Today => "Today",
            Self::Tomorrow => "Tomorrow",
        }
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Task {
    /// Signed days until the due day, if the task has a usable one.
    #[must_use]
    pub fn due_days(&self, today: Date) -> Option<i64> {
        self.due_date.as_ref().and_then(|due| due.days_until(today))
    }

    /// Rank relative to `today`.
    #[must_use]
    pub fn rank(&self, today: Date) -> Rank {
        if self.is_completed {
            return Rank {
                group: RankGroup::Completed,
                due_days: None,
            };
        }
        let Some(days) = self.due_days(today) else {
            return Rank {
                group: RankGroup::Unscheduled,
                due_days: None,
            };
        };
        let group = match days {
            d if d < 0 => RankGroup::Overdue,
            0 => RankGroup::Today,
            1 => RankGroup::Tomorrow,
            _ => RankGroup::Upcoming,
        };
        Rank {
            group,
            due_days: Some(days),
        }
    }

    /// Incomplete and due today or tomorrow.
    #[must_use]
    pub fn is_urgent(&self, today: Date) -> bool {
        !self.is_completed && matches!(self.due_days(today), Some(0 | 1))
    }

    /// Due badge, if any.
    #[must_use]
    pub fn due_status(&self, today: Date) -> Option<DueStatus> {
        if self.is_completed {
            return None;
        }
        match self.due_days(today)? {
            d if d < 0 => Some(DueStatus::Overdue),
            0 => Some(DueStatus::Today),
            1 => Some(DueStatus::Tomorrow),
            _ => None,
        }
    }
}

/// A task paired with everything a list view needs to draw it.
#[derive(Debug, Clone, Copy)]
pub struct TaskRow<'a> {
    /// The task itself.
    pub task: &'a Task,
    /// Rank relative to the view's day.
    pub rank: Rank,
    /// Due badge.
    pub status: Option<DueStatus>,
    /// Due today or tomorrow and still open.
    pub urgent: bool,
}

impl<'a> TaskRow<'a> {
    /// Classify `task` relative to `today`.
    #[must_use]
    pub fn new(task: &'a Task, today: Date) -> Self {
        Self {
            task,
            rank: task.rank(today),
            status: task.due_status(today),
            urgent: task.is_urgent(today),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.rank
            .group
            .cmp(&other.rank.group)
            .then_with(|| {
                if self.rank.group.is_dated() {
                    self.rank.due_days.cmp(&other.rank.due_days).then_with(|| {
                        let a = self.task.due_date.as_ref().and_then(crate::DueDate::day);
                        let b = other.task.due_date.as_ref().and_then(crate::DueDate::day);
                        a.cmp(&b)
                    })
                } else {
                    Ordering::Equal
                }
            })
            .then_with(|| self.task.created_at.cmp(&other.task.created_at))
    }
}

/// Classify and order tasks by urgency. The sort is stable.
#[must_use]
pub fn rank_rows<'a, I>(tasks: I, today: Date) -> Vec<TaskRow<'a>>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut rows: Vec<TaskRow<'a>> = tasks.into_iter().map(|task| TaskRow::new(task, today)).collect();
    rows.sort_by(TaskRow::compare);
    rows
}

/// Compare two tasks by urgency relative to `today`.
#[must_use]
pub fn compare_tasks(a: &Task, b: &Task, today: Date) -> Ordering {
    TaskRow::new(a, today).compare(&TaskRow::new(b, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DueDate, TaskType, Timestamp};
    use time::macros::date;

    const TODAY: Date = date!(2026 - 02 - 19);

    fn at(secs: i64) -> Timestamp {
        let dt = time::OffsetDateTime::from_unix_timestamp(1_771_000_000 + secs)
            .unwrap_or_else(|err| panic!("must convert unix timestamp: {err}"));
        Timestamp::from_datetime(dt)
    }

    fn task(title: &str, due: Option<&str>, created: i64) -> Task {
        Task::create(title, due.and_then(DueDate::new), TaskType::Other, at(created))
    }

    fn titles(rows: &[TaskRow<'_>]) -> Vec<String> {
        rows.iter().map(|row| row.task.title.clone()).collect()
    }

    #[test]
    fn orders_by_urgency_buckets() {
        let tasks = vec![
            task("none", None, 0),
            task("plus5", Some("2026-02-24"), 1),
            task("tomorrow", Some("2026-02-20"), 2),
            task("today", Some("2026-02-19"), 3),
            task("overdue", Some("2026-02-17"), 4),
        ];

        let rows = rank_rows(&tasks, TODAY);
        assert_eq!(titles(&rows), vec!["overdue", "today", "tomorrow", "plus5", "none"]);
    }

    #[test]
    fn overdue_example_is_not_urgent() {
        let overdue = task("X", Some("2026-02-17"), 0);
        let rank = overdue.rank(TODAY);
        assert_eq!(rank.group, RankGroup::Overdue);
        assert_eq!(rank.group.ordinal(), 0);
        assert_eq!(rank.due_days, Some(-2));
        assert_eq!(overdue.due_status(TODAY), Some(DueStatus::Overdue));
        assert!(!overdue.is_urgent(TODAY));
    }

    #[test]
    fn completed_tasks_rank_between_upcoming_and_unscheduled() {
        let mut done_overdue = task("done-overdue", Some("2026-02-10"), 0);
        done_overdue.is_completed = true;
        let mut done_undated = task("done-undated", None, 1);
        done_undated.is_completed = true;
        let tasks = vec![
            task("undated", None, 2),
            done_undated,
            done_overdue,
            task("upcoming", Some("2026-03-30"), 3),
        ];

        let rows = rank_rows(&tasks, TODAY);
        assert_eq!(
            titles(&rows),
            vec!["upcoming", "done-overdue", "done-undated", "undated"]
        );
        assert_eq!(rows[1].rank.group, RankGroup::Completed);
        assert_eq!(rows[1].status, None);
        assert!(!rows[1].urgent);
    }

    #[test]
    fn unparsable_due_dates_are_unscheduled() {
        let odd = task("odd", Some("someday"), 0);
        assert_eq!(odd.rank(TODAY).group, RankGroup::Unscheduled);
        assert_eq!(odd.due_status(TODAY), None);
    }

    #[test]
    fn ties_fall_back_to_creation_then_list_order() {
        let tasks = vec![
            task("later", Some("2026-02-25"), 20),
            task("earlier", Some("2026-02-25"), 10),
            task("same-a", None, 5),
            task("same-b", None, 5),
        ];

        let rows = rank_rows(&tasks, TODAY);
        assert_eq!(titles(&rows), vec!["earlier", "later", "same-a", "same-b"]);
    }

    #[test]
    fn soonest_first_within_dated_buckets() {
        let tasks = vec![
            task("overdue-1", Some("2026-02-18"), 0),
            task("overdue-5", Some("2026-02-14"), 1),
            task("in-10", Some("2026-03-01"), 2),
            task("in-3", Some("2026-02-22"), 3),
        ];

        let rows = rank_rows(&tasks, TODAY);
        assert_eq!(titles(&rows), vec!["overdue-5", "overdue-1", "in-3", "in-10"]);
        assert_eq!(
            compare_tasks(&tasks[3], &tasks[2], TODAY),
            Ordering::Less
        );
    }

    #[test]
    fn urgency_covers_today_and_tomorrow_only() {
        assert!(task("t", Some("2026-02-19"), 0).is_urgent(TODAY));
        assert!(task("t", Some("2026-02-20"), 0).is_urgent(TODAY));
        assert!(!task("t", Some("2026-02-21"), 0).is_urgent(TODAY));
        assert_eq!(task("t", Some("2026-02-21"), 0).due_status(TODAY), None);
        assert_eq!(
            task("t", Some("2026-02-20"), 0).due_status(TODAY).map(DueStatus::label),
            Some("Tomorrow")
        );
    }
}
