use std::io::{self, Write};

use study_planner_core::{DueDate, Stats, TaskId, TaskRow};
use unicode_segmentation::UnicodeSegmentation;

const TITLE_WIDTH: usize = 40;
const ID_WIDTH: usize = 8;

pub(super) fn render_table(
    rows: &[TaskRow<'_>],
    stats: Stats,
    filtered: bool,
    out: &mut impl Write,
) -> io::Result<()> {
    if rows.is_empty() {
        if filtered && stats.total > 0 {
            writeln!(out, "No tasks matched the provided filters")?;
        } else {
            writeln!(out, "No tasks found")?;
        }
    }
    for row in rows {
        writeln!(out, "{}", format_row(row))?;
    }
    writeln!(out)?;
    writeln!(out, "Showing {} of {}", rows.len(), stats.total)?;
    writeln!(out, "{}", summary(stats))
}

pub(super) fn summary(stats: Stats) -> String {
    format!("{} tasks • {} completed", stats.total, stats.completed)
}

pub(super) fn short_id(id: &TaskId) -> String {
    id.as_str().chars().take(ID_WIDTH).collect()
}

/// `! [ ] 3f2a9c1d  Title  Quiz  Due: Feb 19  Today`
fn format_row(row: &TaskRow<'_>) -> String {
    let task = row.task;
    let marker = if row.urgent { '!' } else { ' ' };
    let checkbox = if task.is_completed { "[x]" } else { "[ ]" };
    let title = fit_to_width(&task.title, TITLE_WIDTH);
    let mut line = format!(
        "{marker} {checkbox} {:<ID_WIDTH$}  {title}  {:<8}  {:<11}",
        short_id(&task.id),
        task.kind.label(),
        due_label(task.due_date.as_ref()),
    );
    if let Some(status) = row.status {
        line.push_str("  ");
        line.push_str(status.label());
    }
    line.trim_end().to_owned()
}

fn due_label(due: Option<&DueDate>) -> String {
    due.map_or_else(
        || "No due date".to_owned(),
        |due| format!("Due: {}", due.short_label().unwrap_or_else(|| due.as_str().to_owned())),
    )
}

/// Clip `input` to `width` graphemes, marking the cut with `...`, then pad
/// with spaces so every title column lines up.
fn fit_to_width(input: &str, width: usize) -> String {
    const ELLIPSIS: &str = "...";

    let graphemes: Vec<&str> = input.graphemes(true).collect();
    let mut fitted = match graphemes.len() {
        len if len <= width => input.to_owned(),
        _ if width <= ELLIPSIS.len() => graphemes[..width].concat(),
        _ => graphemes[..width - ELLIPSIS.len()].concat() + ELLIPSIS,
    };
    fitted.extend(std::iter::repeat_n(' ', width.saturating_sub(graphemes.len())));
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_planner_core::{Task, TaskType, Timestamp};
    use time::macros::date;

    fn row_for(task: &Task) -> String {
        format_row(&TaskRow::new(task, date!(2026 - 02 - 19)))
    }

    #[test]
    fn titles_are_clipped_by_grapheme() {
        assert_eq!(fit_to_width("Mühendislik İstatistiği II", 10), "Mühendi...");
        assert_eq!(fit_to_width("e\u{301}e\u{301}e\u{301}e\u{301}", 2), "e\u{301}e\u{301}");
        assert_eq!(fit_to_width("anything", 0), "");
    }

    #[test]
    fn short_titles_are_padded_to_visible_width() {
        assert_eq!(fit_to_width("ğü", 4), "ğü  ");
        assert_eq!(fit_to_width("Simülasyon", 12), "Simülasyon  ");
        assert_eq!(fit_to_width("exact", 5), "exact");
    }

    #[test]
    fn urgent_rows_are_flagged() {
        let task = Task::create("Minitab Kurulumu", DueDate::new("2026-02-20"), TaskType::Other, Timestamp::now());
        let line = row_for(&task);
        assert!(line.starts_with("! [ ] "));
        assert!(line.contains("Due: Feb 20"));
        assert!(line.ends_with("Tomorrow"));
    }

    #[test]
    fn completed_rows_have_no_badge() {
        let mut task = Task::create("SAP Kurulumu", DueDate::new("2026-02-17"), TaskType::Exam, Timestamp::now());
        task.is_completed = true;
        let line = row_for(&task);
        assert!(line.starts_with("  [x] "));
        assert!(line.contains("Exam"));
        assert!(!line.contains("Overdue"));
    }

    #[test]
    fn missing_or_odd_due_dates_are_labelled() {
        assert_eq!(due_label(None), "No due date");
        assert_eq!(due_label(DueDate::new("someday").as_ref()), "Due: someday");
        assert_eq!(due_label(DueDate::new("2026-03-03").as_ref()), "Due: Mar 03");
    }

    #[test]
    fn empty_table_explains_why() -> io::Result<()> {
        let mut out = Vec::new();
        render_table(&[], Stats { total: 2, completed: 0 }, true, &mut out)?;
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("No tasks matched the provided filters"));
        assert!(text.contains("Showing 0 of 2"));
        Ok(())
    }
}
