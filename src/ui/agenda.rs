use crate::app::Agenda;
use crate::domain::{day_label, task_summary, Task};
use crate::ui::styles::{day_style, hint_style, status_style, title_style};
use chrono::NaiveDate;
use std::io::{self, Write};

/// One task line, the status badge colored by status
pub fn render_task_line<W: Write>(out: &mut W, task: &Task) -> io::Result<()> {
    let summary = task_summary(task);
    let badge = task.status.badge();
    let rest = summary.strip_prefix(badge).unwrap_or(&summary);
    writeln!(out, "  {}{}", status_style(task.status).apply(badge), rest)
}

fn day_heading(date: NaiveDate, today: NaiveDate) -> String {
    let label = day_label(date, today);
    let full = date.format("%A, %B %d, %Y").to_string();
    if label == full {
        full
    } else {
        format!("{} - {}", label, full)
    }
}

/// Dated tasks by day, then unscheduled ones, then completed ones
pub fn render_agenda<W: Write>(
    out: &mut W,
    agenda: &Agenda<'_>,
    completed: &[&Task],
    today: NaiveDate,
) -> io::Result<()> {
    if agenda.is_empty() && completed.is_empty() {
        writeln!(out, "\nNo tasks in your agenda!")?;
        return Ok(());
    }

    writeln!(out, "\n{}", title_style().apply("--- Your Agenda ---"))?;

    for (date, tasks) in &agenda.days {
        let heading = format!("--- {} ---", day_heading(*date, today));
        writeln!(out, "\n{}", day_style().apply(heading))?;
        for task in tasks {
            render_task_line(out, task)?;
        }
    }

    if !agenda.unscheduled.is_empty() {
        writeln!(out, "\n{}", day_style().apply("--- Unscheduled / All Day Tasks ---"))?;
        for task in &agenda.unscheduled {
            render_task_line(out, task)?;
        }
    }

    if !completed.is_empty() {
        writeln!(out, "\n{}", hint_style().apply("--- Completed Tasks ---"))?;
        for task in completed {
            render_task_line(out, task)?;
        }
    }

    Ok(())
}
