use super::task::Task;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// Incomplete tasks, dated ones first in due order, then by title
pub fn incomplete(tasks: &[Task]) -> Vec<&Task> {
    let mut rows: Vec<&Task> = tasks.iter().filter(|t| !t.is_completed()).collect();
    // None sorts after every date
    rows.sort_by_cached_key(|t| (t.due_datetime.is_none(), t.due_datetime, t.sort_title()));
    rows
}

/// Completed tasks sorted by title, case-insensitively
pub fn completed(tasks: &[Task]) -> Vec<&Task> {
    let mut rows: Vec<&Task> = tasks.iter().filter(|t| t.is_completed()).collect();
    rows.sort_by_cached_key(|t| t.sort_title());
    rows
}

/// Incomplete tasks without a due date, sorted by title
pub fn unscheduled<'a>(incomplete: &[&'a Task]) -> Vec<&'a Task> {
    let mut rows: Vec<&Task> = incomplete
        .iter()
        .copied()
        .filter(|t| t.due_datetime.is_none())
        .collect();
    rows.sort_by_cached_key(|t| t.sort_title());
    rows
}

/// Group dated tasks by calendar day. Undated tasks are skipped.
/// Within a day, tasks keep their due order (input order on ties)
pub fn group_by_day<'a>(tasks: &[&'a Task]) -> BTreeMap<NaiveDate, Vec<&'a Task>> {
    let mut days: BTreeMap<NaiveDate, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        if let Some(due) = task.due_datetime {
            days.entry(due.date()).or_default().push(task);
        }
    }
    for day in days.values_mut() {
        // Stable sort keeps input order for equal times
        day.sort_by_key(|t| t.due_datetime);
    }
    days
}

/// Header label for a day: "TODAY", "TOMORROW" or the full date
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "TODAY".to_string()
    } else if date == today + Duration::days(1) {
        "TOMORROW".to_string()
    } else {
        date.format("%A, %B %d, %Y").to_string()
    }
}

/// One-line summary: badge, time, title, project, priority, pomodoros
pub fn task_summary(task: &Task) -> String {
    let time = task
        .due_datetime
        .map(|due| due.format("%I:%M %p").to_string())
        .unwrap_or_else(|| "All Day".to_string());

    let mut line = format!("{} {:<9} {}", task.status.badge(), time, task.title);
    if let Some(project) = &task.project {
        line.push_str(&format!(" ({})", project));
    }
    if let Some(priority) = task.priority {
        line.push_str(&format!(" [P{}]", priority));
    }
    line.push_str(&format!(" (Pomos: {})", task.pomodoros_completed));
    line
}
