use crate::app::NextLevel;
use crate::domain::Task;
use crate::ui::styles::{hint_style, title_style};
use std::io::{self, Write};

/// Menu entries in display order: key and label
pub const MENU_ITEMS: [(&str, &str); 10] = [
    ("1", "View Agenda"),
    ("2", "Add Task"),
    ("3", "Complete Task(s)"),
    ("4", "Change Task Status"),
    ("5", "Start Pomodoro for Task"),
    ("6", "Delete a Completed Task"),
    ("7", "Delete ALL Completed Tasks"),
    ("8", "Delete My User Data"),
    ("9", "Save & Exit"),
    ("0", "Exit Without Saving"),
];

/// Header line: user, level, points and progress to the next level
pub fn header_text(userid: &str, level: u32, points: u64, next: Option<NextLevel>) -> String {
    let progress = match next {
        Some(next) => format!(" [{} pts to Level {}]", next.points_needed, next.level),
        None => " [Max level]".to_string(),
    };
    format!(
        "===== Task Agenda Menu [User: {}] [Level: {}] [Points: {}]{} =====",
        userid, level, points, progress
    )
}

pub fn render_menu<W: Write>(out: &mut W, header: &str) -> io::Result<()> {
    writeln!(out, "\n{}", title_style().apply(header))?;
    for (key, label) in MENU_ITEMS {
        writeln!(out, "{}. {}", key, label)?;
    }
    Ok(())
}

/// Numbered list for picking tasks, 0-indexed
pub fn render_choices<W: Write>(out: &mut W, heading: &str, tasks: &[&Task]) -> io::Result<()> {
    writeln!(out, "{}", heading)?;
    for (index, task) in tasks.iter().enumerate() {
        writeln!(
            out,
            "  {}: {} {}",
            index,
            task.title,
            hint_style().apply(format!("({})", task.status.label()))
        )?;
    }
    Ok(())
}
