use crate::domain::TaskStatus;
use crossterm::style::{ContentStyle, Stylize};

/// Header and section title style
pub fn title_style() -> ContentStyle {
    ContentStyle::new().cyan().bold()
}

/// Day heading style
pub fn day_style() -> ContentStyle {
    ContentStyle::new().yellow().bold()
}

/// Status badge style
pub fn status_style(status: TaskStatus) -> ContentStyle {
    match status {
        TaskStatus::Todo => ContentStyle::new().white(),
        TaskStatus::InProgress => ContentStyle::new().magenta().bold(),
        TaskStatus::Completed => ContentStyle::new().green(),
    }
}

/// Success message style
pub fn success_style() -> ContentStyle {
    ContentStyle::new().green()
}

/// Warning message style
pub fn warning_style() -> ContentStyle {
    ContentStyle::new().yellow()
}

/// Error message style
pub fn error_style() -> ContentStyle {
    ContentStyle::new().red().bold()
}

/// Hints and secondary text
pub fn hint_style() -> ContentStyle {
    ContentStyle::new().dark_grey()
}

/// Countdown timer style
pub fn timer_style() -> ContentStyle {
    ContentStyle::new().cyan()
}
