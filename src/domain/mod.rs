pub mod enums;
pub mod level;
pub mod selection;
pub mod task;
pub mod user;
pub mod views;

pub use enums::{SessionKind, TaskStatus};
pub use level::{LevelTable, LevelTableError};
pub use selection::{select, InvalidToken, SelectMode, Selection, SelectionError};
pub use task::{Task, TaskId};
pub use user::{CompletionReport, LevelUp, User};
pub use views::{completed, day_label, group_by_day, incomplete, task_summary, unscheduled};
