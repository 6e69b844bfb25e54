use super::enums::TaskStatus;
use chrono::{Local, NaiveDateTime};

/// Identifier of a task, unique within its owning user
pub type TaskId = i64;

/// Generate a task id from the current time in milliseconds
pub fn generate_id() -> TaskId {
    Local::now().timestamp_millis()
}

/// A single unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Unique within the owning user, never reassigned after insertion
    pub id: TaskId,
    pub title: String,
    /// None means unscheduled / all day
    pub due_datetime: Option<NaiveDateTime>,
    pub project: Option<String>,
    /// 1 = High, 2 = Medium, 3 = Low
    pub priority: Option<u8>,
    pub status: TaskStatus,
    pub pomodoros_completed: u32,
}

impl Task {
    pub fn new(title: String) -> Self {
        Self::with_id(generate_id(), title)
    }

    pub fn with_id(id: TaskId, title: String) -> Self {
        Self {
            id,
            title,
            due_datetime: None,
            project: None,
            priority: None,
            status: TaskStatus::Todo,
            pomodoros_completed: 0,
        }
    }

    /// Set the status. Returns true if the status changed
    pub fn set_status(&mut self, new_status: TaskStatus) -> bool {
        if self.status == new_status {
            return false;
        }
        self.status = new_status;
        true
    }

    /// Set the status from a label like "In Progress".
    /// Unknown labels leave the task untouched and report no change.
    pub fn set_status_label(&mut self, label: &str) -> bool {
        match TaskStatus::from_label(label) {
            Some(status) => self.set_status(status),
            None => false,
        }
    }

    /// Swap Todo and In Progress. Completed tasks are not toggled.
    /// Returns the new status if it changed
    pub fn toggle_progress(&mut self) -> Option<TaskStatus> {
        let next = match self.status {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Todo,
            TaskStatus::Completed => return None,
        };
        self.set_status(next).then_some(next)
    }

    /// Record one finished work session
    pub fn record_pomodoro(&mut self) {
        self.pomodoros_completed = self.pomodoros_completed.saturating_add(1);
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Lower-cased title used for ordering
    pub fn sort_title(&self) -> String {
        self.title.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_new() {
        let task = Task::new("Write report".to_string());
        assert_eq!(task.title, "Write report");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.pomodoros_completed, 0);
        assert!(task.due_datetime.is_none());
        assert!(task.id > 0);
    }

    #[test]
    fn test_set_status_reports_change() {
        let mut task = Task::with_id(1, "Test".to_string());
        assert!(task.set_status(TaskStatus::InProgress));
        assert_eq!(task.status, TaskStatus::InProgress);

        // Same status is a no-op
        assert!(!task.set_status(TaskStatus::InProgress));
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_set_status_label_rejects_unknown() {
        let mut task = Task::with_id(1, "Test".to_string());
        task.set_status(TaskStatus::InProgress);

        for label in ["Done", "", "todo", "Archived"] {
            assert!(!task.set_status_label(label));
            assert_eq!(task.status, TaskStatus::InProgress);
        }

        assert!(task.set_status_label("Completed"));
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn test_toggle_progress() {
        let mut task = Task::with_id(1, "Test".to_string());
        assert_eq!(task.toggle_progress(), Some(TaskStatus::InProgress));
        assert_eq!(task.toggle_progress(), Some(TaskStatus::Todo));

        task.set_status(TaskStatus::Completed);
        assert_eq!(task.toggle_progress(), None);
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn test_record_pomodoro() {
        let mut task = Task::with_id(1, "Test".to_string());
        task.record_pomodoro();
        task.record_pomodoro();
        assert_eq!(task.pomodoros_completed, 2);
    }
}
