use serde::{Deserialize, Serialize};

/// Progress status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Parse status from its stored label like "In Progress"
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Todo" => Some(Self::Todo),
            "In Progress" => Some(Self::InProgress),
            "Completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Convert status to its stored label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Short badge used in task listings
    pub fn badge(&self) -> &'static str {
        match self {
            Self::Todo => "[Todo]",
            Self::InProgress => "[Prog]",
            Self::Completed => "[Done]",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Kind of a Pomodoro session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionKind {
    /// Get the display name for this kind
    pub fn name(&self) -> &'static str {
        match self {
            SessionKind::Work => "Work",
            SessionKind::ShortBreak => "Short Break",
            SessionKind::LongBreak => "Long Break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, SessionKind::Work)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_label() {
        assert_eq!(TaskStatus::from_label("Todo"), Some(TaskStatus::Todo));
        assert_eq!(TaskStatus::from_label("In Progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::from_label("Completed"), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::from_label("completed"), None);
        assert_eq!(TaskStatus::from_label("Done"), None);
    }

    #[test]
    fn test_status_label_round_trips() {
        for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed] {
            assert_eq!(TaskStatus::from_label(status.label()), Some(status));
        }
    }

    #[test]
    fn test_status_serde_uses_labels() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let parsed: TaskStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(parsed, TaskStatus::Completed);
    }

    #[test]
    fn test_session_kind_is_break() {
        assert!(!SessionKind::Work.is_break());
        assert!(SessionKind::ShortBreak.is_break());
        assert!(SessionKind::LongBreak.is_break());
    }
}
