//! On-disk JSON layouts and the migration from older ones.
//!
//! Three layouts have existed:
//! - current: `{"user_info": {...}, "tasks": [...]}` with a `status` label per task
//! - status-less: same wrapper, but tasks carry `completed: bool`
//! - oldest: the whole file is a bare array of task objects, no points
//!
//! Everything is read into the same in-memory `User`; saving always writes
//! the current layout.

use crate::domain::task::generate_id;
use crate::domain::{Task, TaskStatus, User};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Title given to stored tasks that have none
pub const UNTITLED: &str = "Untitled Task";

/// Top-level layout of a data file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Object with `user_info` and/or `tasks`
    Current,
    /// Bare array of tasks
    BareList,
    Unknown,
}

/// Classify a parsed document
pub fn detect_shape(value: &Value) -> Shape {
    match value {
        Value::Object(map) if map.contains_key("user_info") || map.contains_key("tasks") => {
            Shape::Current
        }
        Value::Array(_) => Shape::BareList,
        _ => Shape::Unknown,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInfoRecord {
    #[serde(default)]
    pub userid: Option<String>,
    #[serde(default)]
    pub points: Option<u64>,
}

/// A task as stored. Reading is lenient: every field may be missing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub due_datetime_str: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    /// Status-less layout only, never written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default)]
    pub pomodoros_completed: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default)]
    pub user_info: Option<UserInfoRecord>,
    #[serde(default)]
    pub tasks: Option<Vec<TaskRecord>>,
}

/// Result of decoding a recognised document
#[derive(Debug, Clone)]
pub struct Decoded {
    pub shape: Shape,
    pub points: u64,
    pub tasks: Vec<Task>,
    /// Tasks whose status came from the legacy `completed` flag
    pub migrated_status: usize,
}

/// Decode a document whose shape is already known to be readable.
/// Returns None for `Shape::Unknown`
pub fn decode(value: Value) -> Result<Option<Decoded>, serde_json::Error> {
    let shape = detect_shape(&value);
    let (points, records) = match shape {
        Shape::Current => {
            let doc: DocumentRecord = serde_json::from_value(value)?;
            let points = doc.user_info.and_then(|info| info.points).unwrap_or(0);
            (points, doc.tasks.unwrap_or_default())
        }
        Shape::BareList => {
            let records: Vec<TaskRecord> = serde_json::from_value(value)?;
            (0, records)
        }
        Shape::Unknown => return Ok(None),
    };

    let migrated_status = records
        .iter()
        .filter(|r| r.status.is_none())
        .filter(|r| r.completed.is_some())
        .count();
    let tasks = records.into_iter().map(TaskRecord::into_task).collect();

    Ok(Some(Decoded {
        shape,
        points,
        tasks,
        migrated_status,
    }))
}

impl TaskRecord {
    /// Normalize a stored task, defaulting whatever is missing or invalid
    pub fn into_task(self) -> Task {
        let id = match self.id {
            Some(id) if id != 0 => id,
            _ => generate_id(),
        };
        let mut task = Task::with_id(id, self.title.unwrap_or_else(|| UNTITLED.to_string()));

        task.due_datetime = self.due_datetime_str.as_deref().and_then(|raw| {
            let parsed = parse_due(raw);
            if parsed.is_none() {
                warn!(task = id, value = raw, "unparseable due date, treating as unscheduled");
            }
            parsed
        });

        task.project = self.project;

        task.priority = match self.priority {
            Some(p @ 1..=3) => Some(p as u8),
            Some(other) => {
                warn!(task = id, priority = other, "priority out of range, dropped");
                None
            }
            None => None,
        };

        task.status = match self.status.as_deref() {
            Some(label) => TaskStatus::from_label(label).unwrap_or_else(|| {
                warn!(task = id, status = label, "unknown status, reset to Todo");
                TaskStatus::Todo
            }),
            None if self.completed == Some(true) => TaskStatus::Completed,
            None => TaskStatus::Todo,
        };

        task.pomodoros_completed = self.pomodoros_completed.unwrap_or(0);
        task
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            id: Some(task.id),
            title: Some(task.title.clone()),
            due_datetime_str: task.due_datetime.map(format_due),
            project: task.project.clone(),
            priority: task.priority.map(i64::from),
            status: Some(task.status.label().to_string()),
            completed: None,
            pomodoros_completed: Some(task.pomodoros_completed),
        }
    }
}

/// Encode a user in the current layout
pub fn encode(user: &User) -> DocumentRecord {
    DocumentRecord {
        user_info: Some(UserInfoRecord {
            userid: Some(user.userid.clone()),
            points: Some(user.points),
        }),
        tasks: Some(user.tasks.iter().map(TaskRecord::from_task).collect()),
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp. Offsets are converted to local time,
/// a bare date means midnight
pub fn parse_due(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Format a timestamp as ISO-8601, with fractional seconds only when present
pub fn format_due(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}
