use crate::config::Config;
use crate::domain::{
    self, group_by_day, CompletionReport, Task, TaskId, TaskStatus, User,
};
use crate::persistence::{LoadStatus, Store, StoreError};
use crate::pomodoro::{run_cycle, ContinuePrompt, CycleReport, SessionObserver};
use crate::ticker::Ticker;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Raw answers from the add-task form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    /// YYYY-MM-DD, blank for unscheduled
    pub due_date: String,
    /// HH:MM, only used together with a date
    pub due_time: String,
    pub project: String,
    pub priority: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddTaskError {
    #[error("Task title cannot be empty.")]
    EmptyTitle,
}

/// A field that was ignored while creating a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldWarning {
    DateWithoutTime,
    InvalidDateTime,
    PriorityOutOfRange,
    InvalidPriority,
}

impl fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FieldWarning::DateWithoutTime => "Date specified without time. Treating as unscheduled.",
            FieldWarning::InvalidDateTime => "Invalid date or time format. Task treated as unscheduled.",
            FieldWarning::PriorityOutOfRange => "Priority must be between 1 and 3. Ignoring.",
            FieldWarning::InvalidPriority => "Invalid priority value. Ignoring.",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskAdded {
    pub id: TaskId,
    pub warnings: Vec<FieldWarning>,
}

impl NewTask {
    /// Validate the form into a task. Bad optional fields are dropped with a warning
    pub fn into_task(self) -> Result<(Task, Vec<FieldWarning>), AddTaskError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AddTaskError::EmptyTitle);
        }

        let mut warnings = Vec::new();
        let mut task = Task::new(title.to_string());

        let date = self.due_date.trim();
        let time = self.due_time.trim();
        if !date.is_empty() {
            let parsed_date = NaiveDate::parse_from_str(date, "%Y-%m-%d");
            match (parsed_date, time.is_empty()) {
                (Ok(_), true) => warnings.push(FieldWarning::DateWithoutTime),
                (Ok(day), false) => match NaiveTime::parse_from_str(time, "%H:%M") {
                    Ok(at) => task.due_datetime = Some(NaiveDateTime::new(day, at)),
                    Err(_) => warnings.push(FieldWarning::InvalidDateTime),
                },
                (Err(_), _) => warnings.push(FieldWarning::InvalidDateTime),
            }
        }

        let project = self.project.trim();
        if !project.is_empty() {
            task.project = Some(project.to_string());
        }

        let priority = self.priority.trim();
        if !priority.is_empty() {
            if priority.bytes().all(|b| b.is_ascii_digit()) {
                match priority.parse::<u8>() {
                    Ok(p @ 1..=3) => task.priority = Some(p),
                    _ => warnings.push(FieldWarning::PriorityOutOfRange),
                }
            } else {
                warnings.push(FieldWarning::InvalidPriority);
            }
        }

        Ok((task, warnings))
    }
}

/// Incomplete tasks laid out for display
#[derive(Debug, Default)]
pub struct Agenda<'a> {
    pub unscheduled: Vec<&'a Task>,
    pub days: BTreeMap<NaiveDate, Vec<&'a Task>>,
}

impl Agenda<'_> {
    pub fn is_empty(&self) -> bool {
        self.unscheduled.is_empty() && self.days.is_empty()
    }
}

/// Counts from deleting every completed task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkDelete {
    pub expected: usize,
    pub deleted: usize,
}

/// Points still needed for the next level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextLevel {
    pub level: u32,
    pub points_needed: u64,
}

/// One user's session: the loaded user, the settings and the store behind them
pub struct AppState {
    pub user: User,
    pub config: Config,
    pub load_status: LoadStatus,
    store: Store,
}

impl AppState {
    pub fn load(store: Store, config: Config, userid: &str) -> Self {
        let loaded = store.load(userid);
        if loaded.status.is_migration() {
            info!(user = userid, status = ?loaded.status, "data will be upgraded on next save");
        } else if loaded.status.started_fresh() {
            info!(user = userid, status = ?loaded.status, "starting with an empty user");
        }
        Self {
            user: loaded.user,
            config,
            load_status: loaded.status,
            store,
        }
    }

    pub fn userid(&self) -> &str {
        &self.user.userid
    }

    pub fn data_file(&self) -> PathBuf {
        self.store.path_for(&self.user.userid)
    }

    pub fn level(&self) -> u32 {
        self.user.calculate_level(&self.config.levels)
    }

    /// None at the top level
    pub fn next_level(&self) -> Option<NextLevel> {
        self.config
            .levels
            .next_after(self.user.points)
            .map(|(level, threshold)| NextLevel {
                level,
                points_needed: threshold.saturating_sub(self.user.points),
            })
    }

    pub fn incomplete(&self) -> Vec<&Task> {
        domain::incomplete(&self.user.tasks)
    }

    pub fn completed(&self) -> Vec<&Task> {
        domain::completed(&self.user.tasks)
    }

    pub fn agenda(&self) -> Agenda<'_> {
        let incomplete = self.incomplete();
        Agenda {
            unscheduled: domain::unscheduled(&incomplete),
            days: group_by_day(&incomplete),
        }
    }

    pub fn add_task(&mut self, new_task: NewTask) -> Result<TaskAdded, AddTaskError> {
        let (task, warnings) = new_task.into_task()?;
        let id = self.user.add_task(task);
        info!(task = id, warnings = warnings.len(), "task added");
        Ok(TaskAdded { id, warnings })
    }

    pub fn complete_tasks(&mut self, ids: &[TaskId]) -> CompletionReport {
        let report = self
            .user
            .complete_tasks(ids, self.config.points_per_task, &self.config.levels);
        if let Some(level_up) = report.level_up {
            info!(from = level_up.from, to = level_up.to, "level up");
        }
        report
    }

    /// Swap Todo and In Progress on one task
    pub fn toggle_status(&mut self, id: TaskId) -> Option<TaskStatus> {
        self.user.task_mut(id).and_then(Task::toggle_progress)
    }

    pub fn delete_task(&mut self, id: TaskId) -> bool {
        self.user.remove_task(id)
    }

    pub fn delete_all_completed(&mut self) -> BulkDelete {
        let ids: Vec<TaskId> = self.completed().iter().map(|t| t.id).collect();
        let deleted = self.user.remove_tasks(&ids);
        BulkDelete {
            expected: ids.len(),
            deleted,
        }
    }

    /// Run a Pomodoro cycle on one task. None if the task is gone
    pub fn run_pomodoro<T, IO>(&mut self, id: TaskId, ticker: &mut T, io: &mut IO) -> Option<CycleReport>
    where
        T: Ticker + ?Sized,
        IO: SessionObserver + ContinuePrompt + ?Sized,
    {
        let pomodoro = &self.config.pomodoro;
        let task = self.user.task_mut(id)?;
        Some(run_cycle(task, pomodoro, ticker, io))
    }

    pub fn save(&self) -> Result<PathBuf, StoreError> {
        self.store.save(&self.user)
    }

    /// Remove the user's data file. The in-memory session is left as is
    pub fn delete_user_data(&self) -> Result<bool, StoreError> {
        self.store.delete(&self.user.userid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LevelUp;
    use crate::pomodoro::engine::testing::{RecordingObserver, ScriptedTicker};
    use crate::pomodoro::{CycleEnd, Cue, Session};
    use pretty_assertions::assert_eq;
    use tempfile::{tempdir, TempDir};

    fn fresh_app() -> (TempDir, AppState) {
        let dir = tempdir().unwrap();
        let app = AppState::load(Store::new(dir.path()), Config::default(), "alice");
        (dir, app)
    }

    fn add(app: &mut AppState, title: &str) -> TaskId {
        app.add_task(NewTask {
            title: title.to_string(),
            ..NewTask::default()
        })
        .unwrap()
        .id
    }

    #[test]
    fn test_new_task_full_form() {
        let (task, warnings) = NewTask {
            title: "  Write report ".to_string(),
            due_date: "2024-05-01".to_string(),
            due_time: "14:30".to_string(),
            project: "Work".to_string(),
            priority: "1".to_string(),
        }
        .into_task()
        .unwrap();

        assert!(warnings.is_empty());
        assert_eq!(task.title, "Write report");
        assert_eq!(
            task.due_datetime,
            Some(NaiveDateTime::parse_from_str("2024-05-01 14:30", "%Y-%m-%d %H:%M").unwrap())
        );
        assert_eq!(task.project.as_deref(), Some("Work"));
        assert_eq!(task.priority, Some(1));
        assert_eq!(task.status, TaskStatus::Todo);
    }

    #[test]
    fn test_new_task_requires_title() {
        let result = NewTask {
            title: "   ".to_string(),
            ..NewTask::default()
        }
        .into_task();
        assert_eq!(result.unwrap_err(), AddTaskError::EmptyTitle);
    }

    #[test]
    fn test_new_task_field_warnings() {
        let warned = |due_date: &str, due_time: &str, priority: &str| {
            let (task, warnings) = NewTask {
                title: "T".to_string(),
                due_date: due_date.to_string(),
                due_time: due_time.to_string(),
                project: "  ".to_string(),
                priority: priority.to_string(),
            }
            .into_task()
            .unwrap();
            assert!(task.due_datetime.is_none());
            assert!(task.priority.is_none());
            assert!(task.project.is_none());
            warnings
        };

        assert_eq!(warned("2024-05-01", "", ""), vec![FieldWarning::DateWithoutTime]);
        assert_eq!(warned("05/01/2024", "10:00", ""), vec![FieldWarning::InvalidDateTime]);
        assert_eq!(warned("2024-05-01", "25:99", ""), vec![FieldWarning::InvalidDateTime]);
        assert_eq!(warned("", "10:00", "7"), vec![FieldWarning::PriorityOutOfRange]);
        assert_eq!(warned("", "", "0"), vec![FieldWarning::PriorityOutOfRange]);
        assert_eq!(warned("", "", "high"), vec![FieldWarning::InvalidPriority]);
        assert_eq!(warned("", "", "-1"), vec![FieldWarning::InvalidPriority]);
    }

    #[test]
    fn test_complete_tasks_awards_points_once_per_task() {
        let (_dir, mut app) = fresh_app();
        app.user.points = 95;
        let a = add(&mut app, "A");
        let b = add(&mut app, "B");

        let report = app.complete_tasks(&[a]);
        assert_eq!(report.completed, 1);
        assert_eq!(report.total_points, 105);
        assert_eq!(report.level_up, Some(LevelUp { from: 1, to: 2 }));

        // Completing again earns nothing
        let report = app.complete_tasks(&[a, b]);
        assert_eq!(report.completed, 1);
        assert_eq!(report.points_earned, 10);
        assert_eq!(app.user.points, 115);
        assert_eq!(app.level(), 2);
        assert_eq!(
            app.next_level(),
            Some(NextLevel {
                level: 3,
                points_needed: 135
            })
        );
    }

    #[test]
    fn test_toggle_status() {
        let (_dir, mut app) = fresh_app();
        let id = add(&mut app, "A");

        assert_eq!(app.toggle_status(id), Some(TaskStatus::InProgress));
        assert_eq!(app.toggle_status(id), Some(TaskStatus::Todo));

        app.complete_tasks(&[id]);
        assert_eq!(app.toggle_status(id), None);
        assert_eq!(app.toggle_status(-1), None);
    }

    #[test]
    fn test_agenda_and_lists() {
        let (_dir, mut app) = fresh_app();
        let dated = app
            .add_task(NewTask {
                title: "Dated".to_string(),
                due_date: "2024-05-01".to_string(),
                due_time: "09:00".to_string(),
                ..NewTask::default()
            })
            .unwrap()
            .id;
        let floating = add(&mut app, "Floating");
        let done = add(&mut app, "Done");
        app.complete_tasks(&[done]);

        let ids = |tasks: Vec<&Task>| tasks.iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(ids(app.incomplete()), vec![dated, floating]);
        assert_eq!(ids(app.completed()), vec![done]);

        let agenda = app.agenda();
        assert!(!agenda.is_empty());
        assert_eq!(ids(agenda.unscheduled.clone()), vec![floating]);
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(ids(agenda.days[&day].clone()), vec![dated]);
    }

    #[test]
    fn test_delete_operations() {
        let (_dir, mut app) = fresh_app();
        let a = add(&mut app, "A");
        let b = add(&mut app, "B");
        let c = add(&mut app, "C");
        app.complete_tasks(&[a, b]);

        assert!(app.delete_task(a));
        assert!(!app.delete_task(a));

        let bulk = app.delete_all_completed();
        assert_eq!(bulk, BulkDelete { expected: 1, deleted: 1 });
        assert_eq!(app.user.tasks.len(), 1);
        assert_eq!(app.user.tasks[0].id, c);

        let bulk = app.delete_all_completed();
        assert_eq!(bulk, BulkDelete { expected: 0, deleted: 0 });
    }

    struct DecliningIo(RecordingObserver);

    impl SessionObserver for DecliningIo {
        fn tick(&mut self, session: &Session) {
            self.0.tick(session);
        }

        fn cue(&mut self, session: &Session, cue: Cue) {
            self.0.cue(session, cue);
        }
    }

    impl ContinuePrompt for DecliningIo {
        fn ask_continue(&mut self, _task: &Task, _work_sessions: u32) -> Option<String> {
            Some("n".to_string())
        }
    }

    #[test]
    fn test_run_pomodoro() {
        let (_dir, mut app) = fresh_app();
        app.config.pomodoro.work_minutes = 1;
        app.config.pomodoro.short_break_minutes = 1;
        let id = add(&mut app, "Focus");
        let mut io = DecliningIo(RecordingObserver::default());

        let report = app
            .run_pomodoro(id, &mut ScriptedTicker::default(), &mut io)
            .unwrap();
        assert_eq!(report.end, CycleEnd::Declined);
        assert_eq!(app.user.task(id).unwrap().pomodoros_completed, 1);
        assert_eq!(app.user.task(id).unwrap().status, TaskStatus::InProgress);

        assert!(app
            .run_pomodoro(-1, &mut ScriptedTicker::default(), &mut io)
            .is_none());
    }

    #[test]
    fn test_save_reload_and_delete_user_data() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path());
        let mut app = AppState::load(store.clone(), Config::default(), "alice");
        assert_eq!(app.load_status, LoadStatus::Fresh);
        let id = add(&mut app, "Persist me");
        app.complete_tasks(&[id]);

        let path = app.save().unwrap();
        assert_eq!(path, app.data_file());

        let reloaded = AppState::load(store.clone(), Config::default(), "alice");
        assert_eq!(reloaded.user, app.user);
        assert_eq!(reloaded.load_status, LoadStatus::Loaded { migrated_status: 0 });

        assert!(reloaded.delete_user_data().unwrap());
        assert!(!path.exists());
        assert!(!reloaded.delete_user_data().unwrap());
    }
}
