use super::engine::{run_session, Session, SessionObserver};
use crate::config::PomodoroConfig;
use crate::domain::{SessionKind, Task, TaskStatus};
use crate::ticker::Ticker;
use tracing::info;

/// Asks whether another work session should follow
pub trait ContinuePrompt {
    /// The user's raw answer, or None when input is closed
    fn ask_continue(&mut self, task: &Task, work_sessions: u32) -> Option<String>;
}

/// Why a cycle stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleEnd {
    /// The continue prompt got anything other than yes
    Declined,
    /// A work session was cancelled
    Interrupted,
    /// The continue prompt saw end of input
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// The task moved from Todo to In Progress when the cycle began
    pub auto_started: bool,
    /// That auto-start was undone after a cancelled work session
    pub reverted: bool,
    /// Finished work sessions in this cycle
    pub work_sessions: u32,
    pub end: CycleEnd,
}

/// "y" or "yes", case-insensitive
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Break that follows the given number of finished work sessions
pub fn break_after(work_sessions: u32, config: &PomodoroConfig) -> (SessionKind, u64) {
    let every = config.long_break_every.max(1);
    if work_sessions > 0 && work_sessions % every == 0 {
        (SessionKind::LongBreak, config.long_break_minutes)
    } else {
        (SessionKind::ShortBreak, config.short_break_minutes)
    }
}

/// Alternate work and break sessions against one task until the user
/// stops or a work session is cancelled
pub fn run_cycle<T, IO>(
    task: &mut Task,
    config: &PomodoroConfig,
    ticker: &mut T,
    io: &mut IO,
) -> CycleReport
where
    T: Ticker + ?Sized,
    IO: SessionObserver + ContinuePrompt + ?Sized,
{
    let auto_started = task.status == TaskStatus::Todo && task.set_status(TaskStatus::InProgress);
    if auto_started {
        info!(task = task.id, "task auto-started for pomodoro");
    }

    let mut report = CycleReport {
        auto_started,
        reverted: false,
        work_sessions: 0,
        end: CycleEnd::Declined,
    };

    loop {
        let work = run_session(
            Session::new(SessionKind::Work, config.work_minutes),
            ticker,
            io,
        );

        if !work.completed_normally() {
            if auto_started && task.status == TaskStatus::InProgress {
                report.reverted = task.set_status(TaskStatus::Todo);
            }
            report.end = CycleEnd::Interrupted;
            break;
        }

        task.record_pomodoro();
        report.work_sessions += 1;
        info!(
            task = task.id,
            total = task.pomodoros_completed,
            "pomodoro completed"
        );

        // A cancelled break only skips the rest of the break
        let (kind, minutes) = break_after(report.work_sessions, config);
        run_session(Session::new(kind, minutes), ticker, io);

        match io.ask_continue(task, report.work_sessions) {
            Some(answer) if is_affirmative(&answer) => continue,
            Some(_) => {
                report.end = CycleEnd::Declined;
                break;
            }
            None => {
                report.end = CycleEnd::InputClosed;
                break;
            }
        }
    }

    info!(task = task.id, sessions = report.work_sessions, end = ?report.end, "pomodoro cycle ended");
    report
}
