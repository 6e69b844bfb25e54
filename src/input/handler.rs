use super::console::Console;
use crate::app::{AppState, NewTask};
use crate::domain::{select, SelectMode, Selection, SelectionError, SessionKind, Task, TaskId, TaskStatus};
use crate::notifications::{self, BELL};
use crate::persistence::LoadStatus;
use crate::pomodoro::{is_affirmative, ContinuePrompt, Cue, CycleEnd, Session, SessionObserver};
use crate::ticker::Ticker;
use crate::ui::{self, styles::timer_style};
use anyhow::Result;
use chrono::NaiveDate;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::warn;

/// How an interactive session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    Saved(PathBuf),
    Discarded,
    /// End of input at a prompt, nothing saved
    InputClosed,
    UserDeleted,
}

enum Flow {
    Continue,
    End(SessionEnd),
}

/// Reads a line or ends the session at end of input
macro_rules! ask {
    ($console:expr, $text:expr) => {
        match $console.prompt($text)? {
            Some(answer) => answer,
            None => return Ok(Flow::End(SessionEnd::InputClosed)),
        }
    };
}

/// Everything the menu needs besides the app itself
pub struct MenuContext<'t> {
    pub ticker: &'t mut dyn Ticker,
    pub today: NaiveDate,
    pub desktop_notifications: bool,
}

/// Ask for a user id until a non-empty one is given. None at end of input
pub fn ask_user_id<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<Option<String>> {
    loop {
        match console.prompt("Enter your User ID (letters/numbers recommended): ")? {
            None => return Ok(None),
            Some(id) if id.is_empty() => console.error("User ID cannot be empty.")?,
            Some(id) => return Ok(Some(id)),
        }
    }
}

/// Describe how the user's data was loaded
pub fn report_load<R: BufRead, W: Write>(app: &AppState, console: &mut Console<R, W>) -> Result<()> {
    let path = app.data_file();
    console.info(&format!(
        "--- Loaded data for user '{}' from {} ---",
        app.userid(),
        path.display()
    ))?;

    match &app.load_status {
        LoadStatus::Fresh => console.warning("No existing data file found for this user. Starting fresh.")?,
        LoadStatus::Loaded { migrated_status } => {
            console.success(&format!(
                "Loaded {} tasks. Current points: {}",
                app.user.tasks.len(),
                app.user.points
            ))?;
            if *migrated_status > 0 {
                console.info(&format!(
                    "Converted {} task(s) from the old completed flag.",
                    migrated_status
                ))?;
            }
        }
        LoadStatus::ConvertedList { .. } => {
            console.warning("Old tasks format detected. Converting and initializing points to 0.")?
        }
        LoadStatus::UnknownShape => console.warning("Unknown data format in file. Starting fresh.")?,
        LoadStatus::Unreadable(reason) => console.error(&format!(
            "Error loading data from {}: {}. Starting fresh.",
            path.display(),
            reason
        ))?,
    }
    Ok(())
}

/// Main menu loop. Returns once the user exits or input ends
pub fn run_menu<R: BufRead, W: Write>(
    app: &mut AppState,
    console: &mut Console<R, W>,
    ctx: &mut MenuContext<'_>,
) -> Result<SessionEnd> {
    loop {
        let header = ui::header_text(app.userid(), app.level(), app.user.points, app.next_level());
        ui::render_menu(console.out(), &header)?;

        let choice = match console.prompt("Enter your choice: ")? {
            Some(choice) => choice,
            None => return Ok(SessionEnd::InputClosed),
        };

        if let Flow::End(end) = handle_choice(app, console, ctx, &choice)? {
            return Ok(end);
        }
    }
}

/// Dispatch one menu choice
fn handle_choice<R: BufRead, W: Write>(
    app: &mut AppState,
    console: &mut Console<R, W>,
    ctx: &mut MenuContext<'_>,
    choice: &str,
) -> Result<Flow> {
    match choice {
        "1" => view_agenda(app, console, ctx.today),
        "2" => add_task(app, console),
        "3" => complete_tasks(app, console),
        "4" => change_status(app, console),
        "5" => start_pomodoro(app, console, ctx),
        "6" => delete_completed_task(app, console),
        "7" => delete_all_completed(app, console),
        "8" => delete_user_data(app, console),
        "9" => save_and_exit(app, console),
        "0" => {
            console.line("Exiting without saving changes.")?;
            Ok(Flow::End(SessionEnd::Discarded))
        }
        _ => {
            console.error("Invalid choice, please try again.")?;
            Ok(Flow::Continue)
        }
    }
}

fn view_agenda<R: BufRead, W: Write>(
    app: &AppState,
    console: &mut Console<R, W>,
    today: NaiveDate,
) -> Result<Flow> {
    ui::render_agenda(console.out(), &app.agenda(), &app.completed(), today)?;
    Ok(Flow::Continue)
}

fn add_task<R: BufRead, W: Write>(app: &mut AppState, console: &mut Console<R, W>) -> Result<Flow> {
    console.heading("--- Add New Task ---")?;
    let title = ask!(console, "Task Title: ");
    if title.is_empty() {
        console.error("Task title cannot be empty.")?;
        return Ok(Flow::Continue);
    }

    let new_task = NewTask {
        title,
        due_date: ask!(console, "Due Date (YYYY-MM-DD) or leave blank: "),
        due_time: ask!(console, "Due Time (HH:MM) or leave blank: "),
        project: ask!(console, "Project/Category (optional): "),
        priority: ask!(console, "Priority (1=High, 2=Med, 3=Low - optional): "),
    };

    match app.add_task(new_task) {
        Ok(added) => {
            for warning in &added.warnings {
                console.warning(&warning.to_string())?;
            }
            console.success("Task added successfully!")?;
        }
        Err(e) => console.error(&e.to_string())?,
    }
    Ok(Flow::Continue)
}

/// Result of asking the user to pick tasks
enum Picked {
    Ids(Vec<TaskId>),
    Nothing,
    Closed,
}

fn pick_tasks<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    tasks: &[&Task],
    heading: &str,
    mode: SelectMode,
) -> Result<Picked> {
    if tasks.is_empty() {
        console.warning("No tasks available for selection.")?;
        return Ok(Picked::Nothing);
    }

    ui::render_choices(console.out(), heading, tasks)?;
    let prompt = match mode {
        SelectMode::Single => "Enter number (or 'c' to cancel): ",
        SelectMode::Multiple => "Enter numbers (e.g., 0, 2) (or 'c' to cancel): ",
    };
    let Some(input) = console.prompt(prompt)? else {
        return Ok(Picked::Closed);
    };

    match select(tasks, &input, mode) {
        Ok(Selection::Chosen(chosen)) => Ok(Picked::Ids(chosen.iter().map(|t| t.id).collect())),
        Ok(Selection::Cancelled) => {
            console.line("Operation cancelled.")?;
            Ok(Picked::Nothing)
        }
        Err(e @ SelectionError::Invalid(_)) => {
            console.error(&e.to_string())?;
            Ok(Picked::Nothing)
        }
        Err(e) => {
            console.warning(&e.to_string())?;
            Ok(Picked::Nothing)
        }
    }
}

/// Pick exactly one task
macro_rules! pick_one {
    ($console:expr, $tasks:expr, $heading:expr) => {
        match pick_tasks($console, $tasks, $heading, SelectMode::Single)? {
            Picked::Ids(ids) => match ids.first() {
                Some(id) => *id,
                None => return Ok(Flow::Continue),
            },
            Picked::Nothing => return Ok(Flow::Continue),
            Picked::Closed => return Ok(Flow::End(SessionEnd::InputClosed)),
        }
    };
}

fn title_of(app: &AppState, id: TaskId) -> String {
    app.user.task(id).map(|t| t.title.clone()).unwrap_or_default()
}

fn complete_tasks<R: BufRead, W: Write>(app: &mut AppState, console: &mut Console<R, W>) -> Result<Flow> {
    console.heading("--- Mark Task(s) as Complete ---")?;
    let ids = match pick_tasks(
        console,
        &app.incomplete(),
        "Select task(s) to mark as complete:",
        SelectMode::Multiple,
    )? {
        Picked::Ids(ids) => ids,
        Picked::Nothing => return Ok(Flow::Continue),
        Picked::Closed => return Ok(Flow::End(SessionEnd::InputClosed)),
    };

    console.line("\nYou selected:")?;
    for id in &ids {
        console.line(&format!("- {}", title_of(app, *id)))?;
    }
    let answer = ask!(
        console,
        &format!("Mark these {} tasks as 'Completed'? (y/n): ", ids.len())
    );
    if !is_affirmative(&answer) {
        console.line("Completion cancelled.")?;
        return Ok(Flow::Continue);
    }

    let report = app.complete_tasks(&ids);
    if report.completed == 0 {
        console.warning("No tasks were newly marked as complete.")?;
        return Ok(Flow::Continue);
    }

    console.success(&format!("Set {} task(s) to 'Completed'.", report.completed))?;
    console.info(&format!("You earned {} points.", report.points_earned))?;
    console.line(&format!("Total points: {}", report.total_points))?;
    if let Some(level_up) = report.level_up {
        console.success("\n*** Level Up! ***")?;
        console.success(&format!("You are now Level {}!", level_up.to))?;
    }
    Ok(Flow::Continue)
}

fn change_status<R: BufRead, W: Write>(app: &mut AppState, console: &mut Console<R, W>) -> Result<Flow> {
    console.heading("--- Change Task Status ---")?;
    let id = pick_one!(console, &app.incomplete(), "Select task to change status:");

    let Some(task) = app.user.task(id) else {
        return Ok(Flow::Continue);
    };
    let next = match task.status {
        TaskStatus::Todo => TaskStatus::InProgress,
        TaskStatus::InProgress => TaskStatus::Todo,
        TaskStatus::Completed => {
            console.warning("Can only toggle Todo/In Progress here.")?;
            return Ok(Flow::Continue);
        }
    };
    let title = task.title.clone();
    let current = task.status;

    let answer = ask!(
        console,
        &format!(
            "Change status of '{}' from '{}' to '{}'? (y/n): ",
            title,
            current.label(),
            next.label()
        )
    );
    if !is_affirmative(&answer) {
        console.line("Status change cancelled.")?;
        return Ok(Flow::Continue);
    }

    match app.toggle_status(id) {
        Some(status) => console.success(&format!("Task '{}' status changed to '{}'.", title, status.label()))?,
        None => console.error("Failed to change task status.")?,
    }
    Ok(Flow::Continue)
}

fn delete_completed_task<R: BufRead, W: Write>(app: &mut AppState, console: &mut Console<R, W>) -> Result<Flow> {
    console.heading("--- Delete a Completed Task ---")?;
    let id = pick_one!(console, &app.completed(), "Select a completed task to delete:");
    let title = title_of(app, id);

    let answer = ask!(
        console,
        &format!("Are you sure you want to permanently delete '{}'? (y/n): ", title)
    );
    if !is_affirmative(&answer) {
        console.line("Deletion cancelled.")?;
        return Ok(Flow::Continue);
    }

    if app.delete_task(id) {
        console.success(&format!("Task '{}' deleted successfully.", title))?;
    } else {
        console.error("Could not delete the task.")?;
    }
    Ok(Flow::Continue)
}

fn delete_all_completed<R: BufRead, W: Write>(app: &mut AppState, console: &mut Console<R, W>) -> Result<Flow> {
    console.heading("--- Delete ALL Completed Tasks ---")?;
    let count = app.completed().len();
    if count == 0 {
        console.warning("No completed tasks found to delete.")?;
        return Ok(Flow::Continue);
    }

    console.warning(&format!(
        "Warning: You are about to delete {} completed task(s).",
        count
    ))?;
    let answer = ask!(
        console,
        "This action cannot be undone. Are you absolutely sure? (yes/no): "
    );
    if !answer.eq_ignore_ascii_case("yes") {
        console.line("Deletion cancelled.")?;
        return Ok(Flow::Continue);
    }

    let bulk = app.delete_all_completed();
    if bulk.deleted > 0 {
        console.success(&format!("Successfully deleted {} completed task(s).", bulk.deleted))?;
    } else {
        console.warning("No tasks were deleted.")?;
    }
    Ok(Flow::Continue)
}

/// Console rendering and the continue prompt for one Pomodoro cycle
struct PomodoroView<'c, R, W> {
    console: &'c mut Console<R, W>,
    task_title: String,
    desktop_notifications: bool,
    write_failed: bool,
}

impl<R: BufRead, W: Write> PomodoroView<'_, R, W> {
    fn new(console: &mut Console<R, W>, task_title: String, desktop_notifications: bool) -> PomodoroView<'_, R, W> {
        PomodoroView {
            console,
            task_title,
            desktop_notifications,
            write_failed: false,
        }
    }

    /// The observer cannot return errors, so the first failed write is logged
    fn check(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            if !self.write_failed {
                warn!(error = %e, "failed to write timer output");
                self.write_failed = true;
            }
        }
    }
}

impl<R: BufRead, W: Write> SessionObserver for PomodoroView<'_, R, W> {
    fn session_started(&mut self, session: &Session) {
        let intro = match session.kind() {
            SessionKind::Work => String::new(),
            SessionKind::ShortBreak => "\nTime for a short break!".to_string(),
            SessionKind::LongBreak => "\nTime for a long break!".to_string(),
        };
        let result = writeln!(
            self.console.out(),
            "{}\n{}",
            intro,
            timer_style().apply(format!(
                "Starting {} session ({} minutes). Press Ctrl+C, Esc or q to cancel.",
                session.kind().name(),
                session.minutes()
            ))
        );
        self.check(result);
    }

    fn tick(&mut self, session: &Session) {
        let display = format!("{}: {}", session.kind().name(), session.remaining_formatted());
        let out = self.console.out();
        let result = write!(out, "\r{}", timer_style().apply(format!("{:<25}", display)))
            .and_then(|()| out.flush());
        self.check(result);
    }

    fn cue(&mut self, session: &Session, cue: Cue) {
        let result = write!(self.console.out(), "\r{}\r", " ".repeat(30));
        self.check(result);
        let name = session.kind().name();
        match cue {
            Cue::Completed => {
                let result = self
                    .console
                    .success(&format!("{} session finished!", name))
                    .and_then(|()| write!(self.console.out(), "{}", BELL));
                self.check(result);
                if self.desktop_notifications {
                    notifications::notify_session_finished(session.kind(), &self.task_title);
                }
            }
            Cue::Cancelled => {
                let result = self.console.warning(&format!("{} session cancelled.", name));
                self.check(result);
            }
        }
    }
}

impl<R: BufRead, W: Write> ContinuePrompt for PomodoroView<'_, R, W> {
    fn ask_continue(&mut self, task: &Task, work_sessions: u32) -> Option<String> {
        let result = self.console.line(&format!(
            "Pomodoro #{} for '{}' completed! Total: {}",
            work_sessions, task.title, task.pomodoros_completed
        ));
        self.check(result);
        match self.console.prompt("\nStart next Pomodoro session for this task? (y/n): ") {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "failed to read answer, ending cycle");
                None
            }
        }
    }
}

fn start_pomodoro<R: BufRead, W: Write>(
    app: &mut AppState,
    console: &mut Console<R, W>,
    ctx: &mut MenuContext<'_>,
) -> Result<Flow> {
    console.heading("--- Start Pomodoro Session ---")?;
    let id = pick_one!(console, &app.incomplete(), "Select task to work on:");

    let Some(task) = app.user.task(id) else {
        return Ok(Flow::Continue);
    };
    let title = task.title.clone();
    let was_todo = task.status == TaskStatus::Todo;
    console.line(&format!("\nSelected Task: {}", title))?;
    if was_todo {
        console.info("Task status set to 'In Progress'.")?;
    }

    let mut view = PomodoroView::new(&mut *console, title, ctx.desktop_notifications);
    let Some(report) = app.run_pomodoro(id, &mut *ctx.ticker, &mut view) else {
        return Ok(Flow::Continue);
    };

    match report.end {
        CycleEnd::Interrupted => {
            console.warning("Pomodoro cycle interrupted.")?;
            if report.reverted {
                console.info("Task status reverted to 'Todo'.")?;
            }
        }
        CycleEnd::Declined => {}
        CycleEnd::InputClosed => return Ok(Flow::End(SessionEnd::InputClosed)),
    }
    Ok(Flow::Continue)
}

fn delete_user_data<R: BufRead, W: Write>(app: &mut AppState, console: &mut Console<R, W>) -> Result<Flow> {
    let userid = app.userid().to_string();
    console.heading("--- !!! DANGER ZONE: DELETE USER DATA !!! ---")?;
    console.warning(&format!(
        "This action will permanently delete all tasks, points, and level progress associated with the User ID '{}'.",
        userid
    ))?;
    console.warning("This operation cannot be undone.")?;

    let answer = ask!(console, "Are you absolutely sure you want to proceed? (yes/no): ");
    if !answer.eq_ignore_ascii_case("yes") {
        console.line("Deletion cancelled.")?;
        return Ok(Flow::Continue);
    }

    console.warning("\nFor final confirmation, please type your User ID exactly:")?;
    let typed = ask!(console, &format!("Type '{}' to confirm deletion: ", userid));
    if typed != userid {
        console.error("User ID mismatch. Deletion cancelled.")?;
        return Ok(Flow::Continue);
    }

    match app.delete_user_data() {
        Ok(removed) => {
            if removed {
                console.success(&format!("All data for user '{}' has been deleted.", userid))?;
            } else {
                console.warning("No data file found. Nothing to delete.")?;
            }
            console.line("Exiting application.")?;
            Ok(Flow::End(SessionEnd::UserDeleted))
        }
        Err(e) => {
            console.error(&format!("Deletion failed: {}", e))?;
            Ok(Flow::Continue)
        }
    }
}

fn save_and_exit<R: BufRead, W: Write>(app: &mut AppState, console: &mut Console<R, W>) -> Result<Flow> {
    match app.save() {
        Ok(path) => {
            console.success(&format!(
                "Saved {} tasks. Points: {}",
                app.user.tasks.len(),
                app.user.points
            ))?;
            console.line("Data saved. Exiting.")?;
            Ok(Flow::End(SessionEnd::Saved(path)))
        }
        Err(e) => {
            console.error(&format!("Error saving data: {}", e))?;
            Ok(Flow::Continue)
        }
    }
}
