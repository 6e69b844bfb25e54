//! Terminal task agenda with a Pomodoro timer and points-based levels.
//!
//! Tasks belong to a user and live in one JSON file per user. Completing
//! tasks earns points, points map to levels, and a Pomodoro cycle can be
//! run against any open task.

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod notifications;
pub mod persistence;
pub mod pomodoro;
pub mod ticker;
pub mod ui;
