/// Session alerts: a terminal bell plus a desktop notification.
/// Desktop notifications are only implemented on macOS

#[cfg(target_os = "macos")]
use std::process::Command;

use crate::domain::SessionKind;

/// ASCII BEL, rings the terminal bell
pub const BELL: &str = "\x07";

/// Notification text for a finished session
pub fn finished_message(kind: SessionKind, task_title: &str) -> String {
    match kind {
        SessionKind::Work => format!("Pomodoro finished: {}", task_title),
        _ => format!("{} over, back to: {}", kind.name(), task_title),
    }
}

/// Send a desktop notification when a session runs to zero
pub fn notify_session_finished(kind: SessionKind, task_title: &str) {
    let message = finished_message(kind, task_title);

    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "Agenda - {}""#,
            message.replace('"', "\\\""),
            kind.name()
        );

        let _ = Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output();
    }

    #[cfg(not(target_os = "macos"))]
    {
        tracing::debug!(%message, "desktop notifications unsupported on this platform");
    }
}
