use crate::ticker::{tick_duration, Tick, Ticker};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::thread;
use std::time::{Duration, Instant};
use tracing::warn;

/// Keys that stop a running session: Ctrl+C, Esc or q
pub fn is_interrupt(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

/// Raw mode for the lifetime of the guard
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> std::io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Waits out each tick while polling the keyboard for an interrupt key.
/// Raw mode is only held during the wait, so output between ticks prints normally
#[derive(Debug, Clone)]
pub struct KeyboardTicker {
    period: Duration,
}

impl KeyboardTicker {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

impl Default for KeyboardTicker {
    fn default() -> Self {
        Self::new(tick_duration())
    }
}

impl Ticker for KeyboardTicker {
    fn wait(&mut self) -> Tick {
        let deadline = Instant::now() + self.period;

        let _guard = match RawModeGuard::enable() {
            Ok(guard) => guard,
            Err(e) => {
                warn!(error = %e, "raw mode unavailable, timer cannot be interrupted");
                thread::sleep(self.period);
                return Tick::Elapsed;
            }
        };

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Tick::Elapsed;
            }

            match event::poll(remaining) {
                Ok(false) => return Tick::Elapsed,
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if is_interrupt(&key) => return Tick::Interrupted,
                    Ok(_) => continue,
                    Err(e) => {
                        warn!(error = %e, "failed to read terminal event");
                        thread::sleep(remaining);
                        return Tick::Elapsed;
                    }
                },
                Err(e) => {
                    warn!(error = %e, "failed to poll terminal events");
                    thread::sleep(remaining);
                    return Tick::Elapsed;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_keys() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let plain_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);

        assert!(is_interrupt(&ctrl_c));
        assert!(!is_interrupt(&plain_c));
        assert!(is_interrupt(&esc));
        assert!(is_interrupt(&q));
        assert!(!is_interrupt(&enter));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        esc.kind = KeyEventKind::Release;
        assert!(!is_interrupt(&esc));
    }
}
