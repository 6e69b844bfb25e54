use crate::domain::SessionKind;
use crate::ticker::{Tick, Ticker};
use tracing::debug;

/// Lifecycle of a single timed session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Finished,
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Running)
    }
}

/// Alert emitted exactly once when a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Completed,
    Cancelled,
}

/// A countdown of whole seconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    kind: SessionKind,
    minutes: u64,
    remaining_secs: u64,
    state: SessionState,
}

impl Session {
    pub fn new(kind: SessionKind, minutes: u64) -> Self {
        let mut session = Self {
            kind,
            minutes,
            remaining_secs: 0,
            state: SessionState::Running,
        };
        session.remaining_secs = session.total_secs();
        session
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn minutes(&self) -> u64 {
        self.minutes
    }

    pub fn total_secs(&self) -> u64 {
        self.minutes.saturating_mul(60)
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Remaining time as "MM:SS"
    pub fn remaining_formatted(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }

    /// One second passed. Reaching zero finishes the session
    pub fn advance(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = SessionState::Finished;
        }
    }

    /// Interrupt a running session. Returns true if it was running
    pub fn cancel(&mut self) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        self.state = SessionState::Cancelled;
        true
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub kind: SessionKind,
    pub state: SessionState,
}

impl SessionOutcome {
    pub fn completed_normally(&self) -> bool {
        self.state == SessionState::Finished
    }
}

/// Receives timer progress for rendering
pub trait SessionObserver {
    fn session_started(&mut self, _session: &Session) {}

    /// Called for every remaining value, down to and including 0
    fn tick(&mut self, session: &Session);

    fn cue(&mut self, session: &Session, cue: Cue);
}

/// Run a session to its end, waiting one tick between displayed values.
/// An interrupted tick cancels the session
pub fn run_session<T, O>(mut session: Session, ticker: &mut T, observer: &mut O) -> SessionOutcome
where
    T: Ticker + ?Sized,
    O: SessionObserver + ?Sized,
{
    debug!(kind = session.kind().name(), total_secs = session.total_secs(), "session started");
    observer.session_started(&session);

    if session.remaining_secs() == 0 {
        session.state = SessionState::Finished;
    }

    loop {
        observer.tick(&session);
        if session.state().is_terminal() {
            break;
        }
        match ticker.wait() {
            Tick::Elapsed => session.advance(),
            Tick::Interrupted => {
                session.cancel();
                break;
            }
        }
    }

    let cue = match session.state() {
        SessionState::Finished => Cue::Completed,
        _ => Cue::Cancelled,
    };
    observer.cue(&session, cue);
    debug!(kind = session.kind().name(), state = ?session.state(), "session ended");

    SessionOutcome {
        kind: session.kind(),
        state: session.state(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;

    /// Ticker that interrupts at scripted tick numbers and never sleeps
    #[derive(Debug, Default)]
    pub struct ScriptedTicker {
        pub interrupts: VecDeque<usize>,
        pub waits: usize,
    }

    impl ScriptedTicker {
        pub fn interrupting_at(ticks: &[usize]) -> Self {
            Self {
                interrupts: ticks.iter().copied().collect(),
                waits: 0,
            }
        }
    }

    impl Ticker for ScriptedTicker {
        fn wait(&mut self) -> Tick {
            self.waits += 1;
            if self.interrupts.front() == Some(&self.waits) {
                self.interrupts.pop_front();
                Tick::Interrupted
            } else {
                Tick::Elapsed
            }
        }
    }

    /// Observer that records everything it sees
    #[derive(Debug, Default)]
    pub struct RecordingObserver {
        pub started: Vec<SessionKind>,
        pub remaining: Vec<u64>,
        pub cues: Vec<(SessionKind, Cue)>,
    }

    impl SessionObserver for RecordingObserver {
        fn session_started(&mut self, session: &Session) {
            self.started.push(session.kind());
        }

        fn tick(&mut self, session: &Session) {
            self.remaining.push(session.remaining_secs());
        }

        fn cue(&mut self, session: &Session, cue: Cue) {
            self.cues.push((session.kind(), cue));
        }
    }
}
