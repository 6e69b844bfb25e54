pub mod cycle;
pub mod engine;

pub use cycle::{break_after, is_affirmative, run_cycle, ContinuePrompt, CycleEnd, CycleReport};
pub use engine::{run_session, Cue, Session, SessionObserver, SessionOutcome, SessionState};
