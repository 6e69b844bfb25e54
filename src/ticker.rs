use std::thread;
use std::time::Duration;

/// Default tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// What happened during one tick wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Elapsed,
    Interrupted,
}

/// Blocking wait between timer ticks. An interrupt must end the wait early
pub trait Ticker {
    fn wait(&mut self) -> Tick;
}

/// Sleeps for the period, never interrupted
#[derive(Debug, Clone)]
pub struct SleepTicker {
    period: Duration,
}

impl SleepTicker {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

impl Default for SleepTicker {
    fn default() -> Self {
        Self::new(tick_duration())
    }
}

impl Ticker for SleepTicker {
    fn wait(&mut self) -> Tick {
        thread::sleep(self.period);
        Tick::Elapsed
    }
}
