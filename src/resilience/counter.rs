//! Outcome counter for a single sampling window.

use std::time::{Duration, Instant};

/// Tally of successes and failures since `window_start`.
#[derive(Debug, Clone)]
pub struct Counter {
    successes: u64,
    failures: u64,
    window_start: Instant,
}

impl Counter {
    /// Create an empty counter whose window starts now.
    pub fn new() -> Self {
        Self {
            successes: 0,
            failures: 0,
            window_start: Instant::now(),
        }
    }

    /// Discard all history and restart the window.
    pub fn reset(&mut self) {
        self.successes = 0;
        self.failures = 0;
        self.window_start = Instant::now();
    }

    pub fn record_success(&mut self) {
        self.successes = self.successes.saturating_add(1);
    }

    pub fn record_failure(&mut self) {
        self.failures = self.failures.saturating_add(1);
    }

    pub fn successes(&self) -> u64 {
        self.successes
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Number of outcomes in the current window.
    pub fn total(&self) -> u64 {
        self.successes.saturating_add(self.failures)
    }

    /// Fraction of successful outcomes. `0.0` when the window is empty.
    pub fn success_rate(&self) -> f64 {
        self.rate(self.successes)
    }

    /// Fraction of failed outcomes. `0.0` when the window is empty.
    pub fn failure_rate(&self) -> f64 {
        self.rate(self.failures)
    }

    /// Time since the window started.
    pub fn elapsed(&self) -> Duration {
        self.window_start.elapsed()
    }

    fn rate(&self, count: u64) -> f64 {
        match self.total() {
            0 => 0.0,
            total => count as f64 / total as f64,
        }
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}
