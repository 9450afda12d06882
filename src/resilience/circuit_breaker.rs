//! Circuit breaker state machine.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: dependency assumed down, calls fail fast
//! - Half-Open: calls pass through as probes
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure rate > failure_rate_threshold
//! Open → Half-Open: half_open_timeout elapsed since the breaker opened
//! Half-Open → Closed: success rate > success_rate_threshold
//! Half-Open → Open: failure rate > failure_rate_threshold
//! ```
//!
//! State is evaluated before every call and after every recorded outcome.
//! Every transition resets the counter, so rates never span two states.
//! Outcomes recorded after `sampling_period` has passed since the window
//! started land in a fresh window.
//!
//! A `CircuitBreaker` is single-owner. Share one between threads or tasks
//! through [`SharedCircuitBreaker`](super::SharedCircuitBreaker) or
//! [`AsyncCircuitBreaker`](super::AsyncCircuitBreaker).

use std::future::Future;
use std::time::Duration;

use crate::config::BreakerConfig;
use crate::observability::metrics;
use crate::resilience::counter::Counter;
use crate::resilience::types::{BreakerError, BreakerStats, State};

const DEFAULT_NAME: &str = "default";

/// Gate around a fallible operation.
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    name: String,
    state: State,
    counter: Counter,
    sampling_period: Duration,
    half_open_timeout: Duration,
    failure_rate_threshold: f64,
    success_rate_threshold: f64,
}

impl CircuitBreaker {
    /// Create a closed breaker.
    ///
    /// Thresholds are not validated; values outside `[0, 1]` are used as given.
    pub fn new(
        sampling_period: Duration,
        half_open_timeout: Duration,
        failure_rate_threshold: f64,
        success_rate_threshold: f64,
    ) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            state: State::Closed,
            counter: Counter::new(),
            sampling_period,
            half_open_timeout,
            failure_rate_threshold,
            success_rate_threshold,
        }
    }

    pub fn from_config(config: &BreakerConfig) -> Self {
        Self::new(
            config.sampling_period(),
            config.half_open_timeout(),
            config.failure_rate_threshold,
            config.success_rate_threshold,
        )
    }

    /// Set the name used in logs and metric labels.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state, as of the last evaluation.
    pub fn state(&self) -> State {
        self.state
    }

    pub fn config(&self) -> BreakerConfig {
        BreakerConfig {
            sampling_period_ms: self.sampling_period.as_millis() as u64,
            half_open_timeout_ms: self.half_open_timeout.as_millis() as u64,
            failure_rate_threshold: self.failure_rate_threshold,
            success_rate_threshold: self.success_rate_threshold,
        }
    }

    pub fn stats(&self) -> BreakerStats {
        BreakerStats {
            name: self.name.clone(),
            state: self.state,
            successes: self.counter.successes(),
            failures: self.counter.failures(),
            success_rate: self.counter.success_rate(),
            failure_rate: self.counter.failure_rate(),
            window_elapsed_ms: self.counter.elapsed().as_millis() as u64,
        }
    }

    /// Run `operation` through the breaker.
    ///
    /// Returns [`BreakerError::Open`] without invoking `operation` while the
    /// breaker is open. Otherwise the operation runs exactly once and its
    /// value or error is returned unchanged.
    pub fn run<T, E, F>(&mut self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if !self.admit() {
            return Err(BreakerError::Open);
        }

        let result = operation();
        self.record(result.is_ok());
        result.map_err(BreakerError::Inner)
    }

    /// Async counterpart of [`run`](Self::run).
    ///
    /// No timeout is applied to the future; if it never completes, neither
    /// does this call.
    pub async fn run_async<T, E, F, Fut>(&mut self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.admit() {
            return Err(BreakerError::Open);
        }

        let result = operation().await;
        self.record(result.is_ok());
        result.map_err(BreakerError::Inner)
    }

    /// Evaluate state and report whether a call may proceed.
    fn admit(&mut self) -> bool {
        self.evaluate();
        if self.state == State::Open {
            tracing::debug!(breaker = %self.name, "Call rejected, circuit open");
            metrics::record_rejected(&self.name);
            return false;
        }
        true
    }

    fn record(&mut self, success: bool) {
        if self.counter.elapsed() > self.sampling_period {
            tracing::trace!(
                breaker = %self.name,
                successes = self.counter.successes(),
                failures = self.counter.failures(),
                "Sampling period elapsed, discarding stale outcomes"
            );
            self.counter.reset();
        }

        if success {
            self.counter.record_success();
        } else {
            self.counter.record_failure();
        }
        metrics::record_outcome(&self.name, success);

        self.evaluate();
    }

    fn evaluate(&mut self) {
        match self.state {
            State::Open => {
                if self.counter.elapsed() > self.half_open_timeout {
                    self.transition(State::HalfOpen);
                }
            }
            State::Closed => {
                if self.counter.failure_rate() > self.failure_rate_threshold {
                    self.transition(State::Open);
                }
            }
            State::HalfOpen => {
                // Both checks always run; the failure check sees the counter
                // as left by the success check and wins if both fire.
                if self.counter.success_rate() > self.success_rate_threshold {
                    self.transition(State::Closed);
                }
                if self.counter.failure_rate() > self.failure_rate_threshold {
                    self.transition(State::Open);
                }
            }
        }
    }

    fn transition(&mut self, to: State) {
        let from = self.state;
        let successes = self.counter.successes();
        let failures = self.counter.failures();

        self.state = to;
        self.counter.reset();

        if to == State::Open {
            tracing::warn!(breaker = %self.name, %from, %to, successes, failures, "Circuit opened");
        } else {
            tracing::info!(breaker = %self.name, %from, %to, successes, failures, "Circuit state changed");
        }
        metrics::record_transition(&self.name, from, to);
    }
}

impl Default for CircuitBreaker {
    /// Breaker with the settings of [`BreakerConfig::default`].
    fn default() -> Self {
        Self::from_config(&BreakerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::thread::sleep;

    const LONG: Duration = Duration::from_secs(60);

    fn fail(breaker: &mut CircuitBreaker) -> Result<(), BreakerError<&'static str>> {
        breaker.run(|| Err("boom"))
    }

    fn succeed(breaker: &mut CircuitBreaker) -> Result<(), BreakerError<&'static str>> {
        breaker.run(|| Ok(()))
    }

    #[test]
    fn test_default_settings() {
        let breaker = CircuitBreaker::default();
        assert_eq!(breaker.state(), State::Closed);
        assert_eq!(breaker.name(), "default");
        assert_eq!(breaker.config(), BreakerConfig::default());
    }

    #[test]
    fn test_closed_passes_through() {
        let mut breaker = CircuitBreaker::default();
        let calls = Cell::new(0);

        let result: Result<i32, BreakerError<&str>> = breaker.run(|| {
            calls.set(calls.get() + 1);
            Ok(1)
        });

        assert_eq!(result, Ok(1));
        assert_eq!(calls.get(), 1);
        assert_eq!(breaker.state(), State::Closed);
        assert_eq!(breaker.stats().successes, 1);
    }

    #[test]
    fn test_stays_closed_below_threshold() {
        let mut breaker = CircuitBreaker::new(LONG, LONG, 0.5, 0.8);
        succeed(&mut breaker).unwrap();
        assert_eq!(fail(&mut breaker), Err(BreakerError::Inner("boom")));

        // 1 of 2 is not above 0.5
        assert_eq!(breaker.state(), State::Closed);
    }

    #[test]
    fn test_trip_and_reject() {
        let mut breaker = CircuitBreaker::new(LONG, LONG, 0.3, 0.8);
        assert_eq!(fail(&mut breaker), Err(BreakerError::Inner("boom")));
        assert_eq!(breaker.state(), State::Open);

        let invoked = Cell::new(false);
        let result: Result<(), BreakerError<&str>> = breaker.run(|| {
            invoked.set(true);
            Ok(())
        });
        assert!(result.unwrap_err().is_open());
        assert!(!invoked.get());

        // The transition reset the counter and rejections are not counted.
        let stats = breaker.stats();
        assert_eq!(stats.successes + stats.failures, 0);
    }

    #[test]
    fn test_half_open_after_timeout() {
        let mut breaker = CircuitBreaker::new(LONG, Duration::from_millis(20), 0.3, 0.8);
        fail(&mut breaker).unwrap_err();
        assert!(succeed(&mut breaker).unwrap_err().is_open());

        sleep(Duration::from_millis(40));

        let invoked = Cell::new(false);
        let result: Result<u8, BreakerError<&str>> = breaker.run(|| {
            invoked.set(true);
            Ok(7)
        });
        assert_eq!(result, Ok(7));
        assert!(invoked.get());
        // One success out of one is above 0.8.
        assert_eq!(breaker.state(), State::Closed);
    }

    #[test]
    fn test_half_open_failure_reopens() {
        let mut breaker = CircuitBreaker::new(LONG, Duration::from_millis(20), 0.3, 0.8);
        fail(&mut breaker).unwrap_err();
        sleep(Duration::from_millis(40));

        assert_eq!(fail(&mut breaker), Err(BreakerError::Inner("boom")));
        assert_eq!(breaker.state(), State::Open);
        assert!(succeed(&mut breaker).unwrap_err().is_open());
    }

    #[test]
    fn test_half_open_holds_when_no_threshold_crossed() {
        // A success rate can never exceed 1.0, so the breaker cannot close.
        let mut breaker = CircuitBreaker::new(LONG, Duration::from_millis(20), 0.6, 1.0);
        fail(&mut breaker).unwrap_err();
        sleep(Duration::from_millis(40));

        succeed(&mut breaker).unwrap();
        assert_eq!(breaker.state(), State::HalfOpen);
        fail(&mut breaker).unwrap_err();
        // 1 failure of 2 is not above 0.6.
        assert_eq!(breaker.state(), State::HalfOpen);
        assert_eq!(breaker.stats().failures, 1);
    }

    #[test]
    fn test_half_open_failure_check_wins() {
        // A negative failure threshold fires even on an empty counter.
        let mut breaker = CircuitBreaker::new(LONG, Duration::from_millis(20), -0.1, 0.5);

        // The gate evaluation trips the fresh breaker before the first call.
        assert!(succeed(&mut breaker).unwrap_err().is_open());
        sleep(Duration::from_millis(40));

        // Open → HalfOpen, the probe succeeds, HalfOpen → Closed,
        // then the failure check on the reset counter reopens.
        succeed(&mut breaker).unwrap();
        assert_eq!(breaker.state(), State::Open);
    }

    #[test]
    fn test_sampling_period_discards_stale_outcomes() {
        let mut breaker = CircuitBreaker::new(Duration::from_millis(30), LONG, 0.5, 0.8);
        succeed(&mut breaker).unwrap();
        fail(&mut breaker).unwrap_err();
        assert_eq!(breaker.stats().failures, 1);

        sleep(Duration::from_millis(50));

        succeed(&mut breaker).unwrap();
        let stats = breaker.stats();
        assert_eq!(stats.successes, 1);
        assert_eq!(stats.failures, 0);
        assert_eq!(breaker.state(), State::Closed);
    }

    #[test]
    fn test_stats_snapshot() {
        let mut breaker = CircuitBreaker::new(LONG, LONG, 0.9, 0.8).with_name("payments");
        succeed(&mut breaker).unwrap();
        succeed(&mut breaker).unwrap();
        succeed(&mut breaker).unwrap();
        fail(&mut breaker).unwrap_err();

        let stats = breaker.stats();
        assert_eq!(stats.name, "payments");
        assert_eq!(stats.state, State::Closed);
        assert_eq!(stats.success_rate, 0.75);
        assert_eq!(stats.failure_rate, 0.25);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["state"], "closed");
        assert_eq!(json["failures"], 1);
    }

    #[tokio::test]
    async fn test_run_async() {
        let mut breaker = CircuitBreaker::default();

        let ok: Result<&str, BreakerError<String>> =
            breaker.run_async(|| async { Ok::<_, String>("pong") }).await;
        assert_eq!(ok, Ok("pong"));

        let err: Result<(), BreakerError<String>> = breaker
            .run_async(|| async { Err::<(), _>("timeout".to_string()) })
            .await;
        assert_eq!(err, Err(BreakerError::Inner("timeout".to_string())));
        assert_eq!(breaker.state(), State::Open);

        let invoked = Cell::new(false);
        let rejected: Result<(), BreakerError<String>> = breaker
            .run_async(|| {
                invoked.set(true);
                async { Ok::<(), String>(()) }
            })
            .await;
        assert_eq!(rejected, Err(BreakerError::Open));
        assert!(!invoked.get());
    }
}
