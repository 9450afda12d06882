//! Shared utilities for integration and load testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use circuit_breaker::{BreakerError, CircuitBreaker};

/// Error produced by the simulated dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamError(pub &'static str);

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "upstream error: {}", self.0)
    }
}

impl std::error::Error for UpstreamError {}

#[allow(dead_code)]
pub type CallResult<T> = Result<T, BreakerError<UpstreamError>>;

/// Breaker with a short half-open timeout and a sampling period long enough
/// not to interfere with a test.
#[allow(dead_code)]
pub fn fast_breaker(half_open_ms: u64) -> CircuitBreaker {
    CircuitBreaker::new(
        Duration::from_secs(60),
        Duration::from_millis(half_open_ms),
        0.3,
        0.8,
    )
}

/// Counts how many times a simulated dependency was actually invoked.
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct Invocations(Arc<AtomicU32>);

#[allow(dead_code)]
impl Invocations {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}
