//! Breaker states, errors and statistics snapshots.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Circuit breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    /// Calls pass through, outcomes are counted.
    Closed,
    /// Calls are rejected until the half-open timeout elapses.
    Open,
    /// Calls pass through as probes; the outcome decides Closed or Open.
    HalfOpen,
}

impl State {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Closed => "closed",
            State::Open => "open",
            State::HalfOpen => "half_open",
        }
    }

    /// Numeric value exported on the state gauge.
    pub fn as_gauge(&self) -> f64 {
        match self {
            State::Closed => 0.0,
            State::Open => 1.0,
            State::HalfOpen => 2.0,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by a guarded call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BreakerError<E> {
    /// The breaker rejected the call without invoking the operation.
    #[error("circuit breaker is open")]
    Open,

    /// The operation ran and failed; its error is carried unchanged.
    #[error("{0}")]
    Inner(E),
}

impl<E> BreakerError<E> {
    /// True when the call was rejected by the breaker.
    pub fn is_open(&self) -> bool {
        matches!(self, BreakerError::Open)
    }

    /// The operation's own error, if the operation ran.
    pub fn into_inner(self) -> Option<E> {
        match self {
            BreakerError::Open => None,
            BreakerError::Inner(e) => Some(e),
        }
    }
}

/// Point-in-time view of a breaker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakerStats {
    pub name: String,
    pub state: State,
    pub successes: u64,
    pub failures: u64,
    pub success_rate: f64,
    pub failure_rate: f64,
    /// Milliseconds since the counter window started.
    pub window_elapsed_ms: u64,
}
