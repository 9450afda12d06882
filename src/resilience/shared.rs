//! Thread-safe and task-safe breaker handles.
//!
//! Both handles hold their lock for the whole evaluate → invoke → record →
//! evaluate sequence, so concurrent calls through one breaker are serialized
//! and every outcome is counted against the state it was admitted under.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::resilience::circuit_breaker::CircuitBreaker;
use crate::resilience::types::{BreakerError, BreakerStats, State};

/// Cloneable handle for use across threads.
#[derive(Debug, Clone)]
pub struct SharedCircuitBreaker {
    inner: Arc<Mutex<CircuitBreaker>>,
}

impl SharedCircuitBreaker {
    pub fn new(breaker: CircuitBreaker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(breaker)),
        }
    }

    /// See [`CircuitBreaker::run`].
    pub fn run<T, E, F>(&self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.lock().run(operation)
    }

    pub fn state(&self) -> State {
        self.lock().state()
    }

    pub fn stats(&self) -> BreakerStats {
        self.lock().stats()
    }

    pub fn name(&self) -> String {
        self.lock().name().to_string()
    }

    // A panicking operation poisons the mutex before its outcome is recorded,
    // which leaves the breaker itself consistent.
    fn lock(&self) -> MutexGuard<'_, CircuitBreaker> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<CircuitBreaker> for SharedCircuitBreaker {
    fn from(breaker: CircuitBreaker) -> Self {
        Self::new(breaker)
    }
}

/// Cloneable handle for use across Tokio tasks.
#[derive(Debug, Clone)]
pub struct AsyncCircuitBreaker {
    inner: Arc<tokio::sync::Mutex<CircuitBreaker>>,
}

impl AsyncCircuitBreaker {
    pub fn new(breaker: CircuitBreaker) -> Self {
        Self {
            inner: Arc::new(tokio::sync::Mutex::new(breaker)),
        }
    }

    /// See [`CircuitBreaker::run_async`].
    pub async fn run<T, E, F, Fut>(&self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut breaker = self.inner.lock().await;
        breaker.run_async(operation).await
    }

    pub async fn state(&self) -> State {
        self.inner.lock().await.state()
    }

    pub async fn stats(&self) -> BreakerStats {
        self.inner.lock().await.stats()
    }
}

impl From<CircuitBreaker> for AsyncCircuitBreaker {
    fn from(breaker: CircuitBreaker) -> Self {
        Self::new(breaker)
    }
}
