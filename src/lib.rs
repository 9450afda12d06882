//! Circuit breaker library.

pub mod config;
pub mod observability;
pub mod resilience;

pub use config::{BreakerConfig, Config};
pub use resilience::{
    AsyncCircuitBreaker, BreakerError, BreakerRegistry, BreakerStats, CircuitBreaker,
    SharedCircuitBreaker, State,
};
