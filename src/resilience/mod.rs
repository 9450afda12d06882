//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to a dependency:
//!     → circuit_breaker.rs (evaluate state, reject fast while open)
//!     → operation runs once
//!     → counter.rs (record outcome in the current sampling window)
//!     → circuit_breaker.rs (re-evaluate state)
//! ```
//!
//! # Design Decisions
//! - Per-dependency circuit breaker (registry.rs), not global
//! - Fail fast in Open state
//! - No retries inside the breaker; retrying is the caller's call
//! - Operation errors pass through unchanged

pub mod circuit_breaker;
pub mod counter;
pub mod registry;
pub mod shared;
pub mod types;

pub use circuit_breaker::CircuitBreaker;
pub use counter::Counter;
pub use registry::BreakerRegistry;
pub use shared::{AsyncCircuitBreaker, SharedCircuitBreaker};
pub use types::{BreakerError, BreakerStats, State};
