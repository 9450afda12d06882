//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Breakers produce:
//!     → structured log events on transitions and rejections (logging.rs)
//!     → counters and a state gauge (metrics.rs)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint
//! ```

pub mod logging;
pub mod metrics;
