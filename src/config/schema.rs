//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    /// Breaker thresholds and durations.
    pub breaker: BreakerConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Simulated dependency driven by the binary.
    pub simulation: SimulationConfig,
}

/// Circuit breaker thresholds and durations.
///
/// Thresholds are fractions in `[0, 1]`. Values outside that range are
/// accepted as given; keeping them meaningful is up to the caller.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Counter is discarded when this much time has passed since the window start.
    pub sampling_period_ms: u64,

    /// Time an open breaker waits before letting a probe through.
    pub half_open_timeout_ms: u64,

    /// Failure rate above which Closed and HalfOpen trip to Open.
    pub failure_rate_threshold: f64,

    /// Success rate above which HalfOpen closes.
    pub success_rate_threshold: f64,
}

impl BreakerConfig {
    pub fn sampling_period(&self) -> Duration {
        Duration::from_millis(self.sampling_period_ms)
    }

    pub fn half_open_timeout(&self) -> Duration {
        Duration::from_millis(self.half_open_timeout_ms)
    }
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            sampling_period_ms: 1000,
            half_open_timeout_ms: 500,
            failure_rate_threshold: 0.3,
            success_rate_threshold: 0.8,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Simulated dependency settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Name used for the breaker in logs and metrics.
    pub dependency: String,

    /// Number of calls to issue.
    pub calls: u32,

    /// Pause between calls in milliseconds.
    pub interval_ms: u64,

    /// Latency of each simulated call in milliseconds.
    pub latency_ms: u64,

    /// Failure probability outside the outage window.
    pub failure_probability: f64,

    /// First call index (inclusive) of the outage window.
    pub outage_start: u32,

    /// Last call index (exclusive) of the outage window.
    pub outage_end: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dependency: "upstream".to_string(),
            calls: 200,
            interval_ms: 20,
            latency_ms: 5,
            failure_probability: 0.05,
            outage_start: 50,
            outage_end: 100,
        }
    }
}
