//! Configuration validation.
//!
//! # Design Decisions
//! - Breaker construction never fails, so findings are warnings, not errors
//! - Returns all findings, not just the first
//! - Pure function: `&Config → Vec<ValidationWarning>`

use thiserror::Error;

use crate::config::schema::{BreakerConfig, Config, SimulationConfig};

/// A suspicious but accepted configuration value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationWarning {
    #[error("{field} = {value} is outside [0, 1]")]
    ThresholdOutOfRange { field: &'static str, value: f64 },

    #[error("{field} is zero")]
    ZeroDuration { field: &'static str },

    #[error("simulation outage window {start}..{end} is empty")]
    EmptyOutage { start: u32, end: u32 },
}

/// Collect every warning for a full configuration.
pub fn validate_config(config: &Config) -> Vec<ValidationWarning> {
    let mut warnings = validate_breaker(&config.breaker);
    warnings.extend(validate_simulation(&config.simulation));
    warnings
}

pub fn validate_breaker(config: &BreakerConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (field, value) in [
        ("failure_rate_threshold", config.failure_rate_threshold),
        ("success_rate_threshold", config.success_rate_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            warnings.push(ValidationWarning::ThresholdOutOfRange { field, value });
        }
    }

    if config.sampling_period_ms == 0 {
        warnings.push(ValidationWarning::ZeroDuration { field: "sampling_period_ms" });
    }
    if config.half_open_timeout_ms == 0 {
        warnings.push(ValidationWarning::ZeroDuration { field: "half_open_timeout_ms" });
    }

    warnings
}

fn validate_simulation(config: &SimulationConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    if !(0.0..=1.0).contains(&config.failure_probability) {
        warnings.push(ValidationWarning::ThresholdOutOfRange {
            field: "failure_probability",
            value: config.failure_probability,
        });
    }
    if config.outage_start >= config.outage_end {
        warnings.push(ValidationWarning::EmptyOutage {
            start: config.outage_start,
            end: config.outage_end,
        });
    }
    warnings
}
