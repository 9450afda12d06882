//! Metrics collection and exposition.
//!
//! # Metrics
//! - `circuit_breaker_calls_total` (counter): admitted calls by breaker, outcome
//! - `circuit_breaker_rejected_total` (counter): calls rejected while open
//! - `circuit_breaker_transitions_total` (counter): state changes by from, to
//! - `circuit_breaker_state` (gauge): 0=closed, 1=open, 2=half-open
//!
//! Updates are no-ops until a recorder is installed.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::resilience::State;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_outcome(breaker: &str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(
        "circuit_breaker_calls_total",
        "breaker" => breaker.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_rejected(breaker: &str) {
    counter!("circuit_breaker_rejected_total", "breaker" => breaker.to_string()).increment(1);
}

pub fn record_transition(breaker: &str, from: State, to: State) {
    counter!(
        "circuit_breaker_transitions_total",
        "breaker" => breaker.to_string(),
        "from" => from.as_str(),
        "to" => to.as_str()
    )
    .increment(1);
    record_state(breaker, to);
}

pub fn record_state(breaker: &str, state: State) {
    gauge!("circuit_breaker_state", "breaker" => breaker.to_string()).set(state.as_gauge());
}
