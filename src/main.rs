//! Circuit breaker simulator.
//!
//! Drives a breaker against a simulated dependency that fails at a base rate
//! and fails every call during an outage window, then prints the final stats.
//!
//! ```text
//! call index:  0 ........ outage_start ........ outage_end ........ calls
//! dependency:  mostly ok  |  always failing     |  mostly ok
//! breaker:     closed     →  open ⇄ half-open   →  closed
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use circuit_breaker::config::{load_config, Config};
use circuit_breaker::observability::{logging, metrics};
use circuit_breaker::{AsyncCircuitBreaker, BreakerError, CircuitBreaker};

#[derive(Parser)]
#[command(name = "circuit-breaker")]
#[command(about = "Simulate a circuit breaker in front of a flaky dependency", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of calls.
    #[arg(long)]
    calls: Option<u32>,

    /// Override the base failure probability.
    #[arg(long)]
    failure_probability: Option<f64>,

    /// Seed for the simulated failures.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Error)]
#[error("dependency {dependency} failed on call {call}")]
struct DependencyError {
    dependency: String,
    call: u32,
}

#[derive(Debug, Default)]
struct Tally {
    succeeded: u32,
    failed: u32,
    rejected: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if let Some(calls) = cli.calls {
        config.simulation.calls = calls;
    }
    if let Some(p) = cli.failure_probability {
        config.simulation.failure_probability = p;
    }

    logging::init_logging(&config.observability)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut rng = match cli.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let sim = config.simulation.clone();
    tracing::info!(
        dependency = %sim.dependency,
        calls = sim.calls,
        outage_start = sim.outage_start,
        outage_end = sim.outage_end,
        failure_probability = sim.failure_probability,
        "Simulation starting"
    );

    let breaker = AsyncCircuitBreaker::new(
        CircuitBreaker::from_config(&config.breaker).with_name(sim.dependency.clone()),
    );
    let mut tally = Tally::default();

    for call in 0..sim.calls {
        let in_outage = (sim.outage_start..sim.outage_end).contains(&call);
        let dependency = sim.dependency.clone();
        let latency = Duration::from_millis(sim.latency_ms);
        let fails = in_outage || rng.f64() < sim.failure_probability;

        let result = breaker
            .run(|| async move {
                tokio::time::sleep(latency).await;
                if fails {
                    Err(DependencyError { dependency, call })
                } else {
                    Ok(call)
                }
            })
            .await;

        match result {
            Ok(_) => tally.succeeded += 1,
            Err(BreakerError::Open) => tally.rejected += 1,
            Err(BreakerError::Inner(e)) => {
                tracing::debug!(error = %e, "Call failed");
                tally.failed += 1;
            }
        }

        tokio::time::sleep(Duration::from_millis(sim.interval_ms)).await;
    }

    tracing::info!(
        succeeded = tally.succeeded,
        failed = tally.failed,
        rejected = tally.rejected,
        "Simulation complete"
    );
    println!("{}", serde_json::to_string_pretty(&breaker.stats().await)?);

    Ok(())
}
