//! Per-dependency breaker registry.
//!
//! # Responsibilities
//! - Hand out one breaker per named dependency
//! - Build breakers lazily from a shared configuration
//! - Expose a snapshot of every breaker for inspection

use dashmap::DashMap;
use std::sync::Arc;

use crate::config::BreakerConfig;
use crate::resilience::circuit_breaker::CircuitBreaker;
use crate::resilience::shared::SharedCircuitBreaker;
use crate::resilience::types::BreakerStats;

/// Thread-safe map of dependency name to breaker.
#[derive(Debug, Clone, Default)]
pub struct BreakerRegistry {
    breakers: Arc<DashMap<String, SharedCircuitBreaker>>,
    config: BreakerConfig,
}

impl BreakerRegistry {
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            breakers: Arc::new(DashMap::new()),
            config,
        }
    }

    /// Get the breaker for `name`, creating it on first use.
    pub fn get_or_create(&self, name: &str) -> SharedCircuitBreaker {
        self.breakers
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(breaker = %name, "Registering circuit breaker");
                CircuitBreaker::from_config(&self.config).with_name(name).into()
            })
            .value()
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<SharedCircuitBreaker> {
        self.breakers.get(name).map(|r| r.value().clone())
    }

    /// Drop the breaker for `name`. Outstanding handles keep working.
    pub fn remove(&self, name: &str) -> Option<SharedCircuitBreaker> {
        self.breakers.remove(name).map(|(_, breaker)| breaker)
    }

    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }

    /// Stats of every registered breaker, sorted by name.
    pub fn snapshot(&self) -> Vec<BreakerStats> {
        // Collect handles first so no shard lock is held while taking breaker locks.
        let handles: Vec<SharedCircuitBreaker> =
            self.breakers.iter().map(|r| r.value().clone()).collect();

        let mut stats: Vec<BreakerStats> = handles.iter().map(|b| b.stats()).collect();
        stats.sort_by(|a, b| a.name.cmp(&b.name));
        stats
    }
}
