//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, logged as warnings)
//!     → Config (immutable)
//!     → BreakerConfig handed to each breaker at construction
//! ```
//!
//! # Design Decisions
//! - Breaker settings are fixed once a breaker is built
//! - All fields have defaults to allow minimal configs

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{BreakerConfig, Config, ObservabilityConfig, SimulationConfig};
