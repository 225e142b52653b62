//! Workload configuration module.
//!
//! This module provides configuration loading for the engine's workload
//! driver from environment variables.
//!
//! # Environment Variables
//!
//! - `ENGINE_DEGREE`: Minimum degree of the tree (default: `3`)
//! - `ENGINE_OPERATIONS`: Number of operations to run (default: `10000`)
//! - `ENGINE_KEY_SPACE`: Keys are drawn from `0..key_space` (default: `1000`)
//! - `ENGINE_SEED`: Random seed (default: `42`)
//!
//! # Invariants
//!
//! - `key_space` is never zero
//! - `degree` is not checked here; the tree rejects degrees below 2 itself

use crate::simulation::SimulatorConfig;

/// Workload configuration.
///
/// # Post-conditions
///
/// When constructed via `from_env()`, every unset variable takes its
/// default and every set variable parsed cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadConfig {
    /// Minimum degree `t` of the tree under test.
    pub degree: usize,
    /// Number of operations to run.
    pub operations: usize,
    /// Size of the key space operations draw from.
    pub key_space: u64,
    /// Seed for the operation generator.
    pub seed: u64,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            degree: Self::DEFAULT_DEGREE,
            operations: Self::DEFAULT_OPERATIONS,
            key_space: Self::DEFAULT_KEY_SPACE,
            seed: Self::DEFAULT_SEED,
        }
    }
}

impl WorkloadConfig {
    pub const DEFAULT_DEGREE: usize = 3;
    pub const DEFAULT_OPERATIONS: usize = 10_000;
    pub const DEFAULT_KEY_SPACE: u64 = 1000;
    pub const DEFAULT_SEED: u64 = 42;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but does not parse as an
    /// unsigned integer, or if `ENGINE_KEY_SPACE` is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup` instead of the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let degree = load_number(lookup, "ENGINE_DEGREE", Self::DEFAULT_DEGREE)?;
        let operations = load_number(lookup, "ENGINE_OPERATIONS", Self::DEFAULT_OPERATIONS)?;
        let key_space = load_number(lookup, "ENGINE_KEY_SPACE", Self::DEFAULT_KEY_SPACE)?;
        let seed = load_number(lookup, "ENGINE_SEED", Self::DEFAULT_SEED)?;

        if key_space == 0 {
            return Err(ConfigError::InvalidValue {
                name: "ENGINE_KEY_SPACE".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            degree,
            operations,
            key_space,
            seed,
        })
    }

    /// Simulator configuration for this workload.
    #[must_use]
    pub fn simulator_config(&self) -> SimulatorConfig {
        SimulatorConfig::new(self.seed)
            .with_degree(self.degree)
            .with_key_space(self.key_space)
    }
}

/// Load an unsigned number, falling back to `default` if unset.
///
/// # Errors
///
/// Returns an error if the value is set but not a valid number.
fn load_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{value}' is not a valid unsigned integer"),
        }),
        None => Ok(default),
    }
}
