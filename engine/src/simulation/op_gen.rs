//! Operation generator for deterministic simulation testing.
//!
//! This module generates random but reproducible sequences of tree
//! operations. Keys come from a small bounded key space so that duplicate
//! inserts, deletes of absent keys and search misses all happen regularly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for operation generation.
#[derive(Debug, Clone)]
pub struct OperationGenConfig {
    /// Probability of generating an insert (0.0 - 1.0).
    pub insert_rate: f64,
    /// Probability of generating a delete (0.0 - 1.0). Whatever is left
    /// after inserts and deletes becomes searches.
    pub delete_rate: f64,
    /// Keys are drawn uniformly from `0..key_space`.
    pub key_space: u64,
}

impl Default for OperationGenConfig {
    fn default() -> Self {
        Self {
            insert_rate: 0.5,
            delete_rate: 0.3,
            key_space: 1000,
        }
    }
}

/// A single tree operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert(u64),
    Delete(u64),
    Search(u64),
}

impl Operation {
    /// The key this operation targets.
    #[must_use]
    pub const fn key(self) -> u64 {
        match self {
            Self::Insert(key) | Self::Delete(key) | Self::Search(key) => key,
        }
    }
}

/// Generator for random [`Operation`]s.
///
/// This generator produces deterministic sequences of operations
/// given the same seed, enabling reproducible testing.
pub struct OperationGenerator {
    rng: StdRng,
    config: OperationGenConfig,
}

impl OperationGenerator {
    /// Create a new operation generator with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, OperationGenConfig::default())
    }

    /// Create a new operation generator with custom configuration.
    #[must_use]
    pub fn with_config(seed: u64, config: OperationGenConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &OperationGenConfig {
        &self.config
    }

    /// Generate the next operation.
    pub fn next_operation(&mut self) -> Operation {
        let key = self.random_key();
        let roll = self.rng.random::<f64>();

        if roll < self.config.insert_rate {
            Operation::Insert(key)
        } else if roll < self.config.insert_rate + self.config.delete_rate {
            Operation::Delete(key)
        } else {
            Operation::Search(key)
        }
    }

    fn random_key(&mut self) -> u64 {
        // An empty key space still needs one key to draw from.
        self.rng.random_range(0..self.config.key_space.max(1))
    }
}

impl Iterator for OperationGenerator {
    type Item = Operation;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_operation())
    }
}
