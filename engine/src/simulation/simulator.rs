//! Main simulator harness for deterministic simulation testing.
//!
//! This module ties the operation generator and the invariant checker to a
//! live tree and a `BTreeSet` oracle.

use std::collections::BTreeSet;

use crate::storage::btree::{BTree, BTreeError};
use crate::storage::page::{CountingPageStore, PageStoreStats};

use super::invariants::{InvariantChecker, SimulationViolation};
use super::op_gen::{Operation, OperationGenConfig, OperationGenerator};

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Minimum degree of the tree under test.
    pub degree: usize,
    /// Operation generation configuration.
    pub operation_config: OperationGenConfig,
}

impl SimulatorConfig {
    /// Default minimum degree.
    pub const DEFAULT_DEGREE: usize = 3;

    /// Create a new simulator config with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            degree: Self::DEFAULT_DEGREE,
            operation_config: OperationGenConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    /// Set the operation configuration.
    #[must_use]
    pub const fn with_operation_config(mut self, config: OperationGenConfig) -> Self {
        self.operation_config = config;
        self
    }

    /// Keys are drawn from `0..key_space`.
    #[must_use]
    pub const fn with_key_space(mut self, key_space: u64) -> Self {
        self.operation_config.key_space = key_space;
        self
    }
}

/// Results from a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The seed used for this simulation.
    pub seed: u64,
    /// Operation counters.
    pub stats: SimulatorStats,
    /// Keys in the tree when the run finished.
    pub final_len: usize,
    /// Height of the tree when the run finished.
    pub final_height: usize,
    /// Page-store hook counts over the whole run.
    pub page_stats: PageStoreStats,
    /// Invariant violations detected.
    pub invariant_violations: Vec<SimulationViolation>,
}

impl SimulationResult {
    /// Check if the simulation passed (no invariant violations).
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.invariant_violations.is_empty()
    }
}

/// The main simulator harness.
///
/// Every generated operation is applied to both the tree and the oracle,
/// then the checker compares them. The tree reports to a
/// [`CountingPageStore`] so runs also record page traffic.
pub struct Simulator {
    config: SimulatorConfig,
    generator: OperationGenerator,
    tree: BTree<u64, CountingPageStore>,
    oracle: BTreeSet<u64>,
    checker: InvariantChecker,
    stats: SimulatorStats,
}

impl Simulator {
    /// Create a new simulator with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BTreeError::InvalidDegree`] if the configured degree is
    /// below 2.
    pub fn new(config: SimulatorConfig) -> Result<Self, BTreeError> {
        let tree = BTree::with_page_store(config.degree, CountingPageStore::new())?;
        let generator =
            OperationGenerator::with_config(config.seed, config.operation_config.clone());

        Ok(Self {
            config,
            generator,
            tree,
            oracle: BTreeSet::new(),
            checker: InvariantChecker::new(),
            stats: SimulatorStats::default(),
        })
    }

    /// Run the simulation for a given number of operations.
    ///
    /// Invariants are checked after each operation and the full ordered
    /// view is compared with the oracle at the end. Calling `run` again
    /// continues from the current tree.
    pub fn run(&mut self, operation_count: usize) -> SimulationResult {
        tracing::debug!(
            seed = self.config.seed,
            degree = self.config.degree,
            operation_count,
            "starting simulation"
        );

        for _ in 0..operation_count {
            let operation = self.generator.next_operation();
            let operation_index = self.stats.operations_processed;
            self.apply(operation, operation_index);
            self.checker
                .check_structure(&self.tree, &self.oracle, operation_index);
            self.stats.operations_processed += 1;
        }

        self.checker.check_ordered_view(
            &self.tree,
            &self.oracle,
            self.stats.operations_processed,
        );

        SimulationResult {
            seed: self.config.seed,
            stats: self.stats.clone(),
            final_len: self.tree.len(),
            final_height: self.tree.height(),
            page_stats: self.tree.page_store().stats(),
            invariant_violations: self.checker.violations().to_vec(),
        }
    }

    fn apply(&mut self, operation: Operation, operation_index: usize) {
        let (actual, expected) = match operation {
            Operation::Insert(key) => {
                let added = self.tree.insert(key);
                if added {
                    self.stats.inserts += 1;
                } else {
                    self.stats.duplicate_inserts += 1;
                }
                (added, self.oracle.insert(key))
            }
            Operation::Delete(key) => {
                let removed = self.tree.delete(&key);
                if removed.is_some() {
                    self.stats.deletes += 1;
                } else {
                    self.stats.absent_deletes += 1;
                }
                if removed.is_some_and(|removed| removed != key) {
                    self.checker.add_violation(SimulationViolation {
                        description: "Delete returned a different key".to_string(),
                        operation_index,
                        context: format!("asked for {key}, got {removed:?}"),
                    });
                }
                (removed.is_some(), self.oracle.remove(&key))
            }
            Operation::Search(key) => {
                let hit = self.tree.search(&key);
                if hit.is_some() {
                    self.stats.search_hits += 1;
                } else {
                    self.stats.search_misses += 1;
                }
                let found = hit.as_ref().map(|hit| *hit.key());
                if found.is_some_and(|found| found != key) {
                    self.checker.add_violation(SimulationViolation {
                        description: "Search returned a different key".to_string(),
                        operation_index,
                        context: format!("asked for {key}, got {found:?}"),
                    });
                }
                (hit.is_some(), self.oracle.contains(&key))
            }
        };

        self.checker
            .check_outcome(operation, actual, expected, operation_index);
    }

    /// The tree under test.
    #[must_use]
    pub const fn tree(&self) -> &BTree<u64, CountingPageStore> {
        &self.tree
    }

    /// The oracle the tree is checked against.
    #[must_use]
    pub const fn oracle(&self) -> &BTreeSet<u64> {
        &self.oracle
    }

    /// Get the invariant checker.
    #[must_use]
    pub const fn checker(&self) -> &InvariantChecker {
        &self.checker
    }

    /// Get statistics about the simulation.
    #[must_use]
    pub const fn stats(&self) -> &SimulatorStats {
        &self.stats
    }
}

/// Statistics about the simulation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulatorStats {
    /// Number of operations processed.
    pub operations_processed: usize,
    /// Inserts that added a key.
    pub inserts: u64,
    /// Inserts of a key already present.
    pub duplicate_inserts: u64,
    /// Deletes that removed a key.
    pub deletes: u64,
    /// Deletes of a key not present.
    pub absent_deletes: u64,
    pub search_hits: u64,
    pub search_misses: u64,
}
