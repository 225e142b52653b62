//! Invariant checking for deterministic simulation testing.
//!
//! The tree is checked against a `BTreeSet` oracle after every operation:
//! return values must agree with the oracle, the structure must validate,
//! and the height must respect the minimum-degree bound.

use std::collections::BTreeSet;

use crate::storage::btree::{BTree, height_bound};

use super::op_gen::Operation;

/// An invariant violation detected during simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationViolation {
    /// Description of the violation.
    pub description: String,
    /// Operation index where it was detected.
    pub operation_index: usize,
    /// Additional context.
    pub context: String,
}

/// Checker for tree invariants.
#[derive(Debug, Default)]
pub struct InvariantChecker {
    violations: Vec<SimulationViolation>,
}

impl InvariantChecker {
    /// Create a new invariant checker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Get all violations.
    #[must_use]
    pub fn violations(&self) -> &[SimulationViolation] {
        &self.violations
    }

    /// Check if any violations were detected.
    #[must_use]
    pub const fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn clear(&mut self) {
        self.violations.clear();
    }

    pub fn add_violation(&mut self, violation: SimulationViolation) {
        tracing::warn!(
            operation_index = violation.operation_index,
            context = %violation.context,
            "{}",
            violation.description
        );
        self.violations.push(violation);
    }

    /// Check that an operation reported the same outcome as the oracle.
    ///
    /// For inserts the outcome is "key was added", for deletes "key was
    /// removed" and for searches "key was found".
    pub fn check_outcome(
        &mut self,
        operation: Operation,
        actual: bool,
        expected: bool,
        operation_index: usize,
    ) {
        if actual != expected {
            self.add_violation(SimulationViolation {
                description: "Operation outcome disagrees with oracle".to_string(),
                operation_index,
                context: format!("{operation:?}: tree said {actual}, oracle said {expected}"),
            });
        }
    }

    /// Check the tree's structure, length and height.
    pub fn check_structure<S>(
        &mut self,
        tree: &BTree<u64, S>,
        oracle: &BTreeSet<u64>,
        operation_index: usize,
    ) {
        if let Err(violations) = tree.validate() {
            for violation in violations {
                self.add_violation(SimulationViolation {
                    description: "Tree failed validation".to_string(),
                    operation_index,
                    context: violation.to_string(),
                });
            }
        }

        if tree.len() != oracle.len() {
            self.add_violation(SimulationViolation {
                description: "Tree length disagrees with oracle".to_string(),
                operation_index,
                context: format!("tree {}, oracle {}", tree.len(), oracle.len()),
            });
        }

        let bound = height_bound(tree.len(), tree.degree());
        if tree.height() > bound {
            self.add_violation(SimulationViolation {
                description: "Tree height exceeds bound".to_string(),
                operation_index,
                context: format!(
                    "height {} with {} keys at degree {}, bound {bound}",
                    tree.height(),
                    tree.len(),
                    tree.degree()
                ),
            });
        }
    }

    /// Check that an in-order walk of the tree yields exactly the oracle.
    pub fn check_ordered_view<S>(
        &mut self,
        tree: &BTree<u64, S>,
        oracle: &BTreeSet<u64>,
        operation_index: usize,
    ) {
        let mismatch = tree
            .iter()
            .zip(oracle.iter())
            .position(|(actual, expected)| actual != expected);

        if let Some(position) = mismatch {
            self.add_violation(SimulationViolation {
                description: "Ordered view disagrees with oracle".to_string(),
                operation_index,
                context: format!("first difference at position {position}"),
            });
        } else if tree.iter().count() != oracle.len() {
            self.add_violation(SimulationViolation {
                description: "Ordered view has wrong length".to_string(),
                operation_index,
                context: format!(
                    "view yields {}, oracle holds {}",
                    tree.iter().count(),
                    oracle.len()
                ),
            });
        }
    }
}
