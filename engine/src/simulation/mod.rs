//! Deterministic Simulation Testing (DST) infrastructure.
//!
//! This module provides tools for testing the B-tree with:
//! - Reproducible random operation generation
//! - A `BTreeSet` oracle every operation is mirrored into
//! - Invariant checking after each operation
//!
//! Given the same seed and configuration, execution is identical.
//!
//! # Usage
//!
//! ```
//! use engine::simulation::{Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig::new(12345) // seed
//!     .with_degree(2)
//!     .with_key_space(100);
//!
//! let mut sim = Simulator::new(config).expect("valid degree");
//! let result = sim.run(1000); // Run 1000 operations
//!
//! assert!(result.invariant_violations.is_empty());
//! ```

mod invariants;
mod op_gen;
mod simulator;

pub use invariants::{InvariantChecker, SimulationViolation};
pub use op_gen::{Operation, OperationGenConfig, OperationGenerator};
pub use simulator::{SimulationResult, Simulator, SimulatorConfig, SimulatorStats};
