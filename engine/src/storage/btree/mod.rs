//! In-memory B-tree set of ordered keys.
//!
//! # Structure
//!
//! The B-tree consists of:
//! - Internal nodes: store keys and own their children by value
//! - Leaf nodes: store keys only
//!
//! Every node but the root holds between `t-1` and `2t-1` keys for the
//! minimum degree `t` chosen at construction, and all leaves sit at the same
//! depth.
//!
//! # Usage
//!
//! ```
//! use engine::storage::btree::BTree;
//!
//! let mut tree = BTree::new(2).expect("valid degree");
//! tree.extend([5, 9, 3, 7, 1]);
//!
//! assert!(tree.contains(&7));
//! assert_eq!(tree.delete(&9), Some(9));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5, 7]);
//! assert!(tree.validate().is_ok());
//! ```

mod iter;
mod node;
mod tree;
mod validate;

pub use iter::Iter;
pub use node::{Node, NodeType, max_keys, min_keys};
pub use tree::{BTree, BTreeError, MAX_DEGREE, MIN_DEGREE, SearchHit};
pub use validate::{InvariantViolation, ViolationKind, height_bound};
