//! Structural invariant checks.
//!
//! The validator walks the whole tree and reports every broken invariant it
//! finds instead of stopping at the first. It is a diagnostic: nothing in
//! the tree calls it during normal operation, and it never mutates.
//!
//! # Invariants checked
//!
//! - Non-root nodes hold between `t-1` and `2t-1` keys; the root at most
//!   `2t-1`, and at least one if it is internal
//! - Keys within a node are strictly increasing
//! - Every key of `children[i]` lies strictly between `keys[i-1]` and `keys[i]`
//! - All leaves are at the same depth
//! - Internal nodes have `keys.len() + 1` children
//! - The leaf flag agrees with the presence of children
//! - The cached length equals the number of keys

use std::fmt;

use crate::storage::btree::node::{Node, NodeType, max_keys, min_keys};
use crate::storage::btree::tree::BTree;
use crate::storage::page::PageId;

/// Which invariant a violation breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    KeyCount,
    KeyOrder,
    KeyRange,
    LeafDepth,
    ChildCount,
    NodeType,
    Length,
}

/// A broken invariant found by [`BTree::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    pub kind: ViolationKind,
    /// Page of the offending node (the root page for tree-wide checks).
    pub page_id: PageId,
    pub description: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} violation at page {}: {}",
            self.kind, self.page_id, self.description
        )
    }
}

impl std::error::Error for InvariantViolation {}

impl<K: Ord + fmt::Debug, S> BTree<K, S> {
    /// Check every structural invariant.
    ///
    /// # Errors
    ///
    /// Returns all violations found, in depth-first order.
    pub fn validate(&self) -> Result<(), Vec<InvariantViolation>> {
        let mut checker = Checker {
            degree: self.degree(),
            leaf_depth: None,
            key_total: 0,
            violations: Vec::new(),
        };
        checker.check_node(self.root(), None, None, 0);

        if checker.key_total != self.len() {
            checker.report(
                ViolationKind::Length,
                self.root().page_id(),
                format!(
                    "tree reports {} keys but holds {}",
                    self.len(),
                    checker.key_total
                ),
            );
        }

        if checker.violations.is_empty() {
            Ok(())
        } else {
            Err(checker.violations)
        }
    }
}

/// Largest height a tree with `len` keys and minimum degree `degree` can
/// have: the largest `h` with `2t^h - 1 <= len`.
#[must_use]
pub const fn height_bound(len: usize, degree: usize) -> usize {
    let mut height = 0;
    // Fewest keys a tree of height `height + 1` can hold.
    let mut min_keys_above = max_keys(degree);
    while min_keys_above <= len {
        height += 1;
        min_keys_above = min_keys_above
            .saturating_mul(degree)
            .saturating_add(degree.saturating_sub(1));
        if min_keys_above == usize::MAX {
            break;
        }
    }
    height
}

struct Checker {
    degree: usize,
    leaf_depth: Option<usize>,
    key_total: usize,
    violations: Vec<InvariantViolation>,
}

impl Checker {
    fn report(&mut self, kind: ViolationKind, page_id: PageId, description: String) {
        self.violations.push(InvariantViolation {
            kind,
            page_id,
            description,
        });
    }

    fn check_node<K: Ord + fmt::Debug>(
        &mut self,
        node: &Node<K>,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
    ) {
        let page_id = node.page_id();
        let keys = node.keys();
        let children = node.children();
        self.key_total += keys.len();

        self.check_key_count(node, depth == 0);

        for pair in keys.windows(2) {
            if pair[0] >= pair[1] {
                self.report(
                    ViolationKind::KeyOrder,
                    page_id,
                    format!("key {:?} is not below {:?}", pair[0], pair[1]),
                );
            }
        }

        for key in keys {
            let above_lower = lower.is_none_or(|bound| key > bound);
            let below_upper = upper.is_none_or(|bound| key < bound);
            if !above_lower || !below_upper {
                self.report(
                    ViolationKind::KeyRange,
                    page_id,
                    format!("key {key:?} outside ({lower:?}, {upper:?})"),
                );
            }
        }

        match node.node_type() {
            NodeType::Leaf => {
                if !children.is_empty() {
                    self.report(
                        ViolationKind::NodeType,
                        page_id,
                        format!("leaf has {} children", children.len()),
                    );
                }
                match self.leaf_depth {
                    None => self.leaf_depth = Some(depth),
                    Some(expected) if expected != depth => self.report(
                        ViolationKind::LeafDepth,
                        page_id,
                        format!("leaf at depth {depth}, expected {expected}"),
                    ),
                    Some(_) => {}
                }
                return;
            }
            NodeType::Internal => {
                if children.is_empty() {
                    self.report(
                        ViolationKind::NodeType,
                        page_id,
                        "internal node has no children".to_string(),
                    );
                    return;
                }
            }
        }

        if children.len() != keys.len() + 1 {
            self.report(
                ViolationKind::ChildCount,
                page_id,
                format!("{} keys but {} children", keys.len(), children.len()),
            );
        }

        for (index, child) in children.iter().enumerate() {
            let child_lower = index.checked_sub(1).and_then(|i| keys.get(i)).or(lower);
            let child_upper = keys.get(index).or(upper);
            self.check_node(child, child_lower, child_upper, depth + 1);
        }
    }

    fn check_key_count<K>(&mut self, node: &Node<K>, is_root: bool) {
        let count = node.key_count();
        let max = max_keys(self.degree);
        let min = if is_root { 0 } else { min_keys(self.degree) };

        if count > max || count < min {
            self.report(
                ViolationKind::KeyCount,
                node.page_id(),
                format!("{count} keys, allowed {min}..={max}"),
            );
        } else if is_root && count == 0 && !node.is_leaf() {
            self.report(
                ViolationKind::KeyCount,
                node.page_id(),
                "internal root has no keys".to_string(),
            );
        }
    }
}
