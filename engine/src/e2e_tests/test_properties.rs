//! Property-based tests for the tree.
//!
//! Uses differential testing against `BTreeSet` as an oracle and validates
//! the whole tree after every single operation.

use std::collections::BTreeSet;

use proptest::prelude::*;

use crate::storage::btree::{BTree, height_bound};

/// Operations for random testing.
#[derive(Debug, Clone, Copy)]
enum Op {
    Insert(u16),
    Delete(u16),
}

// ============================================================================
//  Strategies
// ============================================================================

/// Keys from a small range so that duplicates and absent deletes are common.
fn key() -> impl Strategy<Value = u16> {
    0u16..256
}

fn degree() -> impl Strategy<Value = usize> {
    2usize..=6
}

/// Strategy for generating random insert/delete sequences.
fn operations(max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            3 => key().prop_map(Op::Insert),
            2 => key().prop_map(Op::Delete),
        ],
        0..=max_ops,
    )
}

/// Check structure, length and height of `tree` against `oracle`.
fn check_tree(tree: &BTree<u16>, oracle: &BTreeSet<u16>) -> Result<(), TestCaseError> {
    if let Err(violations) = tree.validate() {
        return Err(TestCaseError::fail(format!("invalid tree: {violations:?}")));
    }
    prop_assert_eq!(tree.len(), oracle.len());
    prop_assert!(
        tree.height() <= height_bound(tree.len(), tree.degree()),
        "height {} too large for {} keys",
        tree.height(),
        tree.len()
    );
    Ok(())
}

// ============================================================================
//  Differential Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every operation agrees with the oracle and leaves a valid tree.
    #[test]
    fn operations_match_oracle(t in degree(), ops in operations(400)) {
        let mut tree = BTree::new(t).unwrap();
        let mut oracle = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(k) => prop_assert_eq!(tree.insert(k), oracle.insert(k)),
                Op::Delete(k) => prop_assert_eq!(tree.delete(&k).is_some(), oracle.remove(&k)),
            }
            check_tree(&tree, &oracle)?;
        }

        let view: Vec<u16> = tree.iter().copied().collect();
        let expected: Vec<u16> = oracle.into_iter().collect();
        prop_assert_eq!(view, expected);
    }

    /// Inserting then searching finds the key; deleting then searching misses.
    #[test]
    fn insert_search_delete_round_trip(t in degree(), keys in prop::collection::vec(key(), 0..100), probe in key()) {
        let mut tree = BTree::new(t).unwrap();
        tree.extend(keys);

        tree.insert(probe);
        let hit = tree.search(&probe);
        prop_assert!(hit.is_some());
        prop_assert_eq!(hit.map(|hit| *hit.key()), Some(probe));

        prop_assert_eq!(tree.delete(&probe), Some(probe));
        prop_assert!(tree.search(&probe).is_none());
    }

    /// Deleting an absent key twice leaves the tree exactly as it was.
    #[test]
    fn delete_absent_is_noop(t in degree(), ops in operations(200), absent in 256u16..512) {
        let mut tree = BTree::new(t).unwrap();
        for op in ops {
            match op {
                Op::Insert(k) => { tree.insert(k); }
                Op::Delete(k) => { tree.delete(&k); }
            }
        }
        let before = tree.root().clone();

        prop_assert_eq!(tree.delete(&absent), None);
        prop_assert_eq!(tree.root(), &before);
        prop_assert_eq!(tree.delete(&absent), None);
        prop_assert_eq!(tree.root(), &before);
    }

    /// The ordered view is strictly increasing and restartable.
    #[test]
    fn iteration_is_sorted_and_restartable(t in degree(), keys in prop::collection::vec(any::<u16>(), 0..300)) {
        let mut tree = BTree::new(t).unwrap();
        tree.extend(keys);

        let first: Vec<u16> = tree.iter().copied().collect();
        prop_assert!(first.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(first.len(), tree.len());
        prop_assert_eq!(tree.iter().len(), tree.len());

        let second: Vec<u16> = tree.iter().copied().collect();
        prop_assert_eq!(first, second);
    }
}
