//! Test boundary conditions of the public tree API.

use crate::storage::btree::{BTree, BTreeError, height_bound};
use crate::testing::{assert_valid, keys_of, tree_from_keys};

#[test]
fn test_degree_below_two_rejected() {
    for degree in [0, 1] {
        assert_eq!(
            BTree::<u32>::new(degree).err(),
            Some(BTreeError::InvalidDegree(degree))
        );
    }
}

#[test]
fn test_empty_tree_operations() {
    let mut tree = BTree::<u32>::new(2).expect("create tree");

    assert!(tree.search(&1).is_none());
    assert_eq!(tree.delete(&1), None);
    assert_eq!(tree.first(), None);
    assert_eq!(tree.last(), None);
    assert_eq!(tree.iter().next(), None);
    assert_eq!(tree.height(), 0);
    assert_valid(&tree, "empty tree");
}

#[test]
fn test_single_key_lifecycle() {
    let mut tree = BTree::new(2).expect("create tree");

    assert!(tree.insert(42u32));
    assert!(!tree.insert(42));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.delete(&42), Some(42));
    assert_eq!(tree.delete(&42), None);
    assert!(tree.is_empty());
    assert_valid(&tree, "after single key");
}

#[test]
fn test_duplicates_leave_tree_untouched() {
    let mut tree = tree_from_keys(2, &(0..50).collect::<Vec<u32>>());
    let before = tree.root().clone();

    for key in 0..50 {
        assert!(!tree.insert(key));
    }

    assert_eq!(tree.root(), &before);
    assert_eq!(tree.len(), 50);
}

#[test]
fn test_large_degree_stays_shallow() {
    let mut tree = BTree::new(50).expect("create tree");
    tree.extend(0..1000u32);

    assert_valid(&tree, "after inserts");
    assert_eq!(tree.height(), 1);
    assert!(tree.height() <= height_bound(tree.len(), 50));
}

#[test]
fn test_reinsert_after_delete() {
    let mut tree = tree_from_keys(3, &(0..100).collect::<Vec<u32>>());

    for key in (0..100).step_by(2) {
        assert_eq!(tree.delete(&key), Some(key));
    }
    for key in (0..100).step_by(2) {
        assert!(tree.insert(key));
    }

    assert_valid(&tree, "after reinsert");
    assert_eq!(keys_of(&tree), (0..100).collect::<Vec<_>>());
}

#[test]
fn test_owned_keys_are_returned_by_delete() {
    let words = [
        "pear", "apple", "fig", "kiwi", "plum", "date", "lime", "quince", "grape", "mango",
    ];
    let mut tree = BTree::new(2).expect("create tree");
    tree.extend(words.iter().map(ToString::to_string));

    // "kiwi" sits in an internal node, so its slot is refilled from a leaf.
    let removed = tree.delete(&"kiwi".to_string());
    assert_eq!(removed.as_deref(), Some("kiwi"));

    let mut expected: Vec<String> = words
        .iter()
        .filter(|word| **word != "kiwi")
        .map(ToString::to_string)
        .collect();
    expected.sort();
    assert_eq!(keys_of(&tree), expected);
    assert_valid(&tree, "string keys");
}

#[test]
fn test_clear_then_reuse() {
    let mut tree = tree_from_keys(2, &(0..64).collect::<Vec<u32>>());

    tree.clear();
    assert!(tree.is_empty());
    assert_valid(&tree, "after clear");

    tree.extend([3, 1, 2]);
    assert_eq!(keys_of(&tree), vec![1, 2, 3]);
}
