//! Test search positions after deletions rearranged the tree.

use crate::testing::{assert_valid, internal, leaf, shape_of, tree_from_keys};

const BUILD_ORDER: [u32; 23] = [
    16, 3, 7, 13, 1, 2, 4, 5, 6, 10, 11, 12, 14, 15, 20, 23, 17, 18, 19, 21, 22, 24, 26,
];

#[test]
fn test_search_neighbors_after_deletes() {
    let mut tree = tree_from_keys(3, &BUILD_ORDER);
    assert_eq!(tree.delete(&5), Some(5));
    assert_eq!(tree.delete(&16), Some(16));
    assert_valid(&tree, "after deletes");

    assert_eq!(
        shape_of(&tree),
        internal(
            &[12],
            vec![
                internal(&[3, 7], vec![leaf(&[1, 2]), leaf(&[4, 6]), leaf(&[10, 11])]),
                internal(
                    &[18, 21],
                    vec![
                        leaf(&[13, 14, 15, 17]),
                        leaf(&[19, 20]),
                        leaf(&[22, 23, 24, 26]),
                    ],
                ),
            ],
        )
    );

    let hit = tree.search(&7).expect("7 present");
    assert_eq!(*hit.key(), 7);
    assert_eq!(hit.prev_key(), Some(&3));
    assert!(!hit.node().is_leaf());

    let hit = tree.search(&4).expect("4 present");
    assert_eq!(hit.index(), 0);
    assert_eq!(hit.prev_key(), None);
    assert_eq!(hit.next_key(), Some(&6));
    assert!(hit.node().is_leaf());
}

#[test]
fn test_search_round_trip() {
    let mut tree = tree_from_keys(3, &BUILD_ORDER);

    for key in BUILD_ORDER {
        let hit = tree.search(&key).expect("inserted key present");
        assert_eq!(hit.node().keys()[hit.index()], key);
    }

    for key in BUILD_ORDER {
        tree.delete(&key);
        assert!(tree.search(&key).is_none(), "{key} still found");
    }
}

#[test]
fn test_search_misses() {
    let tree = tree_from_keys(3, &BUILD_ORDER);

    for key in [0, 8, 9, 25, 27, 100] {
        assert!(tree.search(&key).is_none(), "{key} unexpectedly found");
        assert!(!tree.contains(&key));
    }
}
