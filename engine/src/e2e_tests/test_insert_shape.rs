//! Test the exact shapes insertion produces.

use crate::testing::{assert_valid, internal, keys_of, leaf, shape_of, tree_from_keys};

#[test]
fn test_insert_ten_keys_degree_two() {
    let tree = tree_from_keys(2, &[5, 9, 3, 7, 1, 2, 8, 6, 0, 4]);

    assert_valid(&tree, "after inserts");
    assert_eq!(
        shape_of(&tree),
        internal(
            &[5],
            vec![
                internal(&[2], vec![leaf(&[0, 1]), leaf(&[3, 4])]),
                internal(&[8], vec![leaf(&[6, 7]), leaf(&[9])]),
            ],
        )
    );
    assert_eq!(tree.height(), 2);
    assert_eq!(keys_of(&tree), (0..10).collect::<Vec<_>>());
}

#[test]
fn test_root_stays_leaf_until_full() {
    let mut tree = tree_from_keys(3, &[3, 1, 5, 2, 4]);
    assert_eq!(shape_of(&tree), leaf(&[1, 2, 3, 4, 5]));
    assert_eq!(tree.height(), 0);

    // The sixth key finds a full root and splits it around the median.
    tree.insert(6);

    assert_valid(&tree, "after root split");
    assert_eq!(
        shape_of(&tree),
        internal(&[3], vec![leaf(&[1, 2]), leaf(&[4, 5, 6])])
    );
}

#[test]
fn test_ascending_inserts_degree_two() {
    let mut tree = tree_from_keys::<u32>(2, &[]);

    for key in 1..=10 {
        tree.insert(key);
        assert_valid(&tree, &format!("after inserting {key}"));
    }

    assert_eq!(
        shape_of(&tree),
        internal(
            &[4],
            vec![
                internal(&[2], vec![leaf(&[1]), leaf(&[3])]),
                internal(&[6, 8], vec![leaf(&[5]), leaf(&[7]), leaf(&[9, 10])]),
            ],
        )
    );
}

#[test]
fn test_height_grows_only_at_root() {
    let mut tree = tree_from_keys::<u32>(2, &[]);
    let mut last_height = 0;

    for key in 0..300 {
        tree.insert(key * 7 % 307);
        let height = tree.height();
        assert!(height == last_height || height == last_height + 1);
        if height > last_height {
            // A fresh root holds exactly the promoted median.
            assert_eq!(tree.root().key_count(), 1);
        }
        last_height = height;
    }
    assert_valid(&tree, "after 300 inserts");
}
