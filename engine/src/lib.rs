// Life of an insert:
// 1. Search for the key; a duplicate stops here with nothing changed
// 2. If the root is full, split it under a fresh root (height + 1)
// 3. Walk down, splitting every full child before entering it
// 4. Place the key in the leaf where the walk ends
//
// Life of a delete:
// 1. Search for the key; an absent key stops here with nothing changed
// 2. Walk down, topping up every child to at least t keys before entering
//    it (borrow from a sibling, or merge with one)
// 3. Remove the key where the walk ends, refilling internal slots from the
//    predecessor or successor subtree
// 4. If the root lost its last key, its only child becomes the root
//
// System components:
//  - B-tree core (storage::btree)
//  - Page-store hooks (storage::page)
//  - Deterministic simulation against a BTreeSet oracle (simulation)

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod simulation;
pub mod storage;


pub use storage::btree::BTree;
