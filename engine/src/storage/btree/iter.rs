//! In-order traversal over a B-tree.
//!
//! The iterator keeps an explicit stack of `(node, next key index)` frames,
//! one per level, so it needs O(height) memory and no recursion. Calling
//! [`BTree::iter`] again restarts from the smallest key.

use std::iter::FusedIterator;

use crate::storage::btree::node::Node;
use crate::storage::btree::tree::BTree;

/// Iterator over the keys of a [`BTree`] in ascending order.
#[derive(Debug)]
pub struct Iter<'a, K> {
    stack: Vec<(&'a Node<K>, usize)>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    fn new(root: &'a Node<K>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_leftmost(root);
        iter
    }

    /// Push `node` and every first child below it.
    fn push_leftmost(&mut self, mut node: &'a Node<K>) {
        loop {
            self.stack.push((node, 0));
            match node.children().first() {
                Some(first) => node = first,
                None => return,
            }
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let (node, index) = *frame;

            if let Some(key) = node.key(index) {
                frame.1 += 1;
                // Everything between this key and the next lives in the
                // child to its right.
                if let Some(child) = node.children().get(index + 1) {
                    self.push_leftmost(child);
                }
                self.remaining = self.remaining.saturating_sub(1);
                return Some(key);
            }

            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K, S> BTree<K, S> {
    /// Iterate over all keys in ascending order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self.root(), self.len())
    }
}

impl<'a, K, S> IntoIterator for &'a BTree<K, S> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
