//! B-tree node record and the structural primitives that keep it in bounds.
//!
//! A node holds up to `2t-1` ordered keys. Internal nodes also own their
//! `keys.len() + 1` children by value, so the whole tree is a strict
//! ownership tree: no parent pointers, no sharing, no cycles.
//!
//! The primitives here (split, merge, borrow) only rearrange keys and
//! children between a parent and its direct children. Deciding *when* to
//! call them is the tree's job.

use crate::storage::page::PageId;

/// Node type discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Internal,
    Leaf,
}

/// A B-tree node.
///
/// # Invariants
///
/// - `keys` is strictly increasing
/// - `node_type == Leaf` iff `children` is empty
/// - for internal nodes, `children.len() == keys.len() + 1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<K> {
    pub(super) page_id: PageId,
    pub(super) node_type: NodeType,
    pub(super) keys: Vec<K>,
    pub(super) children: Vec<Self>,
}

impl<K> Node<K> {
    /// Create a new empty leaf.
    #[must_use]
    pub(crate) const fn new_leaf(page_id: PageId) -> Self {
        Self {
            page_id,
            node_type: NodeType::Leaf,
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an internal node with no keys whose only child is `child`.
    ///
    /// Only valid as a transient root while the old root is being split.
    #[must_use]
    pub(crate) fn with_only_child(page_id: PageId, child: Self) -> Self {
        Self {
            page_id,
            node_type: NodeType::Internal,
            keys: Vec::new(),
            children: vec![child],
        }
    }

    /// Assemble a node from raw parts without checking any invariant.
    #[cfg(test)]
    pub(crate) fn from_parts(page_id: PageId, keys: Vec<K>, children: Vec<Self>) -> Self {
        let node_type = if children.is_empty() {
            NodeType::Leaf
        } else {
            NodeType::Internal
        };
        Self {
            page_id,
            node_type,
            keys,
            children,
        }
    }

    /// Page this node was allocated on.
    #[must_use]
    pub const fn page_id(&self) -> PageId {
        self.page_id
    }

    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        self.node_type
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.node_type, NodeType::Leaf)
    }

    /// Keys in ascending order.
    #[must_use]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Children in key order. Empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len() is not const-stable
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn key(&self, index: usize) -> Option<&K> {
        self.keys.get(index)
    }

    /// Check if the node holds the maximum `2t-1` keys.
    #[must_use]
    pub(crate) fn is_full(&self, degree: usize) -> bool {
        self.keys.len() >= max_keys(degree)
    }

    /// Check if the node can give up a key and still hold `t-1`.
    #[must_use]
    pub(crate) fn can_lend(&self, degree: usize) -> bool {
        self.keys.len() >= degree
    }

    /// Split the full child at `index`.
    ///
    /// The child keeps its lower `t-1` keys (and `t` children), a new sibling
    /// on page `sibling_page` takes the upper `t-1` keys (and `t` children),
    /// and the median moves up into this node at `index`.
    ///
    /// # Pre-conditions
    /// - this node is internal
    /// - `children[index]` holds exactly `2t-1` keys
    ///
    /// # Post-conditions
    /// - `children[index]` and `children[index + 1]` hold `t-1` keys each
    /// - this node gained one key and one child
    pub(crate) fn split_child(&mut self, index: usize, degree: usize, sibling_page: PageId) {
        let child = &mut self.children[index];
        debug_assert_eq!(child.keys.len(), max_keys(degree), "split of non-full child");

        let mut upper_keys = child.keys.split_off(degree - 1);
        let median = upper_keys.remove(0);
        let upper_children = if child.is_leaf() {
            Vec::new()
        } else {
            child.children.split_off(degree)
        };

        let sibling = Self {
            page_id: sibling_page,
            node_type: child.node_type,
            keys: upper_keys,
            children: upper_children,
        };

        self.keys.insert(index, median);
        self.children.insert(index + 1, sibling);
    }

    /// Merge `children[index + 1]` and the separator `keys[index]` into
    /// `children[index]`.
    ///
    /// The separator lands at offset `t-1` of the merged node when both
    /// children hold `t-1` keys, giving exactly `2t-1` ordered keys.
    ///
    /// Returns the page id of the absorbed right child.
    pub(crate) fn merge_children(&mut self, index: usize) -> PageId {
        let Self {
            page_id: absorbed_page,
            keys: right_keys,
            children: right_children,
            ..
        } = self.children.remove(index + 1);
        let separator = self.keys.remove(index);

        let left = &mut self.children[index];
        left.keys.push(separator);
        left.keys.extend(right_keys);
        left.children.extend(right_children);

        absorbed_page
    }

    /// Rotate one key from `children[index - 1]` through the parent into
    /// `children[index]`.
    ///
    /// The separator moves down to the front of `children[index]`, the left
    /// sibling's maximum moves up to replace it, and the left sibling's last
    /// child (if any) becomes the first child of `children[index]`.
    pub(crate) fn borrow_from_left(&mut self, index: usize) {
        let (before, after) = self.children.split_at_mut(index);
        let left = &mut before[index - 1];
        let child = &mut after[0];

        // Callers check `can_lend` first.
        let Some(up) = left.keys.pop() else {
            return;
        };
        let down = std::mem::replace(&mut self.keys[index - 1], up);
        child.keys.insert(0, down);

        if let Some(moved) = left.children.pop() {
            child.children.insert(0, moved);
        }
    }

    /// Rotate one key from `children[index + 1]` through the parent into
    /// `children[index]`. Mirror image of [`Self::borrow_from_left`].
    pub(crate) fn borrow_from_right(&mut self, index: usize) {
        let (before, after) = self.children.split_at_mut(index + 1);
        let child = &mut before[index];
        let right = &mut after[0];

        if right.keys.is_empty() {
            return;
        }
        let up = right.keys.remove(0);
        let down = std::mem::replace(&mut self.keys[index], up);
        child.keys.push(down);

        if !right.is_leaf() {
            child.children.push(right.children.remove(0));
        }
    }
}

impl<K: Ord> Node<K> {
    /// Locate `key` in this node.
    ///
    /// Returns `Ok(i)` if `keys[i] == key`, otherwise `Err(i)` where `i` is
    /// the smallest index with `keys[i] > key` (the child to descend into).
    pub fn find_index(&self, key: &K) -> Result<usize, usize> {
        self.keys.binary_search(key)
    }
}

/// Maximum number of keys a node may hold for minimum degree `t`.
///
/// Saturates at `usize::MAX` for degrees a tree would reject.
#[must_use]
pub const fn max_keys(degree: usize) -> usize {
    degree.saturating_mul(2).saturating_sub(1)
}

/// Minimum number of keys a non-root node must hold for minimum degree `t`.
#[must_use]
pub const fn min_keys(degree: usize) -> usize {
    degree.saturating_sub(1)
}
