//! In-memory B-tree of configurable minimum degree.
//!
//! Insertion splits full nodes on the way down, so a key can always be
//! placed in a leaf without backtracking. Deletion repairs under-full
//! children on the way down (borrow from a sibling or merge with one), so a
//! key can always be removed from the node where the descent ends.
//!
//! Height only changes at the root: it grows when a full root is split and
//! shrinks when a merge leaves an internal root without keys.
//!
//! Every node read is reported to the tree's [`PageStore`] through `fetch`,
//! every node write through `flush`, and every discarded node through
//! `release`.

use std::mem;

use crate::storage::btree::node::Node;
use crate::storage::page::{FIRST_PAGE_ID, NoopPageStore, PageId, PageStore};

/// Smallest minimum degree a tree can be built with.
pub const MIN_DEGREE: usize = 2;

/// Largest minimum degree a tree can be built with. A full node holds
/// `2t - 1` keys and `2t` children, both of which must fit in a `usize`.
pub const MAX_DEGREE: usize = usize::MAX / 2;

/// A B-tree set of ordered keys.
///
/// Keys are unique: inserting a key that is already present is ignored and
/// leaves the tree untouched.
#[derive(Debug)]
pub struct BTree<K, S = NoopPageStore> {
    degree: usize,
    root: Node<K>,
    len: usize,
    next_page_id: PageId,
    store: S,
}

impl<K: Ord> BTree<K> {
    /// Create an empty tree with minimum degree `degree`.
    ///
    /// # Errors
    ///
    /// Returns [`BTreeError::InvalidDegree`] if `degree` is outside
    /// [`MIN_DEGREE`]`..=`[`MAX_DEGREE`].
    pub fn new(degree: usize) -> Result<Self, BTreeError> {
        Self::with_page_store(degree, NoopPageStore)
    }
}

impl<K: Ord, S: PageStore<K>> BTree<K, S> {
    /// Create an empty tree that reports node reads and writes to `store`.
    ///
    /// # Errors
    ///
    /// Returns [`BTreeError::InvalidDegree`] if `degree` is outside
    /// [`MIN_DEGREE`]`..=`[`MAX_DEGREE`]. Nothing is allocated or flushed in
    /// that case.
    pub fn with_page_store(degree: usize, store: S) -> Result<Self, BTreeError> {
        if !(MIN_DEGREE..=MAX_DEGREE).contains(&degree) {
            return Err(BTreeError::InvalidDegree(degree));
        }

        let root = Node::new_leaf(FIRST_PAGE_ID);
        store.flush(&root);
        tracing::debug!(degree, "created b-tree");

        Ok(Self {
            degree,
            root,
            len: 0,
            next_page_id: FIRST_PAGE_ID + 1,
            store,
        })
    }

    /// Look up a key.
    ///
    /// Returns the node holding `key` and its index in that node, or `None`
    /// if the key is not in the tree.
    #[must_use]
    pub fn search(&self, key: &K) -> Option<SearchHit<'_, K>> {
        let mut node = &self.root;
        loop {
            self.store.fetch(node);
            match node.find_index(key) {
                Ok(index) => return Some(SearchHit { node, index }),
                Err(_) if node.is_leaf() => return None,
                Err(index) => node = &node.children[index],
            }
        }
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Presence check for the mutating operations. Their own descent
    /// reports each node to the store, so this walk does not.
    fn holds(&self, key: &K) -> bool {
        let mut node = &self.root;
        loop {
            match node.find_index(key) {
                Ok(_) => return true,
                Err(_) if node.is_leaf() => return false,
                Err(index) => node = &node.children[index],
            }
        }
    }

    /// Insert a key.
    ///
    /// Returns `true` if the key was added, `false` if it was already
    /// present (the tree is not modified in that case).
    pub fn insert(&mut self, key: K) -> bool {
        if self.holds(&key) {
            tracing::trace!("ignoring duplicate insert");
            return false;
        }

        if self.root.is_full(self.degree) {
            self.grow_root();
        }

        let Self {
            degree,
            root,
            len,
            next_page_id,
            store,
        } = self;
        let degree = *degree;

        store.fetch(root);
        let mut node = root;
        loop {
            let mut index = match node.find_index(&key) {
                Ok(_) => return false,
                Err(index) => index,
            };

            if node.is_leaf() {
                node.keys.insert(index, key);
                store.flush(node);
                break;
            }

            store.fetch(&node.children[index]);
            if node.children[index].is_full(degree) {
                let sibling_page = allocate_page(next_page_id);
                node.split_child(index, degree, sibling_page);
                store.flush(&node.children[index]);
                store.flush(&node.children[index + 1]);
                store.flush(node);
                tracing::trace!(page_id = node.page_id, sibling_page, "split full child");

                // The promoted median now separates the two halves.
                if key > node.keys[index] {
                    index += 1;
                }
            }
            node = &mut node.children[index];
        }

        *len += 1;
        tracing::debug!(len = *len, "inserted key");
        true
    }

    /// Delete a key.
    ///
    /// Returns the removed key, or `None` if it was not present (the tree is
    /// not modified in that case).
    pub fn delete(&mut self, key: &K) -> Option<K> {
        // The descent rebalances as it goes, so an absent key must be caught
        // before it starts.
        if !self.holds(key) {
            tracing::trace!("ignoring delete of absent key");
            return None;
        }

        let removed = remove_from(&mut self.root, key, self.degree, &self.store);
        self.collapse_root();

        if removed.is_some() {
            self.len -= 1;
        }
        tracing::debug!(removed = removed.is_some(), len = self.len, "delete");
        removed
    }

    /// Remove every key, leaving a single empty leaf as the root.
    pub fn clear(&mut self) {
        let page_id = allocate_page(&mut self.next_page_id);
        let old_root = mem::replace(&mut self.root, Node::new_leaf(page_id));

        let mut pending = vec![old_root];
        while let Some(node) = pending.pop() {
            self.store.release(node.page_id);
            pending.extend(node.children);
        }

        self.store.flush(&self.root);
        self.len = 0;
        tracing::debug!("cleared b-tree");
    }

    /// Split a full root under a fresh root. The only way height grows.
    fn grow_root(&mut self) {
        let root_page = allocate_page(&mut self.next_page_id);
        let sibling_page = allocate_page(&mut self.next_page_id);

        let old_root = mem::replace(&mut self.root, Node::new_leaf(root_page));
        self.root = Node::with_only_child(root_page, old_root);
        self.root.split_child(0, self.degree, sibling_page);

        self.store.flush(&self.root.children[0]);
        self.store.flush(&self.root.children[1]);
        self.store.flush(&self.root);
        tracing::trace!(root_page, height = self.height(), "split root");
    }

    /// Replace an internal root that lost its last key by its only child.
    /// The only way height shrinks.
    fn collapse_root(&mut self) {
        if !self.root.keys.is_empty() || self.root.is_leaf() {
            return;
        }
        if let Some(child) = self.root.children.pop() {
            let old_root = mem::replace(&mut self.root, child);
            self.store.release(old_root.page_id);
            tracing::trace!(
                released_page = old_root.page_id,
                root_page = self.root.page_id,
                "collapsed root"
            );
        }
    }
}

impl<K, S> BTree<K, S> {
    /// Minimum degree `t`.
    #[must_use]
    pub const fn degree(&self) -> usize {
        self.degree
    }

    /// Number of keys in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn root(&self) -> &Node<K> {
        &self.root
    }

    #[must_use]
    pub const fn page_store(&self) -> &S {
        &self.store
    }

    /// Number of edges from the root to any leaf.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut node = &self.root;
        while let Some(first) = node.children.first() {
            height += 1;
            node = first;
        }
        height
    }

    /// Smallest key.
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        let mut node = &self.root;
        while let Some(first) = node.children.first() {
            node = first;
        }
        node.keys.first()
    }

    /// Largest key.
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        let mut node = &self.root;
        while let Some(last) = node.children.last() {
            node = last;
        }
        node.keys.last()
    }
}

#[cfg(test)]
impl<K> BTree<K> {
    /// Wrap a hand-built root without checking any invariant.
    pub(crate) fn from_root_unchecked(degree: usize, root: Node<K>) -> Self {
        let mut len = 0;
        let mut max_page = 0;
        let mut pending = vec![&root];
        while let Some(node) = pending.pop() {
            len += node.keys.len();
            max_page = max_page.max(node.page_id);
            pending.extend(node.children.iter());
        }

        Self {
            degree,
            root,
            len,
            next_page_id: max_page + 1,
            store: NoopPageStore,
        }
    }
}

impl<K: Ord, S: PageStore<K>> Extend<K> for BTree<K, S> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

/// Location of a key found by [`BTree::search`].
#[derive(Debug)]
pub struct SearchHit<'a, K> {
    node: &'a Node<K>,
    index: usize,
}

impl<'a, K> SearchHit<'a, K> {
    /// The node holding the key.
    #[must_use]
    pub const fn node(&self) -> &'a Node<K> {
        self.node
    }

    /// Index of the key within [`Self::node`].
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn key(&self) -> &'a K {
        &self.node.keys[self.index]
    }

    /// The key just before this one in the same node.
    #[must_use]
    pub fn prev_key(&self) -> Option<&'a K> {
        self.index
            .checked_sub(1)
            .and_then(|index| self.node.keys.get(index))
    }

    /// The key just after this one in the same node.
    #[must_use]
    pub fn next_key(&self) -> Option<&'a K> {
        self.node.keys.get(self.index + 1)
    }
}

/// Errors that can occur when building a B-tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BTreeError {
    /// Minimum degree outside [`MIN_DEGREE`]`..=`[`MAX_DEGREE`].
    InvalidDegree(usize),
}

impl std::fmt::Display for BTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDegree(degree) => {
                write!(
                    f,
                    "invalid minimum degree {degree} (must be between {MIN_DEGREE} and {MAX_DEGREE})"
                )
            }
        }
    }
}

impl std::error::Error for BTreeError {}

const fn allocate_page(next_page_id: &mut PageId) -> PageId {
    let page_id = *next_page_id;
    *next_page_id += 1;
    page_id
}

/// Remove `key` from the subtree rooted at `root`.
///
/// Each step first makes sure the child it is about to enter holds at least
/// `t` keys, so the removal at the bottom never leaves a node under-full.
fn remove_from<K: Ord, S: PageStore<K>>(
    root: &mut Node<K>,
    key: &K,
    degree: usize,
    store: &S,
) -> Option<K> {
    let mut node = root;
    loop {
        store.fetch(node);
        match node.find_index(key) {
            Ok(index) if node.is_leaf() => {
                let removed = node.keys.remove(index);
                store.flush(node);
                tracing::trace!(page_id = node.page_id, "removed key from leaf");
                return Some(removed);
            }
            Ok(index) => {
                if node.children[index].can_lend(degree) {
                    let predecessor = take_max(&mut node.children[index], degree, store)?;
                    let removed = mem::replace(&mut node.keys[index], predecessor);
                    store.flush(node);
                    tracing::trace!(page_id = node.page_id, "replaced key by predecessor");
                    return Some(removed);
                }
                if node.children[index + 1].can_lend(degree) {
                    let successor = take_min(&mut node.children[index + 1], degree, store)?;
                    let removed = mem::replace(&mut node.keys[index], successor);
                    store.flush(node);
                    tracing::trace!(page_id = node.page_id, "replaced key by successor");
                    return Some(removed);
                }
                // Both neighbours are minimal: pull the key down into the
                // merged child and keep going there.
                merge_child(node, index, store);
                node = &mut node.children[index];
            }
            Err(_) if node.is_leaf() => return None,
            Err(index) => {
                let index = fill_child(node, index, degree, store);
                node = &mut node.children[index];
            }
        }
    }
}

/// Remove and return the largest key of the subtree rooted at `subtree`.
///
/// `subtree` must hold at least `t` keys.
fn take_max<K, S: PageStore<K>>(subtree: &mut Node<K>, degree: usize, store: &S) -> Option<K> {
    let mut node = subtree;
    loop {
        store.fetch(node);
        if node.is_leaf() {
            let max = node.keys.pop();
            store.flush(node);
            return max;
        }
        let last = node.children.len() - 1;
        let index = fill_child(node, last, degree, store);
        node = &mut node.children[index];
    }
}

/// Remove and return the smallest key of the subtree rooted at `subtree`.
///
/// `subtree` must hold at least `t` keys.
fn take_min<K, S: PageStore<K>>(subtree: &mut Node<K>, degree: usize, store: &S) -> Option<K> {
    let mut node = subtree;
    loop {
        store.fetch(node);
        if node.is_leaf() {
            let min = (!node.keys.is_empty()).then(|| node.keys.remove(0));
            store.flush(node);
            return min;
        }
        let index = fill_child(node, 0, degree, store);
        node = &mut node.children[index];
    }
}

/// Make sure `node.children[index]` holds at least `t` keys.
///
/// Borrows from the left sibling, then the right sibling, and otherwise
/// merges with a sibling (left first). Returns the index of the child that
/// now covers the original child's key range.
fn fill_child<K, S: PageStore<K>>(
    node: &mut Node<K>,
    index: usize,
    degree: usize,
    store: &S,
) -> usize {
    if node.children[index].can_lend(degree) {
        return index;
    }

    if index > 0 && node.children[index - 1].can_lend(degree) {
        node.borrow_from_left(index);
        store.flush(&node.children[index - 1]);
        store.flush(&node.children[index]);
        store.flush(node);
        tracing::trace!(page_id = node.page_id, index, "borrowed from left sibling");
        return index;
    }

    let has_right = index < node.keys.len();
    if has_right && node.children[index + 1].can_lend(degree) {
        node.borrow_from_right(index);
        store.flush(&node.children[index]);
        store.flush(&node.children[index + 1]);
        store.flush(node);
        tracing::trace!(page_id = node.page_id, index, "borrowed from right sibling");
        return index;
    }

    if index > 0 {
        merge_child(node, index - 1, store);
        index - 1
    } else if has_right {
        merge_child(node, index, store);
        index
    } else {
        index
    }
}

fn merge_child<K, S: PageStore<K>>(node: &mut Node<K>, index: usize, store: &S) {
    let absorbed_page = node.merge_children(index);
    store.release(absorbed_page);
    store.flush(&node.children[index]);
    store.flush(node);
    tracing::trace!(page_id = node.page_id, absorbed_page, "merged children");
}
