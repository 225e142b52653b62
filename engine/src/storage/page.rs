//! Page identifiers and the page-store collaborator.
//!
//! Every B-tree node stands for one page-sized block. The tree itself lives
//! entirely in memory, but it reports each read and write of a node to a
//! [`PageStore`] so a real storage engine can hook in later.
//!
//! # Hook points
//!
//! - `fetch`: a node is about to be examined (conceptually a page read)
//! - `flush`: a node was created or mutated (conceptually a page write)
//! - `release`: a node was absorbed by a merge or a root collapse
//!
//! The core tolerates every hook being a no-op, which is what
//! [`NoopPageStore`] does.

use std::cell::Cell;

use crate::storage::btree::Node;

/// A page identifier (1-indexed, assigned per tree, never reused).
pub type PageId = u64;

/// The first page id handed out by a fresh tree.
pub const FIRST_PAGE_ID: PageId = 1;

/// Collaborator notified about node reads and writes.
///
/// All hooks take `&self` so read-only operations such as search can report
/// fetches. Implementations that record anything use interior mutability.
pub trait PageStore<K> {
    /// Called when the core visits `node`.
    fn fetch(&self, _node: &Node<K>) {}

    /// Called after `node` was created or modified.
    fn flush(&self, _node: &Node<K>) {}

    /// Called after the node stored at `page_id` was discarded.
    fn release(&self, _page_id: PageId) {}
}

/// Page store that ignores every hook.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoopPageStore;

impl<K> PageStore<K> for NoopPageStore {}

/// Snapshot of the counters kept by a [`CountingPageStore`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageStoreStats {
    pub fetches: u64,
    pub flushes: u64,
    pub releases: u64,
}

/// Page store that counts how often each hook fires.
///
/// # Thread Safety
///
/// Counters live in [`Cell`]s, so this store is single-threaded only. The
/// tree is single-writer anyway.
#[derive(Debug, Default)]
pub struct CountingPageStore {
    fetches: Cell<u64>,
    flushes: Cell<u64>,
    releases: Cell<u64>,
}

impl CountingPageStore {
    /// Create a store with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counter values.
    #[must_use]
    pub fn stats(&self) -> PageStoreStats {
        PageStoreStats {
            fetches: self.fetches.get(),
            flushes: self.flushes.get(),
            releases: self.releases.get(),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.fetches.set(0);
        self.flushes.set(0);
        self.releases.set(0);
    }
}

impl<K> PageStore<K> for CountingPageStore {
    fn fetch(&self, _node: &Node<K>) {
        self.fetches.set(self.fetches.get() + 1);
    }

    fn flush(&self, _node: &Node<K>) {
        self.flushes.set(self.flushes.get() + 1);
    }

    fn release(&self, _page_id: PageId) {
        self.releases.set(self.releases.get() + 1);
    }
}
