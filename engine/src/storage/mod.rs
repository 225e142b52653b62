//! Storage layer: the B-tree and the page-store hooks it reports to.
//!
//! Nodes are kept in memory. Each one is tagged with a [`PageId`] so that a
//! [`PageStore`] can map node reads and writes onto real pages.

pub mod btree;
pub mod page;

pub use btree::{BTree, BTreeError};
pub use page::{CountingPageStore, NoopPageStore, PageId, PageStore, PageStoreStats};
