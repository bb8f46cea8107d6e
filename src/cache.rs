//! Per-query snapshots used as a rate-limit fallback.

use std::collections::HashMap;

use crate::{Gif, Page, QueryKey};

/// Snapshot of the first successful page of a fresh search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Items exactly as the provider returned them.
    pub items: Vec<Gif>,
    /// Provider-reported total.
    pub total_count: usize,
    /// Cursor after the snapshot page.
    pub next_offset: usize,
}

impl From<&Page> for CacheEntry {
    fn from(page: &Page) -> Self {
        Self {
            items: page.items.clone(),
            total_count: page.total_count,
            next_offset: page.next_offset(),
        }
    }
}

/// Session-scoped cache keyed by normalized query. Entries are overwritten, never evicted.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<QueryKey, CacheEntry>,
}

impl ResultCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) the snapshot for `key`.
    pub fn store(&mut self, key: QueryKey, page: &Page) {
        self.entries.insert(key, CacheEntry::from(page));
    }

    /// Looks up the snapshot for `key`.
    pub fn get(&self, key: &QueryKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Number of cached queries.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
