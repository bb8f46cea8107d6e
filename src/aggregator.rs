//! Result aggregation across paginated provider fetches.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::cache::{CacheEntry, ResultCache};
use crate::session::{SessionError, SessionState};
use crate::{AggregatorConfig, Gif, GifError, GifProvider, Page, QueryKey, Result};

/// Shown when a fresh search is rate limited but a cached snapshot exists.
pub const RATE_LIMIT_FALLBACK_NOTICE: &str = "Rate limit exceeded. Showing cached results.";

/// Shown when a search is rate limited and nothing is cached for the query.
pub const RATE_LIMIT_ERROR: &str = "Rate limit exceeded. Please try again later.";

struct Inner {
    state: SessionState,
    cache: ResultCache,
    /// Bumped by every operation that fetches; stale completions are dropped.
    generation: u64,
}

/// Stateful controller turning provider pages into a stable, deduplicated list.
///
/// Operations take `&self` and may overlap. Each one captures a generation
/// number when it starts and only applies its outcome if no later operation
/// has started in the meantime.
pub struct Aggregator {
    provider: Arc<dyn GifProvider>,
    config: AggregatorConfig,
    inner: Mutex<Inner>,
}

impl Aggregator {
    /// Creates an aggregator with default pagination settings.
    pub fn new<P: GifProvider + 'static>(provider: P) -> Self {
        Self::with_provider(Arc::new(provider), AggregatorConfig::default())
    }

    /// Creates an aggregator over a shared provider.
    pub fn with_provider(provider: Arc<dyn GifProvider>, config: AggregatorConfig) -> Self {
        Self {
            provider,
            config,
            inner: Mutex::new(Inner {
                state: SessionState::default(),
                cache: ResultCache::new(),
                generation: 0,
            }),
        }
    }

    /// Returns the pagination settings.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Returns a snapshot of the current session state.
    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Returns the cached first-page snapshot for a query, if any.
    pub fn cached(&self, query: &str) -> Option<CacheEntry> {
        self.lock().cache.get(&QueryKey::new(query)).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Shows a small preview sample: random GIFs, or trending if random fails.
    pub async fn load_initial(&self) -> SessionState {
        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state.loading = true;
            inner.state.error = None;
            inner.generation
        };

        let count = self.config.initial_sample;
        let outcome = match self.provider.random(count).await {
            Ok(gifs) => Ok(gifs),
            Err(e) => {
                warn!("Random sample failed, falling back to trending: {}", e);
                self.provider.trending(count).await.map(|page| page.items)
            }
        };

        self.commit(generation, |inner| {
            let state = &mut inner.state;
            match outcome {
                Ok(gifs) => {
                    state.gifs = unique_new(&HashSet::new(), &gifs);
                    state.total_count = state.gifs.len();
                    state.has_more = false;
                    state.next_offset = 0;
                    state.active_query = QueryKey::trending();
                    debug!("Initial sample loaded with {} gifs", state.gifs.len());
                }
                Err(e) => {
                    warn!("Initial sample failed: {}", e);
                    state.error = Some(SessionError::error(e.to_string()));
                }
            }
        })
    }

    /// Runs a search.
    ///
    /// `reset = true` starts a fresh search: the visible list is cleared and the
    /// cursor goes back to 0. `reset = false` continues from the current cursor
    /// and appends only items not already visible. An empty query targets the
    /// trending feed.
    pub async fn search(&self, query: &str, reset: bool) -> SessionState {
        let key = QueryKey::new(query);
        let (generation, offset, known) = {
            let mut inner = self.lock();
            inner.generation += 1;
            let state = &mut inner.state;
            state.loading = true;
            state.error = None;
            state.active_query = key.clone();
            if reset {
                state.gifs.clear();
            }
            let offset = if reset { 0 } else { state.next_offset };
            let known: HashSet<String> = state.gifs.iter().map(|gif| gif.id.clone()).collect();
            (inner.generation, offset, known)
        };
        debug!("Search '{}' reset={} offset={}", key, reset, offset);

        match self.fetch_new_items(&key, reset, offset, &known).await {
            Ok((page, new_items)) => self.apply_page(generation, reset, page, new_items),
            Err(e) => self.apply_failure(generation, &key, reset, e),
        }
    }

    /// Continues the active query. No-op while loading or when nothing more is available.
    pub async fn load_more(&self) -> SessionState {
        let query = {
            let inner = self.lock();
            if inner.state.loading || !inner.state.has_more {
                debug!(
                    "Ignoring load_more (loading={}, has_more={})",
                    inner.state.loading, inner.state.has_more
                );
                return inner.state.clone();
            }
            inner.state.active_query.clone()
        };
        self.search(query.as_str(), false).await
    }

    /// Dismisses the current error or notice.
    pub fn clear_error(&self) -> SessionState {
        let mut inner = self.lock();
        inner.state.error = None;
        inner.state.clone()
    }

    /// Fetches pages until one contributes new items, skipping pages the
    /// provider served as full duplicates of what is already visible.
    async fn fetch_new_items(
        &self,
        key: &QueryKey,
        reset: bool,
        mut offset: usize,
        known: &HashSet<String>,
    ) -> Result<(Page, Vec<Gif>)> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let page = self.fetch_page(key, offset).await?;

            if reset && attempts == 1 {
                let mut inner = self.lock();
                inner.cache.store(key.clone(), &page);
                debug!("Cached first page for '{}' ({} queries cached)", key, inner.cache.len());
            }

            let new_items = unique_new(known, &page.items);
            debug!(
                "Attempt {} for '{}' at offset {}: {} items, {} new",
                attempts,
                key,
                offset,
                page.len(),
                new_items.len()
            );

            if !reset
                && new_items.is_empty()
                && !page.is_empty()
                && attempts < self.config.max_attempts
            {
                offset += self.config.page_size;
                continue;
            }
            return Ok((page, new_items));
        }
    }

    async fn fetch_page(&self, key: &QueryKey, offset: usize) -> Result<Page> {
        if key.is_trending() {
            self.provider.trending(self.config.page_size).await
        } else {
            self.provider
                .search(key.as_str(), offset, self.config.page_size)
                .await
        }
    }

    fn apply_page(
        &self,
        generation: u64,
        reset: bool,
        page: Page,
        new_items: Vec<Gif>,
    ) -> SessionState {
        let page_size = self.config.page_size;
        self.commit(generation, |inner| {
            let state = &mut inner.state;
            let found_new = !new_items.is_empty();
            if reset {
                state.gifs = new_items;
            } else {
                state.gifs.extend(new_items);
            }
            // A short page is the end of results; total_count alone is not trusted.
            state.has_more =
                page.len() == page_size && found_new && state.gifs.len() < page.total_count;
            state.total_count = page.total_count;
            state.next_offset = page.next_offset();
            debug!(
                "Visible list now {} gifs, has_more={}, next_offset={}",
                state.gifs.len(),
                state.has_more,
                state.next_offset
            );
        })
    }

    fn apply_failure(
        &self,
        generation: u64,
        key: &QueryKey,
        reset: bool,
        error: GifError,
    ) -> SessionState {
        self.commit(generation, |inner| {
            let Inner { state, cache, .. } = inner;
            state.has_more = false;
            match error {
                GifError::RateLimited(_) => match cache.get(key) {
                    Some(entry) if reset => {
                        warn!("Rate limited on '{}', showing cached results", key);
                        state.gifs = unique_new(&HashSet::new(), &entry.items);
                        state.total_count = entry.total_count;
                        state.next_offset = entry.next_offset;
                        state.error = Some(SessionError::info(RATE_LIMIT_FALLBACK_NOTICE));
                    }
                    Some(_) => {
                        warn!("Rate limited while continuing '{}', stopping pagination", key);
                    }
                    None => {
                        warn!("Rate limited on '{}' with nothing cached", key);
                        state.error = Some(SessionError::error(RATE_LIMIT_ERROR));
                    }
                },
                other => {
                    warn!("Search '{}' failed: {}", key, other);
                    state.error = Some(SessionError::error(format!("Search error: {}", other)));
                }
            }
        })
    }

    /// Applies `update` only if `generation` is still current.
    fn commit(&self, generation: u64, update: impl FnOnce(&mut Inner)) -> SessionState {
        let mut inner = self.lock();
        if inner.generation != generation {
            warn!(
                "Discarding stale response (generation {} superseded by {})",
                generation, inner.generation
            );
            return inner.state.clone();
        }
        update(&mut *inner);
        inner.state.loading = false;
        inner.state.clone()
    }
}

/// Items whose id is neither in `known` nor earlier in `items`, in order.
fn unique_new(known: &HashSet<String>, items: &[Gif]) -> Vec<Gif> {
    let mut seen: HashSet<&str> = HashSet::new();
    items
        .iter()
        .filter(|gif| !known.contains(&gif.id) && seen.insert(gif.id.as_str()))
        .cloned()
        .collect()
}
