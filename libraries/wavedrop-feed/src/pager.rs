//! Paginated feed of uploads.
//!
//! One pager owns one ordered, append-only list of items, fetched in
//! fixed-size pages. Concurrent fetches are collapsed by an in-flight
//! guard, and completions are validated against a generation stamp so a
//! late page from an abandoned load cannot corrupt newer state.

use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use wavedrop_core::{
    AudioItem, AuthService, FeedFilter, Notifier, Page, Result, StorageService, WavedropError,
};

/// Items fetched per page
pub const PAGE_SIZE: u64 = 8;

struct PagerInner {
    filter: FeedFilter,
    items: Vec<AudioItem>,
    exhausted: bool,
    in_flight: bool,
    /// Bumped on every `load`; completions from older generations are
    /// discarded.
    generation: u64,
}

/// Paginated, deduplicated, append-only feed of audio items.
///
/// The list is owned exclusively by this pager; tiles receive clones of
/// individual items. Ordering is whatever the storage service delivers
/// (`created_at` descending) and is never changed locally.
pub struct FeedPager {
    storage: Arc<dyn StorageService>,
    auth: Arc<dyn AuthService>,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<PagerInner>,
}

impl FeedPager {
    /// Create a pager showing the global feed
    pub fn new(
        storage: Arc<dyn StorageService>,
        auth: Arc<dyn AuthService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            storage,
            auth,
            notifier,
            inner: Mutex::new(PagerInner {
                filter: FeedFilter::All,
                items: Vec::new(),
                exhausted: false,
                in_flight: false,
                generation: 0,
            }),
        }
    }

    /// Snapshot of the current list, in feed order
    pub fn items(&self) -> Vec<AudioItem> {
        self.lock().items.clone()
    }

    /// Number of items loaded so far
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Whether nothing is loaded
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Whether there are no further pages to fetch
    pub fn is_exhausted(&self) -> bool {
        self.lock().exhausted
    }

    /// Whether a fetch is currently in flight
    pub fn is_loading(&self) -> bool {
        self.lock().in_flight
    }

    /// The active filter
    pub fn filter(&self) -> FeedFilter {
        self.lock().filter.clone()
    }

    /// Reset the list and fetch the first page for `filter`.
    ///
    /// Switching filter is exactly this call. An owner-scoped feed
    /// without a signed-in viewer fetches nothing and terminates empty.
    /// A failed first fetch leaves an empty feed, never a partial one.
    pub async fn load(&self, filter: FeedFilter) -> Result<()> {
        if filter.owner().is_some() {
            let viewer = match self.auth.current_user().await {
                Ok(viewer) => viewer,
                Err(err) => {
                    let mut inner = self.lock();
                    inner.generation += 1;
                    inner.filter = filter;
                    inner.items.clear();
                    inner.exhausted = false;
                    inner.in_flight = false;
                    drop(inner);
                    warn!(error = %err, "viewer lookup failed before feed load");
                    self.notifier
                        .error(&format!("Failed to load audio files: {err}"));
                    return Err(err);
                }
            };
            if viewer.is_none() {
                let mut inner = self.lock();
                inner.generation += 1;
                inner.filter = filter;
                inner.items.clear();
                inner.exhausted = true;
                inner.in_flight = false;
                debug!("owner-scoped feed without a viewer; nothing to fetch");
                return Ok(());
            }
        }

        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.filter = filter.clone();
            inner.items.clear();
            inner.exhausted = false;
            inner.in_flight = true;
            inner.generation
        };

        debug!(?filter, "loading first page");
        let fetched = self.storage.list_audios(&filter, 0, PAGE_SIZE).await;
        self.apply_page(generation, fetched, true)
    }

    /// Fetch the next page and append it.
    ///
    /// A no-op while exhausted or while another fetch is in flight, so
    /// duplicate concurrent calls cannot double-append.
    pub async fn load_more(&self) -> Result<()> {
        let (generation, filter, offset) = {
            let mut inner = self.lock();
            if inner.exhausted || inner.in_flight {
                return Ok(());
            }
            inner.in_flight = true;
            (
                inner.generation,
                inner.filter.clone(),
                inner.items.len() as u64,
            )
        };

        debug!(?filter, offset, "loading next page");
        let fetched = self.storage.list_audios(&filter, offset, PAGE_SIZE).await;
        self.apply_page(generation, fetched, false)
    }

    /// Apply a fetch completion, or discard it if `load` superseded the
    /// generation it belongs to.
    fn apply_page(
        &self,
        generation: u64,
        fetched: Result<Page<AudioItem>>,
        initial: bool,
    ) -> Result<()> {
        let failure = {
            let mut inner = self.lock();
            if inner.generation != generation {
                debug!("discarding page from a superseded load");
                return Err(WavedropError::StaleCompletion);
            }
            inner.in_flight = false;

            match fetched {
                Ok(page) => {
                    let fetched_count = page.rows.len() as u64;
                    if initial {
                        inner.items = page.rows;
                    } else {
                        for item in page.rows {
                            // Offset pagination can re-deliver a row when
                            // uploads land mid-scroll; uniqueness of `id`
                            // is the only dedup applied.
                            if !inner.items.iter().any(|existing| existing.id == item.id) {
                                inner.items.push(item);
                            }
                        }
                    }

                    // A short page is always terminal, and a known exact
                    // total terminates as well.
                    if fetched_count < PAGE_SIZE {
                        inner.exhausted = true;
                    }
                    if let Some(total) = page.total_count {
                        if inner.items.len() as u64 >= total {
                            inner.exhausted = true;
                        }
                    }

                    debug!(
                        loaded = inner.items.len(),
                        exhausted = inner.exhausted,
                        "page applied"
                    );
                    None
                }
                Err(err) => {
                    if initial {
                        inner.items.clear();
                    }
                    Some(err)
                }
            }
        };

        match failure {
            None => Ok(()),
            Some(err) => {
                warn!(error = %err, initial, "feed fetch failed");
                self.notifier
                    .error(&format!("Failed to load audio files: {err}"));
                Err(err)
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PagerInner> {
        self.inner.lock().expect("pager state poisoned")
    }
}
