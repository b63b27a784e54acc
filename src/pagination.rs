use log::{debug, warn};
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::storage::SlotStore;
use crate::BrowserError;

/// Recipes shown per page
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Durable slot key for the current page
pub const CURRENT_PAGE_KEY: &str = "currentPage";

/// Number of pages needed for `len` items, never less than one
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Index range of page `page` (1-based) over a list of `len` items
pub fn page_window(len: usize, page: usize, page_size: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

/// The items visible on page `page`
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    &items[page_window(items.len(), page, page_size)]
}

/// One entry of the page-number bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    /// Elided run of pages
    Gap,
}

const MAX_VISIBLE_PAGES: usize = 7;

/// Page-number bar showing at most seven page numbers
pub fn page_links(current: usize, total: usize) -> Vec<PageLink> {
    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(PageLink::Page).collect();
    }

    let mut links = Vec::with_capacity(MAX_VISIBLE_PAGES + 2);
    if current <= 4 {
        links.extend((1..=MAX_VISIBLE_PAGES).map(PageLink::Page));
        links.push(PageLink::Gap);
        links.push(PageLink::Page(total));
    } else if current >= total - 3 {
        links.push(PageLink::Page(1));
        links.push(PageLink::Gap);
        links.extend((total - 6..=total).map(PageLink::Page));
    } else {
        links.push(PageLink::Page(1));
        links.push(PageLink::Gap);
        links.extend((current - 2..=current + 2).map(PageLink::Page));
        links.push(PageLink::Gap);
        links.push(PageLink::Page(total));
    }
    links
}

/// Read a previously saved page number from `store`.
///
/// Unreadable or non-numeric values are treated as "nothing saved".
pub async fn load_saved_page(store: &dyn SlotStore, key: &str) -> Option<usize> {
    match store.load(key).await {
        Ok(Some(value)) => match value.trim().parse() {
            Ok(page) => Some(page),
            Err(_) => {
                debug!("Ignoring non-numeric saved page '{}'", value);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to read saved page: {}", e);
            None
        }
    }
}

/// Writes page changes to the durable slot in the background
struct PagePersister {
    store: Arc<dyn SlotStore>,
    key: String,
    latest: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

impl PagePersister {
    /// Schedule a write of `page` for the next scheduler tick.
    ///
    /// Writes are applied in order and a write is dropped when a newer one
    /// was scheduled before it ran.
    fn schedule(&mut self, page: usize) {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                debug!("No async runtime, page {} not persisted", page);
                return;
            }
        };

        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        let latest = Arc::clone(&self.latest);
        let previous = self.pending.take();

        self.pending = Some(handle.spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            tokio::task::yield_now().await;

            if latest.load(Ordering::SeqCst) != generation {
                debug!("Page {} superseded before it was persisted", page);
                return;
            }
            if let Err(e) = store.save(&key, &page.to_string()).await {
                warn!("Failed to persist current page {}: {}", page, e);
            }
        }));
    }

    async fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            if let Err(e) = pending.await {
                warn!("Page persist task failed: {}", e);
            }
        }
    }
}

/// Current page and page count of a paginated listing.
///
/// Keeps `1 <= current_page <= total_pages` after every transition. When
/// built with a store, every change of the current page is persisted in the
/// background; the initial state and restores are not written back.
pub struct PaginationState {
    current_page: usize,
    total_pages: usize,
    persister: Option<PagePersister>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationState {
    /// In-memory state starting at page 1 of 1
    pub fn new() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            persister: None,
        }
    }

    /// State starting at page 1 of 1 that persists page changes under `key`
    pub fn with_store(store: Arc<dyn SlotStore>, key: impl Into<String>) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            persister: Some(PagePersister {
                store,
                key: key.into(),
                latest: Arc::new(AtomicU64::new(0)),
                pending: None,
            }),
        }
    }

    /// Build a persisting state for `total_pages` pages and restore the saved
    /// page when it lies within range
    pub async fn restore(
        store: Arc<dyn SlotStore>,
        key: impl Into<String>,
        total_pages: usize,
    ) -> Self {
        let key = key.into();
        let saved = load_saved_page(store.as_ref(), &key).await;

        let mut state = Self::with_store(store, key);
        state.total_pages = total_pages.max(1);
        if let Some(page) = saved {
            state.try_restore(page);
        }
        state
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page == self.total_pages
    }

    /// Set the page count (at least one), pulling the current page back into range
    pub fn set_total_pages(&mut self, total_pages: usize) {
        self.total_pages = total_pages.max(1);
        let clamped = self.current_page.clamp(1, self.total_pages);
        self.change_page(clamped);
    }

    /// Jump to `page`. Out-of-range pages are rejected and leave the state untouched.
    pub fn set_current_page(&mut self, page: usize) -> Result<(), BrowserError> {
        if page < 1 || page > self.total_pages {
            return Err(BrowserError::PageOutOfRange {
                page,
                total_pages: self.total_pages,
            });
        }
        self.change_page(page);
        Ok(())
    }

    /// Move one page forward, staying on the last page
    pub fn next_page(&mut self) {
        let page = (self.current_page + 1).min(self.total_pages);
        self.change_page(page);
    }

    /// Move one page back, staying on the first page
    pub fn previous_page(&mut self) {
        let page = self.current_page.saturating_sub(1).max(1);
        self.change_page(page);
    }

    /// Apply a saved page if it is valid for the current page count. Not persisted.
    pub fn try_restore(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages {
            self.current_page = page;
            true
        } else {
            debug!(
                "Saved page {} outside 1..={}, keeping page {}",
                page, self.total_pages, self.current_page
            );
            false
        }
    }

    /// Page-number bar for the current state
    pub fn links(&self) -> Vec<PageLink> {
        page_links(self.current_page, self.total_pages)
    }

    /// Wait for the last scheduled page write to finish
    pub async fn flush(&mut self) {
        if let Some(persister) = self.persister.as_mut() {
            persister.flush().await;
        }
    }

    fn change_page(&mut self, page: usize) {
        if page == self.current_page {
            return;
        }
        self.current_page = page;
        if let Some(persister) = self.persister.as_mut() {
            persister.schedule(page);
        }
    }
}
