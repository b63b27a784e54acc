use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::aggregator::aggregate;
use crate::config::BrowserConfig;
use crate::model::{Category, Ingredient, Recipe};
use crate::pagination::{
    load_saved_page, page_count, page_slice, PaginationState, CURRENT_PAGE_KEY,
    DEFAULT_PAGE_SIZE,
};
use crate::selection::SelectionSet;
use crate::source::RecipeSource;
use crate::storage::{MemorySlotStore, SlotStore};
use crate::BrowserError;

/// Shared liveness flag of a browser; results arriving after `dispose` are dropped
#[derive(Debug, Clone)]
pub struct Lifecycle(Arc<AtomicBool>);

impl Lifecycle {
    fn new() -> Self {
        Lifecycle(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn dispose(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A listing fetch detached from the browser, so it can run while the
/// browser keeps handling other calls
pub struct ListingRequest {
    source: Arc<dyn RecipeSource>,
    search_term: String,
    generation: u64,
}

impl ListingRequest {
    /// Fetch the listing. Source errors are logged and yield an empty listing.
    pub async fn fetch(self) -> Listing {
        let result = if self.search_term.is_empty() {
            self.source.random_batch().await
        } else {
            self.source.search(&self.search_term).await
        };

        let recipes = result.unwrap_or_else(|e| {
            error!(
                "Error fetching recipes from {} (search '{}'): {}",
                self.source.source_name(),
                self.search_term,
                e
            );
            Vec::new()
        });

        Listing {
            generation: self.generation,
            recipes,
        }
    }
}

/// Result of a [`ListingRequest`], waiting to be applied
#[derive(Debug)]
pub struct Listing {
    generation: u64,
    recipes: Vec<Recipe>,
}

impl Listing {
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }
}

/// Application state of a browsing session: the current listing with its
/// search term and category filter, pagination, and the selected recipes.
pub struct RecipeBrowser {
    source: Arc<dyn RecipeSource>,
    selection: SelectionSet,
    pagination: PaginationState,
    page_size: usize,
    search_term: String,
    category: Option<String>,
    recipes: Vec<Recipe>,
    categories: Vec<Category>,
    generation: u64,
    saved_page: Option<usize>,
    stored_page: Option<usize>,
    lifecycle: Lifecycle,
}

impl RecipeBrowser {
    /// Creates a new builder for a browsing session
    ///
    /// # Example
    /// ```
    /// use recipe_browser::{MealDbClient, RecipeBrowser};
    ///
    /// let builder = RecipeBrowser::builder()
    ///     .source(MealDbClient::with_base_url("https://www.themealdb.com/api/json/v1/1"));
    /// ```
    pub fn builder() -> RecipeBrowserBuilder {
        RecipeBrowserBuilder::default()
    }

    /// Start a fetch of the listing for the current search term.
    ///
    /// Any request started earlier becomes stale: its listing will no longer
    /// be applied.
    pub fn listing_request(&mut self) -> ListingRequest {
        self.generation += 1;
        ListingRequest {
            source: Arc::clone(&self.source),
            search_term: self.search_term.clone(),
            generation: self.generation,
        }
    }

    /// Apply a fetched listing. Returns `false` when the listing is stale or
    /// the browser has been disposed.
    pub fn apply_listing(&mut self, listing: Listing) -> bool {
        if !self.lifecycle.is_live() {
            debug!("Browser disposed, dropping listing");
            return false;
        }
        if listing.generation != self.generation {
            debug!(
                "Dropping stale listing {} (current {})",
                listing.generation, self.generation
            );
            return false;
        }

        self.recipes = listing.recipes;
        self.update_total_pages();
        true
    }

    /// Fetch and apply the listing for the current search term
    pub async fn refresh(&mut self) -> bool {
        let listing = self.listing_request().fetch().await;
        self.apply_listing(listing)
    }

    /// Search recipes by name; an empty term brings back the random pool.
    /// Resets to the first page.
    pub async fn search(&mut self, term: &str) -> bool {
        self.search_term = term.trim().to_string();
        self.reset_page();
        self.refresh().await
    }

    /// Only show recipes of `category` (exact match), or all when `None`.
    /// Resets to the first page.
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
        self.reset_page();
        self.update_total_pages();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Every recipe of the current listing, before filtering
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Recipes of the current listing that pass the category filter
    pub fn filtered(&self) -> Vec<&Recipe> {
        match &self.category {
            Some(category) => self
                .recipes
                .iter()
                .filter(|recipe| &recipe.category == category)
                .collect(),
            None => self.recipes.iter().collect(),
        }
    }

    /// Recipes on the current page
    pub fn visible(&self) -> Vec<&Recipe> {
        let filtered = self.filtered();
        page_slice(&filtered, self.pagination.current_page(), self.page_size).to_vec()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    /// Jump to `page`; out-of-range pages are rejected
    pub fn go_to_page(&mut self, page: usize) -> Result<(), BrowserError> {
        self.saved_page = None;
        self.pagination.set_current_page(page)
    }

    pub fn next_page(&mut self) {
        self.saved_page = None;
        self.pagination.next_page();
    }

    pub fn previous_page(&mut self) {
        self.saved_page = None;
        self.pagination.previous_page();
    }

    /// Page read from the slot store when the browser was built
    pub fn stored_page(&self) -> Option<usize> {
        self.stored_page
    }

    /// Go back to the page read from the slot store, if the current listing
    /// has that many pages. Searches and category changes start from page 1,
    /// so a caller continuing an earlier session calls this after them.
    pub fn resume_stored_page(&mut self) -> bool {
        let Some(page) = self.stored_page else {
            return false;
        };
        self.saved_page = None;
        self.pagination.try_restore(page)
    }

    /// Fetch the category list. Errors are logged and leave it empty.
    pub async fn load_categories(&mut self) -> &[Category] {
        match self.source.categories().await {
            Ok(categories) => {
                if self.lifecycle.is_live() {
                    self.categories = categories;
                }
            }
            Err(e) => {
                error!("Error fetching categories: {}", e);
                if self.lifecycle.is_live() {
                    self.categories.clear();
                }
            }
        }
        &self.categories
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a single recipe. Errors are logged and reported as absent.
    pub async fn recipe(&self, id: &str) -> Option<Recipe> {
        match self.source.by_id(id).await {
            Ok(recipe) => recipe,
            Err(e) => {
                error!("Error fetching recipe with id {}: {}", id, e);
                None
            }
        }
    }

    /// Every recipe of a category, as filtered by the source. Errors are
    /// logged and yield an empty list.
    pub async fn category_recipes(&self, category: &str) -> Vec<Recipe> {
        self.source
            .by_category(category)
            .await
            .unwrap_or_else(|e| {
                error!("Error fetching recipes for category {}: {}", category, e);
                Vec::new()
            })
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionSet {
        &mut self.selection
    }

    /// Select or unselect `recipe`; returns whether it is selected afterwards
    pub fn toggle_selected(&mut self, recipe: &Recipe) -> bool {
        self.selection.toggle(recipe.clone())
    }

    /// Combined ingredients of every selected recipe
    pub fn shopping_list(&self) -> Vec<Ingredient> {
        aggregate(self.selection.recipes())
    }

    /// Token that reports whether this browser is still live
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.clone()
    }

    /// Stop accepting fetched results
    pub fn dispose(&self) {
        self.lifecycle.dispose();
    }

    /// Wait for the pending page write, if any
    pub async fn shutdown(&mut self) {
        self.pagination.flush().await;
    }

    fn reset_page(&mut self) {
        self.saved_page = None;
        if !self.pagination.is_first_page() {
            // page 1 always exists
            let _ = self.pagination.set_current_page(1);
        }
    }

    fn update_total_pages(&mut self) {
        let total = page_count(self.filtered().len(), self.page_size);
        self.pagination.set_total_pages(total);

        if let Some(saved) = self.saved_page {
            if self.pagination.try_restore(saved) {
                info!("Restored saved page {}", saved);
                self.saved_page = None;
            }
        }
    }
}

/// Builder for configuring a [`RecipeBrowser`]
#[derive(Default)]
pub struct RecipeBrowserBuilder {
    source: Option<Arc<dyn RecipeSource>>,
    store: Option<Arc<dyn SlotStore>>,
    page_size: Option<usize>,
    storage_key: Option<String>,
}

impl RecipeBrowserBuilder {
    /// Set the recipe source (required)
    pub fn source(self, source: impl RecipeSource + 'static) -> Self {
        self.shared_source(Arc::new(source))
    }

    /// Set an already shared recipe source
    pub fn shared_source(mut self, source: Arc<dyn RecipeSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the durable slot store for the current page (in-memory by default)
    pub fn store(self, store: impl SlotStore + 'static) -> Self {
        self.shared_store(Arc::new(store))
    }

    pub fn shared_store(mut self, store: Arc<dyn SlotStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Recipes per page (default 8)
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Slot key for the current page (default `currentPage`)
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    /// Take page size and storage key from configuration
    pub fn config(self, config: &BrowserConfig) -> Self {
        self.page_size(config.pagination.page_size)
            .storage_key(config.pagination.storage_key.clone())
    }

    /// Build the browser and read the saved page from the store.
    ///
    /// # Errors
    /// Returns `BrowserError::BuilderError` if no source was set or the page
    /// size is zero.
    pub async fn build(self) -> Result<RecipeBrowser, BrowserError> {
        let source = self.source.ok_or_else(|| {
            BrowserError::BuilderError("No recipe source specified. Use .source()".to_string())
        })?;

        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(BrowserError::BuilderError(
                "Page size must be at least 1".to_string(),
            ));
        }

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemorySlotStore::new()));
        let key = self
            .storage_key
            .unwrap_or_else(|| CURRENT_PAGE_KEY.to_string());
        let saved_page = load_saved_page(store.as_ref(), &key).await;

        Ok(RecipeBrowser {
            source,
            selection: SelectionSet::new(),
            pagination: PaginationState::with_store(store, key),
            page_size,
            search_term: String::new(),
            category: None,
            recipes: Vec::new(),
            categories: Vec::new(),
            generation: 0,
            saved_page,
            stored_page: saved_page,
            lifecycle: Lifecycle::new(),
        })
    }
}
