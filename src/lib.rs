//! Browse TheMealDB recipes, keep a selection of meals and turn it into one
//! combined shopping list.
//!
//! The [`RecipeBrowser`] owns a browsing session: the current listing (random
//! pool or search results), a category filter, pagination persisted to a
//! [`SlotStore`], and the [`SelectionSet`] whose ingredients
//! [`aggregate`] merges.

pub mod aggregator;
pub mod browser;
pub mod collate;
pub mod config;
pub mod error;
pub mod model;
pub mod normalizer;
pub mod pagination;
pub mod selection;
pub mod source;
pub mod storage;

pub use aggregator::{aggregate, aggregate_iter};
pub use browser::{Lifecycle, Listing, ListingRequest, RecipeBrowser, RecipeBrowserBuilder};
pub use config::BrowserConfig;
pub use error::BrowserError;
pub use model::{Category, Ingredient, RawMeal, Recipe};
pub use normalizer::normalize;
pub use pagination::{
    page_count, page_links, page_slice, page_window, PageLink, PaginationState,
    CURRENT_PAGE_KEY, DEFAULT_PAGE_SIZE,
};
pub use selection::SelectionSet;
pub use source::{MealDbClient, RecipeSource};
pub use storage::{FileSlotStore, MemorySlotStore, SlotStore};
