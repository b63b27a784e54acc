mod mealdb;

pub use mealdb::MealDbClient;

use async_trait::async_trait;

use crate::model::{Category, Recipe};
use crate::BrowserError;

/// Read-only provider of recipe records.
///
/// Implementations hand back normalized recipes; callers decide how to
/// recover from failures.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Get the source name (e.g., "themealdb")
    fn source_name(&self) -> &str;

    /// A best-effort batch of random recipes, unique by id. May hold fewer
    /// recipes than were requested.
    async fn random_batch(&self) -> Result<Vec<Recipe>, BrowserError>;

    /// Look up one recipe by id
    async fn by_id(&self, id: &str) -> Result<Option<Recipe>, BrowserError>;

    /// Recipes whose name matches `term`
    async fn search(&self, term: &str) -> Result<Vec<Recipe>, BrowserError>;

    /// All recipe categories
    async fn categories(&self) -> Result<Vec<Category>, BrowserError>;

    /// Full recipes of one category
    async fn by_category(&self, category: &str) -> Result<Vec<Recipe>, BrowserError>;
}
