use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;

use crate::config::SourceConfig;
use crate::model::{CategoriesResponse, Category, MealsResponse, RawMeal, Recipe};
use crate::normalizer::normalize;
use crate::source::RecipeSource;
use crate::BrowserError;

/// HTTP client for TheMealDB JSON API
pub struct MealDbClient {
    client: Client,
    base_url: String,
    random_batch_size: usize,
}

impl MealDbClient {
    /// Create a new client from configuration
    pub fn new(config: &SourceConfig) -> Result<Self, BrowserError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(MealDbClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            random_batch_size: config.random_batch_size,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        MealDbClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            random_batch_size: SourceConfig::default().random_batch_size,
        }
    }

    /// Number of `random.php` calls per random batch
    pub fn with_random_batch_size(mut self, random_batch_size: usize) -> Self {
        self.random_batch_size = random_batch_size;
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BrowserError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        if !response.status().is_success() {
            return Err(BrowserError::StatusError {
                status: response.status().as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_meals(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<RawMeal>, BrowserError> {
        let response: MealsResponse = self.get_json(endpoint, query).await?;
        Ok(response.meals.unwrap_or_default())
    }

    async fn random_one(&self) -> Result<Option<Recipe>, BrowserError> {
        let meals = self.get_meals("random.php", &[]).await?;
        Ok(meals.first().map(normalize))
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    fn source_name(&self) -> &str {
        "themealdb"
    }

    async fn random_batch(&self) -> Result<Vec<Recipe>, BrowserError> {
        let requests = (0..self.random_batch_size).map(|_| self.random_one());
        let results = join_all(requests).await;

        let mut seen = HashSet::new();
        let mut recipes = Vec::new();
        let mut failures = 0;
        let mut last_error = None;

        for result in results {
            match result {
                Ok(Some(recipe)) => {
                    if seen.insert(recipe.id.clone()) {
                        recipes.push(recipe);
                    } else {
                        debug!("Dropping duplicate random recipe {}", recipe.id);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Random recipe request failed: {}", e);
                    failures += 1;
                    last_error = Some(e);
                }
            }
        }

        if let Some(e) = last_error {
            if failures == self.random_batch_size {
                return Err(e);
            }
        }

        debug!(
            "Random batch: {} unique recipes from {} requests",
            recipes.len(),
            self.random_batch_size
        );
        Ok(recipes)
    }

    async fn by_id(&self, id: &str) -> Result<Option<Recipe>, BrowserError> {
        let meals = self.get_meals("lookup.php", &[("i", id)]).await?;
        Ok(meals.first().map(normalize))
    }

    async fn search(&self, term: &str) -> Result<Vec<Recipe>, BrowserError> {
        let meals = self.get_meals("search.php", &[("s", term)]).await?;
        Ok(meals.iter().map(normalize).collect())
    }

    async fn categories(&self) -> Result<Vec<Category>, BrowserError> {
        let response: CategoriesResponse = self.get_json("categories.php", &[]).await?;
        Ok(response.categories.unwrap_or_default())
    }

    async fn by_category(&self, category: &str) -> Result<Vec<Recipe>, BrowserError> {
        // filter.php only returns id, name and thumbnail, so look each one up
        let summaries = self.get_meals("filter.php", &[("c", category)]).await?;
        let ids: Vec<String> = summaries.into_iter().filter_map(|meal| meal.id).collect();

        let lookups = ids.iter().map(|id| self.by_id(id));
        let results = join_all(lookups).await;

        let recipes = ids
            .iter()
            .zip(results)
            .filter_map(|(id, result)| match result {
                Ok(recipe) => recipe,
                Err(e) => {
                    warn!("Failed to fetch recipe {} of category {}: {}", id, category, e);
                    None
                }
            })
            .collect();

        Ok(recipes)
    }
}
