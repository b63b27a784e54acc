use async_trait::async_trait;
use recipe_browser::{
    BrowserError, Category, Ingredient, MemorySlotStore, Recipe, RecipeBrowser, RecipeSource,
    SlotStore, CURRENT_PAGE_KEY,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn recipe(id: &str, category: &str, ingredients: &[(&str, &str)]) -> Recipe {
    Recipe {
        id: id.to_string(),
        title: format!("Recipe {}", id),
        category: category.to_string(),
        ingredients: ingredients
            .iter()
            .map(|(name, measure)| Ingredient::new(*name, *measure))
            .collect(),
        ..Default::default()
    }
}

fn numbered_recipes(count: usize) -> Vec<Recipe> {
    (1..=count)
        .map(|i| recipe(&i.to_string(), "Misc", &[]))
        .collect()
}

#[derive(Default)]
struct FakeSource {
    random: Vec<Recipe>,
    searches: HashMap<String, Vec<Recipe>>,
    categories: Vec<Category>,
    failing: AtomicBool,
}

impl FakeSource {
    fn failing() -> Self {
        FakeSource {
            failing: AtomicBool::new(true),
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), BrowserError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(BrowserError::StatusError {
                status: 500,
                url: "http://fake".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecipeSource for FakeSource {
    fn source_name(&self) -> &str {
        "fake"
    }

    async fn random_batch(&self) -> Result<Vec<Recipe>, BrowserError> {
        self.check()?;
        Ok(self.random.clone())
    }

    async fn by_id(&self, id: &str) -> Result<Option<Recipe>, BrowserError> {
        self.check()?;
        Ok(self.random.iter().find(|r| r.id == id).cloned())
    }

    async fn search(&self, term: &str) -> Result<Vec<Recipe>, BrowserError> {
        self.check()?;
        Ok(self.searches.get(term).cloned().unwrap_or_default())
    }

    async fn categories(&self) -> Result<Vec<Category>, BrowserError> {
        self.check()?;
        Ok(self.categories.clone())
    }

    async fn by_category(&self, category: &str) -> Result<Vec<Recipe>, BrowserError> {
        self.check()?;
        Ok(self
            .random
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect())
    }
}

async fn browser_with(source: FakeSource) -> RecipeBrowser {
    RecipeBrowser::builder().source(source).build().await.unwrap()
}

fn visible_ids(browser: &RecipeBrowser) -> Vec<String> {
    browser.visible().iter().map(|r| r.id.clone()).collect()
}

#[tokio::test]
async fn test_refresh_paginates_random_pool() {
    let mut browser = browser_with(FakeSource {
        random: numbered_recipes(17),
        ..Default::default()
    })
    .await;

    assert!(browser.refresh().await);
    assert_eq!(browser.pagination().total_pages(), 3);
    assert_eq!(browser.pagination().current_page(), 1);
    assert_eq!(browser.visible().len(), 8);
    assert_eq!(visible_ids(&browser)[0], "1");

    browser.go_to_page(2).unwrap();
    assert_eq!(visible_ids(&browser)[0], "9");

    browser.go_to_page(3).unwrap();
    assert_eq!(visible_ids(&browser), vec!["17"]);

    assert!(browser.go_to_page(4).is_err());
    assert_eq!(browser.pagination().current_page(), 3);
}

#[tokio::test]
async fn test_search_resets_to_first_page() {
    let mut searches = HashMap::new();
    searches.insert(
        "pie".to_string(),
        vec![recipe("p1", "Beef", &[]), recipe("p2", "Pork", &[])],
    );
    let mut browser = browser_with(FakeSource {
        random: numbered_recipes(20),
        searches,
        ..Default::default()
    })
    .await;

    browser.refresh().await;
    browser.go_to_page(3).unwrap();

    assert!(browser.search("  pie ").await);
    assert_eq!(browser.search_term(), "pie");
    assert_eq!(browser.pagination().current_page(), 1);
    assert_eq!(browser.pagination().total_pages(), 1);
    assert_eq!(visible_ids(&browser), vec!["p1", "p2"]);

    // empty term goes back to the random pool
    browser.search("").await;
    assert_eq!(browser.recipes().len(), 20);
}

#[tokio::test]
async fn test_search_without_results() {
    let mut browser = browser_with(FakeSource::default()).await;
    assert!(browser.search("nothing").await);
    assert!(browser.visible().is_empty());
    assert_eq!(browser.pagination().total_pages(), 1);
}

#[tokio::test]
async fn test_category_filter() {
    let mut random: Vec<Recipe> = (1..=10)
        .map(|i| recipe(&format!("d{}", i), "Dessert", &[]))
        .collect();
    random.extend((1..=5).map(|i| recipe(&format!("s{}", i), "Seafood", &[])));
    let mut browser = browser_with(FakeSource {
        random,
        ..Default::default()
    })
    .await;

    browser.refresh().await;
    assert_eq!(browser.pagination().total_pages(), 2);
    browser.next_page();
    assert_eq!(browser.pagination().current_page(), 2);

    browser.set_category(Some("Seafood".to_string()));
    assert_eq!(browser.category(), Some("Seafood"));
    assert_eq!(browser.pagination().current_page(), 1);
    assert_eq!(browser.pagination().total_pages(), 1);
    assert_eq!(browser.filtered().len(), 5);
    assert!(browser.visible().iter().all(|r| r.category == "Seafood"));

    browser.set_category(Some("seafood".to_string()));
    assert!(browser.filtered().is_empty());

    browser.set_category(None);
    assert_eq!(browser.filtered().len(), 15);
}

#[tokio::test]
async fn test_source_failures_become_empty_results() {
    let mut browser = browser_with(FakeSource::failing()).await;

    assert!(browser.refresh().await);
    assert!(browser.recipes().is_empty());
    assert_eq!(browser.pagination().total_pages(), 1);
    assert!(browser.load_categories().await.is_empty());
    assert!(browser.recipe("1").await.is_none());
    assert!(browser.category_recipes("Beef").await.is_empty());
}

#[tokio::test]
async fn test_load_categories() {
    let mut browser = browser_with(FakeSource {
        categories: vec![Category {
            id: "1".to_string(),
            name: "Beef".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    })
    .await;

    assert_eq!(browser.load_categories().await.len(), 1);
    assert_eq!(browser.categories()[0].name, "Beef");
}

#[tokio::test]
async fn test_categories_kept_after_dispose() {
    let source = Arc::new(FakeSource {
        categories: vec![Category {
            id: "1".to_string(),
            name: "Beef".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    });
    let mut browser = RecipeBrowser::builder()
        .shared_source(source.clone())
        .build()
        .await
        .unwrap();
    assert_eq!(browser.load_categories().await.len(), 1);

    browser.dispose();
    source.failing.store(true, Ordering::SeqCst);
    assert_eq!(browser.load_categories().await.len(), 1);
    assert_eq!(browser.categories()[0].name, "Beef");
}

#[tokio::test]
async fn test_stale_listing_is_not_applied() {
    let mut searches = HashMap::new();
    searches.insert("soup".to_string(), vec![recipe("soup", "Starter", &[])]);
    let mut browser = browser_with(FakeSource {
        random: numbered_recipes(3),
        searches,
        ..Default::default()
    })
    .await;

    let older = browser.listing_request();
    let newer = browser.listing_request();

    let newer_listing = newer.fetch().await;
    assert!(browser.apply_listing(newer_listing));

    let older_listing = older.fetch().await;
    assert_eq!(older_listing.recipes().len(), 3);
    assert!(!browser.apply_listing(older_listing));
    assert_eq!(browser.recipes().len(), 3);

    // a search issued while a refresh is in flight wins
    let in_flight = browser.listing_request();
    browser.search("soup").await;
    assert!(!browser.apply_listing(in_flight.fetch().await));
    assert_eq!(browser.recipes()[0].id, "soup");
}

#[tokio::test]
async fn test_listing_after_dispose_is_dropped() {
    let mut browser = browser_with(FakeSource {
        random: numbered_recipes(5),
        ..Default::default()
    })
    .await;

    let lifecycle = browser.lifecycle();
    let request = browser.listing_request();
    let pending = tokio::spawn(request.fetch());

    browser.dispose();
    assert!(!lifecycle.is_live());

    let listing = pending.await.unwrap();
    assert!(!browser.apply_listing(listing));
    assert!(browser.recipes().is_empty());
}

#[tokio::test]
async fn test_saved_page_restored_after_first_listing() {
    let store = Arc::new(MemorySlotStore::new());
    store.save(CURRENT_PAGE_KEY, "3").await.unwrap();

    let mut browser = RecipeBrowser::builder()
        .source(FakeSource {
            random: numbered_recipes(17),
            ..Default::default()
        })
        .shared_store(store.clone())
        .build()
        .await
        .unwrap();

    assert_eq!(browser.pagination().current_page(), 1);
    browser.refresh().await;
    assert_eq!(browser.pagination().current_page(), 3);
    assert_eq!(visible_ids(&browser), vec!["17"]);
}

#[tokio::test]
async fn test_saved_page_out_of_range_is_ignored() {
    let store = Arc::new(MemorySlotStore::new());
    store.save(CURRENT_PAGE_KEY, "9").await.unwrap();

    let mut browser = RecipeBrowser::builder()
        .source(FakeSource {
            random: numbered_recipes(40),
            ..Default::default()
        })
        .shared_store(store.clone())
        .build()
        .await
        .unwrap();

    browser.refresh().await;
    assert_eq!(browser.pagination().total_pages(), 5);
    assert_eq!(browser.pagination().current_page(), 1);
}

#[tokio::test]
async fn test_page_changes_are_persisted() {
    let store = Arc::new(MemorySlotStore::new());
    let mut browser = RecipeBrowser::builder()
        .source(FakeSource {
            random: numbered_recipes(30),
            ..Default::default()
        })
        .shared_store(store.clone())
        .storage_key("page")
        .build()
        .await
        .unwrap();

    browser.refresh().await;
    browser.go_to_page(4).unwrap();
    browser.previous_page();
    browser.shutdown().await;

    assert_eq!(store.load("page").await.unwrap().as_deref(), Some("3"));
    assert_eq!(store.load(CURRENT_PAGE_KEY).await.unwrap(), None);
}

/// One `browse --search pie --next` run against a shared store
async fn search_and_step_forward(store: &Arc<MemorySlotStore>) -> usize {
    let mut searches = HashMap::new();
    searches.insert("pie".to_string(), numbered_recipes(30));
    let mut browser = RecipeBrowser::builder()
        .source(FakeSource {
            searches,
            ..Default::default()
        })
        .shared_store(store.clone())
        .build()
        .await
        .unwrap();

    browser.search("pie").await;
    browser.resume_stored_page();
    browser.next_page();
    browser.shutdown().await;
    browser.pagination().current_page()
}

#[tokio::test]
async fn test_repeated_search_runs_advance_from_stored_page() {
    let store = Arc::new(MemorySlotStore::new());

    assert_eq!(search_and_step_forward(&store).await, 2);
    assert_eq!(search_and_step_forward(&store).await, 3);
    assert_eq!(search_and_step_forward(&store).await, 4);
    assert_eq!(search_and_step_forward(&store).await, 4);
    assert_eq!(
        store.load(CURRENT_PAGE_KEY).await.unwrap().as_deref(),
        Some("4")
    );
}

#[tokio::test]
async fn test_resume_stored_page_out_of_range() {
    let store = Arc::new(MemorySlotStore::new());
    store.save(CURRENT_PAGE_KEY, "9").await.unwrap();

    let mut searches = HashMap::new();
    searches.insert("pie".to_string(), numbered_recipes(30));
    let mut browser = RecipeBrowser::builder()
        .source(FakeSource {
            searches,
            ..Default::default()
        })
        .shared_store(store.clone())
        .build()
        .await
        .unwrap();

    assert_eq!(browser.stored_page(), Some(9));
    browser.search("pie").await;
    assert!(!browser.resume_stored_page());
    assert_eq!(browser.pagination().current_page(), 1);
}

#[tokio::test]
async fn test_selection_and_shopping_list() {
    let mut browser = browser_with(FakeSource {
        random: vec![
            recipe("1", "Dessert", &[("Цукор", "1 ст.л."), ("Борошно", "200 г")]),
            recipe("2", "Dessert", &[("ЦУКОР", "2 ст.л."), ("Яйця", "2")]),
            recipe("3", "Dessert", &[("Сіль", "дрібка")]),
        ],
        ..Default::default()
    })
    .await;
    browser.refresh().await;

    let first = browser.recipes()[0].clone();
    let second = browser.recipes()[1].clone();
    let third = browser.recipes()[2].clone();

    assert!(browser.toggle_selected(&first));
    assert!(browser.toggle_selected(&second));
    assert!(browser.toggle_selected(&third));
    assert!(!browser.toggle_selected(&third));
    assert_eq!(browser.selection().ids(), vec!["1", "2"]);

    assert_eq!(
        browser.shopping_list(),
        vec![
            Ingredient::new("Борошно", "200 г"),
            Ingredient::new("Цукор", "1 ст.л., 2 ст.л."),
            Ingredient::new("Яйця", "2"),
        ]
    );

    browser.selection_mut().clear();
    assert!(browser.shopping_list().is_empty());
}

#[tokio::test]
async fn test_builder_requires_source() {
    let result = RecipeBrowser::builder().build().await;
    match result {
        Err(BrowserError::BuilderError(message)) => assert!(message.contains("source")),
        _ => panic!("Expected builder error"),
    }
}

#[tokio::test]
async fn test_builder_rejects_zero_page_size() {
    let result = RecipeBrowser::builder()
        .source(FakeSource::default())
        .page_size(0)
        .build()
        .await;
    assert!(matches!(result, Err(BrowserError::BuilderError(_))));
}

#[tokio::test]
async fn test_builder_uses_config_page_size() {
    let config = recipe_browser::BrowserConfig::from_toml_str("[pagination]\npage_size = 5").unwrap();
    let mut browser = RecipeBrowser::builder()
        .source(FakeSource {
            random: numbered_recipes(11),
            ..Default::default()
        })
        .config(&config)
        .build()
        .await
        .unwrap();

    browser.refresh().await;
    assert_eq!(browser.page_size(), 5);
    assert_eq!(browser.pagination().total_pages(), 3);
}
