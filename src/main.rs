use clap::Parser;
use log::warn;
use recipe_browser::{
    BrowserConfig, BrowserError, FileSlotStore, Ingredient, MealDbClient, MemorySlotStore,
    PageLink, Recipe, RecipeBrowser, RecipeSource, SlotStore,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

mod args;
use args::{Cli, Commands};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct BrowseArgs {
    search: Option<String>,
    category: Option<String>,
    page: Option<usize>,
    next: bool,
    prev: bool,
}

async fn run() -> Result<(), BrowserError> {
    let cli = Cli::parse();
    let config = BrowserConfig::load()?;

    let source: Arc<dyn RecipeSource> = Arc::new(MealDbClient::new(&config.source)?);
    let store = open_store(&config);
    let mut browser = RecipeBrowser::builder()
        .shared_source(source)
        .shared_store(store)
        .config(&config)
        .build()
        .await?;

    let json = cli.json;
    let result = match cli.command {
        Some(Commands::Browse {
            search,
            category,
            page,
            next,
            prev,
        }) => {
            let args = BrowseArgs {
                search,
                category,
                page,
                next,
                prev,
            };
            handle_browse(&mut browser, args, json).await
        }
        Some(Commands::Show { id }) => handle_show(&browser, &id, json).await,
        Some(Commands::Categories) => handle_categories(&mut browser, json).await,
        Some(Commands::Category { name }) => handle_category(&browser, &name, json).await,
        Some(Commands::Plan { ids }) => handle_plan(&mut browser, &ids, json).await,
        None => {
            let args = BrowseArgs {
                search: None,
                category: None,
                page: None,
                next: false,
                prev: false,
            };
            handle_browse(&mut browser, args, json).await
        }
    };

    browser.shutdown().await;
    result
}

fn open_store(config: &BrowserConfig) -> Arc<dyn SlotStore> {
    if let Some(dir) = &config.storage.dir {
        return Arc::new(FileSlotStore::new(dir));
    }
    match FileSlotStore::default_location() {
        Some(store) => Arc::new(store),
        None => {
            warn!("No data directory available, the current page will not be remembered");
            Arc::new(MemorySlotStore::new())
        }
    }
}

async fn handle_browse(
    browser: &mut RecipeBrowser,
    args: BrowseArgs,
    json: bool,
) -> Result<(), BrowserError> {
    match args.search.as_deref() {
        Some(term) => browser.search(term).await,
        None => browser.refresh().await,
    };
    if args.category.is_some() {
        browser.set_category(args.category);
    }
    // --next and --prev step from the page of the previous run
    browser.resume_stored_page();

    if let Some(page) = args.page {
        let page = page.clamp(1, browser.pagination().total_pages());
        browser.go_to_page(page)?;
    } else if args.next {
        browser.next_page();
    } else if args.prev {
        browser.previous_page();
    }

    let visible = browser.visible();
    let pagination = browser.pagination();

    if json {
        return print_json(&json!({
            "page": pagination.current_page(),
            "total_pages": pagination.total_pages(),
            "total_recipes": browser.filtered().len(),
            "recipes": visible,
        }));
    }

    if visible.is_empty() {
        if browser.search_term().is_empty() {
            println!("No recipes found");
        } else {
            println!("No recipes found for \"{}\"", browser.search_term());
        }
        return Ok(());
    }

    for recipe in &visible {
        print_summary(recipe);
    }
    println!();
    println!(
        "Page {}/{} ({} recipes)",
        pagination.current_page(),
        pagination.total_pages(),
        browser.filtered().len()
    );
    if pagination.total_pages() > 1 {
        println!("{}", format_links(&pagination.links(), pagination.current_page()));
    }
    Ok(())
}

async fn handle_show(browser: &RecipeBrowser, id: &str, json: bool) -> Result<(), BrowserError> {
    let Some(recipe) = browser.recipe(id).await else {
        println!("Recipe {} not found", id);
        return Ok(());
    };

    if json {
        return print_json(&recipe);
    }

    println!("{}", recipe.title);
    println!("{} · {}", recipe.category, recipe.area);
    let tags = recipe.tag_list();
    if !tags.is_empty() {
        println!("Tags: {}", tags.join(", "));
    }
    println!();
    print_ingredients("Ingredients", &recipe.ingredients);
    println!();
    println!("{}", recipe.instructions.trim());
    if !recipe.video_url.is_empty() {
        println!();
        println!("Video: {}", recipe.video_url);
    }
    Ok(())
}

async fn handle_categories(browser: &mut RecipeBrowser, json: bool) -> Result<(), BrowserError> {
    let categories = browser.load_categories().await;

    if json {
        return print_json(&categories);
    }
    if categories.is_empty() {
        println!("No categories found");
    }
    for category in categories {
        println!("{}", category.name);
    }
    Ok(())
}

async fn handle_category(
    browser: &RecipeBrowser,
    name: &str,
    json: bool,
) -> Result<(), BrowserError> {
    let recipes = browser.category_recipes(name).await;

    if json {
        return print_json(&recipes);
    }
    if recipes.is_empty() {
        println!("No recipes found in category \"{}\"", name);
    }
    for recipe in &recipes {
        print_summary(recipe);
    }
    Ok(())
}

async fn handle_plan(
    browser: &mut RecipeBrowser,
    ids: &[String],
    json: bool,
) -> Result<(), BrowserError> {
    for id in ids {
        match browser.recipe(id).await {
            Some(recipe) => {
                browser.selection_mut().add(recipe);
            }
            None => eprintln!("Skipping unknown recipe {}", id),
        }
    }

    let shopping_list = browser.shopping_list();
    if json {
        return print_json(&json!({
            "recipes": browser.selection().recipes(),
            "ingredients": shopping_list,
        }));
    }

    if browser.selection().is_empty() {
        println!("No recipes selected");
        return Ok(());
    }
    println!("Selected recipes:");
    for recipe in browser.selection() {
        print_summary(recipe);
    }
    println!();
    print_ingredients("Shopping list", &shopping_list);
    Ok(())
}

fn print_summary(recipe: &Recipe) {
    println!(
        "{:>6}  {}  [{}, {}]",
        recipe.id, recipe.title, recipe.category, recipe.area
    );
}

fn print_ingredients(title: &str, ingredients: &[Ingredient]) {
    println!("{}:", title);
    for ingredient in ingredients {
        if ingredient.measure.trim().is_empty() {
            println!("  - {}", ingredient.name);
        } else {
            println!("  - {}: {}", ingredient.name, ingredient.measure);
        }
    }
}

fn format_links(links: &[PageLink], current: usize) -> String {
    links
        .iter()
        .map(|link| match link {
            PageLink::Page(page) if *page == current => format!("[{}]", page),
            PageLink::Page(page) => page.to_string(),
            PageLink::Gap => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), BrowserError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
