use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "recipe-browser")]
#[command(about = "Browse TheMealDB recipes and build a shopping list", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse a page of recipes (random pool, or search results)
    #[command(alias = "ls")]
    Browse {
        /// Search recipes by name
        #[arg(short, long)]
        search: Option<String>,

        /// Only show recipes of this category
        #[arg(short, long)]
        category: Option<String>,

        /// Page to show (clamped to the available pages)
        #[arg(short, long, conflicts_with_all = ["next", "prev"])]
        page: Option<usize>,

        /// Go to the page after the saved one
        #[arg(long, conflicts_with = "prev")]
        next: bool,

        /// Go to the page before the saved one
        #[arg(long)]
        prev: bool,
    },

    /// Show one recipe with its ingredients
    Show {
        /// Recipe id
        id: String,
    },

    /// List recipe categories
    Categories,

    /// List every recipe of a category
    Category {
        /// Category name (e.g. Seafood)
        name: String,
    },

    /// Select recipes and print their combined ingredient list
    Plan {
        /// Recipe ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
}
