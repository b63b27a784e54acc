use thiserror::Error;

/// Errors that can occur while talking to the recipe source or managing browser state
#[derive(Error, Debug)]
pub enum BrowserError {
    /// Failed to reach the recipe source
    #[error("Failed to fetch from recipe source: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The recipe source answered with a non-success status
    #[error("Recipe source returned status {status} for {url}")]
    StatusError { status: u16, url: String },

    /// A response body or output value was not valid JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Reading or writing the durable slot failed
    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    /// Requested page lies outside 1..=total_pages
    #[error("Page {page} is out of range (1..={total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
