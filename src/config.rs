use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;

/// Main browser configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct BrowserConfig {
    /// Recipe source (TheMealDB) settings
    #[serde(default)]
    pub source: SourceConfig,
    /// Listing pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Where the durable slot lives
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Configuration for the HTTP recipe source
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// Base URL of the API, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Number of `random.php` calls issued to seed the browsing pool
    #[serde(default = "default_random_batch_size")]
    pub random_batch_size: usize,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            random_batch_size: default_random_batch_size(),
            user_agent: default_user_agent(),
        }
    }
}

/// Configuration for listing pagination
#[derive(Debug, Deserialize, Clone)]
pub struct PaginationConfig {
    /// Recipes per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Key of the durable slot holding the current page
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            storage_key: default_storage_key(),
        }
    }
}

/// Configuration for the durable slot store
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// Directory for slot files; the platform data dir is used when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

// Default value functions
fn default_base_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_random_batch_size() -> usize {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; RecipeBrowser/0.1)".to_string()
}

fn default_page_size() -> usize {
    crate::pagination::DEFAULT_PAGE_SIZE
}

fn default_storage_key() -> String {
    crate::pagination::CURRENT_PAGE_KEY.to_string()
}

impl BrowserConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_BROWSER__ prefix
    /// 2. recipe-browser.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_BROWSER__SOURCE__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Parse configuration from a TOML string, ignoring the environment
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

/// Load configuration from file and environment variables
///
/// See [`BrowserConfig::load`] for the precedence rules.
pub fn load_config() -> Result<BrowserConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-browser").required(false))
        // Use double underscore for nested: RECIPE_BROWSER__SOURCE__TIMEOUT_SECS
        .add_source(
            Environment::with_prefix("RECIPE_BROWSER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
