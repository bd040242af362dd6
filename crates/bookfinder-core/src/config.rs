use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::derive::{FilterKey, SortKey};
use crate::error::{BookfinderError, Result};
use crate::storage::history::DEFAULT_MAX_ITEMS;

/// Root application configuration, loaded from `~/.config/bookfinder/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub history: HistoryConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search API host; `/search.json` is appended.
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Freshness window of cached result lists.
    pub cache_ttl_secs: u64,
    /// Maximum number of cached (mode, query) lists.
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub path: String,
    pub max_items: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub default_sort: SortKey,
    pub default_filter: FilterKey,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org".to_string(),
            user_agent: concat!("bookfinder/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 15,
            cache_ttl_secs: 5 * 60,
            cache_capacity: 50,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("bookfinder");

        Self {
            path: data_dir.join("history.json").to_string_lossy().to_string(),
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_sort: SortKey::Relevance,
            default_filter: FilterKey::All,
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/bookfinder/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("BOOKFINDER_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("bookfinder")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the search pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.search.base_url.trim().is_empty() {
            return Err(BookfinderError::ConfigError("search.base_url is empty".to_string()));
        }
        if self.search.cache_capacity == 0 {
            return Err(BookfinderError::ConfigError(
                "search.cache_capacity must be at least 1".to_string(),
            ));
        }
        if self.history.max_items == 0 {
            return Err(BookfinderError::ConfigError(
                "history.max_items must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn history_path(&self) -> PathBuf {
        PathBuf::from(&self.history.path)
    }
}
