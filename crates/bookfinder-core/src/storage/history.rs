use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{SearchHistoryItem, SearchMode};

/// Number of searches kept by default.
pub const DEFAULT_MAX_ITEMS: usize = 10;

/// Recently run searches, newest first, plus a lifetime search counter.
/// Stored as a single pretty-printed JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistory {
    #[serde(default)]
    pub items: Vec<SearchHistoryItem>,

    #[serde(default)]
    pub total_searches: u64,
}

impl SearchHistory {
    /// Record a successful search. An earlier entry for the same search moves
    /// to the front instead of appearing twice.
    pub fn record(
        &mut self,
        query: &str,
        mode: SearchMode,
        result_count: usize,
        at: DateTime<Utc>,
        max_items: usize,
    ) {
        self.items.retain(|item| !item.same_search(query, mode));
        self.items.insert(
            0,
            SearchHistoryItem {
                query: query.to_string(),
                mode,
                timestamp: at,
                result_count,
            },
        );
        self.items.truncate(max_items);
        self.total_searches += 1;
    }

    pub fn recent(&self, n: usize) -> &[SearchHistoryItem] {
        &self.items[..n.min(self.items.len())]
    }

    /// Forget the listed searches. The lifetime counter is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Load history from `path`; a missing file is an empty history.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let history: Self = serde_json::from_str(&contents)?;
        Ok(history)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        tracing::debug!(path = %path.display(), items = self.items.len(), "saved search history");
        Ok(())
    }
}
