use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::SearchMode;

/// One completed search, echoed back to the user as a quick re-run shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryItem {
    pub query: String,
    #[serde(rename = "searchType")]
    pub mode: SearchMode,
    pub timestamp: DateTime<Utc>,
    pub result_count: usize,
}

impl SearchHistoryItem {
    /// Same logical search: equal mode and case-insensitively equal query.
    pub fn same_search(&self, query: &str, mode: SearchMode) -> bool {
        self.mode == mode && self.query.to_lowercase() == query.to_lowercase()
    }
}
