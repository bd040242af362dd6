use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bookfinder_core::{BookRecord, Clock, SearchMode, SystemClock};
use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_TTL_SECS: i64 = 5 * 60;
pub const DEFAULT_CAPACITY: usize = 50;

/// Cache key: mode name plus lowercased query.
pub fn cache_key(mode: SearchMode, query: &str) -> String {
    format!("{}:{}", mode.as_str(), query.to_lowercase())
}

// ─── ResponseCache ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: Vec<BookRecord>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Keys in first-insertion order; the front is evicted first.
    order: VecDeque<String>,
}

/// In-memory memo of finished searches.
///
/// Entries are fresh for `ttl` after they were written and are dropped when a
/// read finds them stale. When an insert pushes the size past `capacity`, the
/// earliest-inserted key is evicted. Reads never change eviction order.
pub struct ResponseCache {
    state: Mutex<CacheState>,
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self::with_clock(ttl, capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            ttl,
            capacity,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, mode: SearchMode, query: &str) -> Option<Vec<BookRecord>> {
        let key = cache_key(mode, query);
        let now = self.clock.now();
        let mut state = self.lock();

        let entry = state.entries.get(&key)?;
        if now - entry.timestamp < self.ttl {
            tracing::debug!(%key, "cache hit");
            return Some(entry.data.clone());
        }

        tracing::debug!(%key, "cache entry stale");
        state.entries.remove(&key);
        state.order.retain(|k| k != &key);
        None
    }

    /// Store `data`. Overwriting a live key keeps its eviction position.
    pub fn put(&self, mode: SearchMode, query: &str, data: Vec<BookRecord>) {
        let key = cache_key(mode, query);
        let entry = CacheEntry {
            data,
            timestamp: self.clock.now(),
        };
        let mut state = self.lock();

        if state.entries.insert(key.clone(), entry).is_none() {
            state.order.push_back(key);
        }

        if state.entries.len() > self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                state.entries.remove(&oldest);
                tracing::debug!(key = %oldest, "cache evicted");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored keys, oldest insertion first. Diagnostic only.
    pub fn keys(&self) -> Vec<String> {
        self.lock().order.iter().cloned().collect()
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.order.clear();
        tracing::debug!("cache cleared");
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS), DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use bookfinder_core::ManualClock;
    use bookfinder_core::normalize_record;
    use serde_json::json;

    use super::*;

    fn books(title: &str) -> Vec<BookRecord> {
        vec![normalize_record(&json!({ "key": "/works/OL1W", "title": title }), 2025)]
    }

    fn cache_with_clock() -> (ResponseCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = ResponseCache::with_clock(
            Duration::seconds(DEFAULT_TTL_SECS),
            DEFAULT_CAPACITY,
            clock.clone(),
        );
        (cache, clock)
    }

    #[test]
    fn test_key_format() {
        assert_eq!(cache_key(SearchMode::Title, "Dune MESSIAH"), "title:dune messiah");
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let (cache, _) = cache_with_clock();
        cache.put(SearchMode::General, "Rust", books("The Rust Book"));
        assert!(cache.get(SearchMode::General, "rUsT").is_some());
    }

    #[test]
    fn test_mode_is_part_of_key() {
        let (cache, _) = cache_with_clock();
        cache.put(SearchMode::General, "tolkien", books("A"));
        assert!(cache.get(SearchMode::Author, "tolkien").is_none());
    }

    #[test]
    fn test_freshness_window() {
        let (cache, clock) = cache_with_clock();
        cache.put(SearchMode::General, "rust", books("A"));

        clock.advance(Duration::seconds(DEFAULT_TTL_SECS - 1));
        assert!(cache.get(SearchMode::General, "rust").is_some());

        clock.advance(Duration::seconds(1));
        assert!(cache.get(SearchMode::General, "rust").is_none());
        assert!(cache.is_empty(), "stale entry is dropped on read");
    }

    #[test]
    fn test_eviction_drops_earliest_inserted() {
        let (cache, _) = cache_with_clock();
        for i in 0..DEFAULT_CAPACITY {
            cache.put(SearchMode::General, &format!("q{i}"), books("A"));
        }
        assert_eq!(cache.len(), DEFAULT_CAPACITY);

        cache.put(SearchMode::General, "q50", books("A"));
        assert_eq!(cache.len(), DEFAULT_CAPACITY);

        let keys = cache.keys();
        assert!(!keys.contains(&"general:q0".to_string()));
        assert_eq!(keys.first().map(String::as_str), Some("general:q1"));
        assert_eq!(keys.last().map(String::as_str), Some("general:q50"));
    }

    #[test]
    fn test_reads_do_not_refresh_position() {
        let (cache, _) = cache_with_clock();
        for i in 0..DEFAULT_CAPACITY {
            cache.put(SearchMode::General, &format!("q{i}"), books("A"));
        }
        assert!(cache.get(SearchMode::General, "q0").is_some());

        cache.put(SearchMode::General, "new", books("A"));
        assert!(cache.get(SearchMode::General, "q0").is_none());
        assert!(cache.get(SearchMode::General, "q1").is_some());
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let (cache, _) = cache_with_clock();
        cache.put(SearchMode::General, "a", books("First"));
        cache.put(SearchMode::General, "b", books("B"));
        cache.put(SearchMode::General, "A", books("Second"));

        assert_eq!(cache.keys(), vec!["general:a", "general:b"]);
        let hit = cache.get(SearchMode::General, "a").unwrap();
        assert_eq!(hit[0].title, "Second");
    }

    #[test]
    fn test_overwrite_refreshes_timestamp() {
        let (cache, clock) = cache_with_clock();
        cache.put(SearchMode::General, "a", books("A"));
        clock.advance(Duration::seconds(DEFAULT_TTL_SECS - 10));
        cache.put(SearchMode::General, "a", books("A"));
        clock.advance(Duration::seconds(20));
        assert!(cache.get(SearchMode::General, "a").is_some());
    }

    #[test]
    fn test_clear() {
        let (cache, _) = cache_with_clock();
        cache.put(SearchMode::General, "a", books("A"));
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.keys().is_empty());
    }
}
