use std::sync::Arc;
use std::time::Duration as StdDuration;

use bookfinder_core::{BookRecord, Clock, SearchConfig, SearchMode, SystemClock, normalize_record};
use chrono::Duration;
use reqwest::Url;
use serde_json::Value;

use crate::cache::ResponseCache;
use crate::error::{Result, SearchError};
use crate::http::{HttpTransport, Transport};

const SEARCH_PATH: &str = "search.json";

/// Longest accepted freshness window (one year).
const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Number of documents requested from the endpoint.
pub const FETCH_LIMIT: usize = 24;
/// Number of usable records returned to the caller.
pub const RESULT_CAP: usize = 20;

/// Projection sent as `fields=`; everything the normalizer and scorer read.
pub const FIELDS: [&str; 12] = [
    "key",
    "title",
    "author_name",
    "first_publish_year",
    "cover_i",
    "subject",
    "first_sentence",
    "edition_count",
    "ebook_access",
    "has_fulltext",
    "isbn",
    "publisher",
];

/// Runs book searches against the Open Library search endpoint.
///
/// Finished result lists are memoized in a shared [`ResponseCache`]. Two
/// overlapping calls for the same search are not merged: both reach the
/// transport and the later one to finish owns the cache entry.
pub struct SearchService<T: Transport = HttpTransport> {
    transport: T,
    cache: Arc<ResponseCache>,
    clock: Arc<dyn Clock>,
    base_url: String,
}

impl SearchService<HttpTransport> {
    /// Build the HTTP-backed service described by `config`.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let transport = HttpTransport::new(
            &config.user_agent,
            StdDuration::from_secs(config.timeout_secs),
        )?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let ttl = Duration::seconds(config.cache_ttl_secs.min(MAX_TTL_SECS) as i64);
        let cache = Arc::new(ResponseCache::with_clock(
            ttl,
            config.cache_capacity,
            clock.clone(),
        ));
        Ok(Self::with_clock(transport, cache, &config.base_url, clock))
    }
}

impl<T: Transport> SearchService<T> {
    pub fn new(transport: T, cache: Arc<ResponseCache>, base_url: &str) -> Self {
        Self::with_clock(transport, cache, base_url, Arc::new(SystemClock))
    }

    pub fn with_clock(
        transport: T,
        cache: Arc<ResponseCache>,
        base_url: &str,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transport,
            cache,
            clock,
            base_url: base_url.to_string(),
        }
    }

    /// Request URL for a search; the query text is percent-encoded.
    pub fn search_url(&self, query: &str, mode: SearchMode) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| SearchError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        {
            let mut segs = url.path_segments_mut().map_err(|_| SearchError::InvalidUrl {
                url: self.base_url.clone(),
                reason: "cannot be a base".to_string(),
            })?;
            segs.pop_if_empty();
            segs.push(SEARCH_PATH);
        }
        url.query_pairs_mut()
            .append_pair(mode.query_param(), query)
            .append_pair("limit", &FETCH_LIMIT.to_string())
            .append_pair("fields", &FIELDS.join(","));
        Ok(url)
    }

    /// Search for `query` in `mode`.
    ///
    /// A fresh cached list is returned without touching the network. On a
    /// miss the documents are normalized, title-less ones dropped, and the
    /// first [`RESULT_CAP`] cached and returned. Failures are not cached.
    pub async fn search(&self, query: &str, mode: SearchMode) -> Result<Vec<BookRecord>> {
        if let Some(cached) = self.cache.get(mode, query) {
            return Ok(cached);
        }

        let url = self.search_url(query, mode)?;
        let body = self.transport.get_json(&url).await.inspect_err(|e| {
            tracing::warn!(%mode, query, error = %e, "search request failed");
        })?;

        let books = self.collect_books(&body)?;
        self.cache.put(mode, query, books.clone());
        tracing::info!(%mode, query, count = books.len(), "search completed");
        Ok(books)
    }

    fn collect_books(&self, body: &Value) -> Result<Vec<BookRecord>> {
        let docs = body.get("docs").and_then(Value::as_array).ok_or_else(|| {
            tracing::warn!("search response has no docs array");
            SearchError::Format("missing `docs` array".to_string())
        })?;

        let current_year = self.clock.current_year();
        Ok(docs
            .iter()
            .map(|doc| normalize_record(doc, current_year))
            .filter(BookRecord::has_known_title)
            .take(RESULT_CAP)
            .collect())
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_keys(&self) -> Vec<String> {
        self.cache.keys()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
