//! Open Library search for BookFinder: transport, response cache, search service.

pub mod cache;
pub mod error;
pub mod http;
pub mod service;

pub use cache::{ResponseCache, cache_key};
pub use error::{Result, SearchError};
pub use http::{HttpTransport, Transport};
pub use service::{RESULT_CAP, SearchService};
