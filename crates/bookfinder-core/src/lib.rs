pub mod clock;
pub mod config;
pub mod derive;
pub mod error;
pub mod models;
pub mod normalize;
pub mod relevance;
pub mod stats;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, HistoryConfig, SearchConfig, UiConfig};
pub use derive::{FilterKey, SortKey, derive};
pub use error::{BookfinderError, ExitCode, Result};
pub use models::*;
pub use normalize::normalize_record;
pub use relevance::academic_relevance;
pub use stats::ResultStats;
pub use storage::SearchHistory;
