use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Network failure before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("HTTP error! status: {status} ({url})")]
    Status { url: String, status: u16 },

    /// The body could not be decoded as JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// Decoded body without a `docs` array.
    #[error("Invalid response format from Open Library API: {0}")]
    Format(String),

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl SearchError {
    /// The request did not yield a usable body: network, status or decode
    /// failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. } | Self::Parse(_))
    }

    /// The body arrived but does not have the expected shape.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
