use thiserror::Error;

/// Unified error type for the tikd-feed application.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not extract a TikTok video id from: {0}")]
    InvalidUrl(String),
    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),
    #[error("Provide at least one non-empty --term to search for.")]
    NoSearchTerms,
    #[error("--count must be greater than zero.")]
    InvalidCount,
    #[error("Search for '{term}' failed with status {status}.")]
    SearchStatus {
        term: String,
        status: reqwest::StatusCode,
    },
    #[error("Invalid value for the {0} header.")]
    InvalidHeader(&'static str),
    #[error("Invalid search endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error(transparent)]
    Template(#[from] tera::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    #[error(transparent)]
    Parsing(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
