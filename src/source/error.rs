use thiserror::Error;

/// A value was present in a response but is not a usable coordinate.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("{field}: {value:?} is not a number")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field}: {value} is not a finite number")]
    NonFinite { field: &'static str, value: f64 },
    #[error("{field}: {value} is out of range")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("missing field: {0}")]
    Missing(&'static str),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("lookup rejected: {0}")]
    Rejected(String),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}
