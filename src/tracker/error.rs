use thiserror::Error;

use crate::source::FetchError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}
