use thiserror::Error;

use crate::readme::Region;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    #[error("network error talking to GitHub: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GitHub API request failed: {0}")]
    Upstream(String),

    #[error("failed to decode GitHub response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0} not found in document")]
    PatternMissing(Region),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StatsError>;
