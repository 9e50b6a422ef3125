// Herdwatch Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HerdwatchError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid detection record: {0}")]
    InvalidDetection(String),

    #[error("Invalid video filename: {0}")]
    InvalidFilename(String),

    #[error("Event sink error: {0}")]
    Sink(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for HerdwatchError {
    fn from(err: anyhow::Error) -> Self {
        HerdwatchError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HerdwatchError>;
