use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the domain, storage and configuration layers.
#[derive(Debug, Error)]
pub enum KaraError {
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, KaraError>;

impl From<std::io::Error> for KaraError {
    fn from(err: std::io::Error) -> Self {
        KaraError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for KaraError {
    fn from(err: serde_json::Error) -> Self {
        KaraError::Storage(err.to_string())
    }
}
