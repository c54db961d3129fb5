// src/infra/errors.rs — Error types for wayrank

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WayrankError {
    // Storage errors (always recovered by callers, never surfaced to navigation)
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Remote sink errors (degrade to local-only data)
    #[error("Remote sink error: {message}")]
    Remote { message: String, retriable: bool },

    #[error("Remote sink timed out after {timeout_ms}ms")]
    RemoteTimeout { timeout_ms: u64 },

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WayrankError {
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            WayrankError::Remote {
                retriable: true,
                ..
            } | WayrankError::RemoteTimeout { .. }
        )
    }
}

impl From<reqwest::Error> for WayrankError {
    fn from(e: reqwest::Error) -> Self {
        WayrankError::Remote {
            message: e.to_string(),
            retriable: e.is_timeout() || e.is_connect(),
        }
    }
}
