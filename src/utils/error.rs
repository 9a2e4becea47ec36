//! Error type for the fallible edges of the hub.
//!
//! Routing itself never fails: an offline recipient or an empty room is the
//! normal case. Errors only come from the durable notification store, the
//! configuration layer, and binding the listener.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HubError {
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking storage task was cancelled or panicked.
    #[error("background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for HubError {
    fn from(err: tokio::task::JoinError) -> Self {
        HubError::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HubError>;
