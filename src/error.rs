//! Error types for hush.

use std::io;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for hush operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in hush operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before any mutation (duration, mood, goal, option key).
    #[error("Invalid input: {0}")]
    Validation(String),

    /// No session record has the given id.
    #[error("Session not found: {0}")]
    NotFound(Uuid),

    /// Durable storage I/O failure.
    #[error("Storage error: {0}")]
    Persistence(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation not valid in the current lifecycle state.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    /// Whether this failure came from the durable storage layer.
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Serde(_))
    }
}
