/// Core error types for Pulse Player
use crate::types::TrackId;
use thiserror::Error;

/// Result type alias using `PulseError`
pub type Result<T> = std::result::Result<T, PulseError>;

/// Core error type shared by the collaborator traits
#[derive(Error, Debug)]
pub enum PulseError {
    /// Track (or its binary payload) is absent
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Byte store failed while reading a payload
    #[error("Storage error: {0}")]
    Storage(String),

    /// Audio bytes could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Audio bytes could not be fetched
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PulseError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
