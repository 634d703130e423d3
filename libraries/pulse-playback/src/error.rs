//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// The audio resource failed to open, load or play
    #[error("Audio resource error: {0}")]
    Resource(String),
}

impl PlaybackError {
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
