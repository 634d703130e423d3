/// Shared application state
use crate::config::AudioFormat;
use pulse_core::TrackStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TrackStore>,
    pub content_type: &'static str,
}

impl AppState {
    /// State serving MP3 payloads
    pub fn new(store: Arc<dyn TrackStore>) -> Self {
        Self::with_format(store, AudioFormat::Mp3)
    }

    pub fn with_format(store: Arc<dyn TrackStore>, format: AudioFormat) -> Self {
        Self {
            store,
            content_type: format.mime_type(),
        }
    }
}
