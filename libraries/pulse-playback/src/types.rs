//! Core types for playback management

use pulse_core::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback state
///
/// `Failed` is always recoverable by loading another track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track loaded
    Idle,

    /// Resource created, waiting for media to load
    Loading,

    /// Loaded and paused at the start
    Ready,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Track reached its natural end
    Ended,

    /// Resource reported an error and was released
    Failed,
}

/// Configuration for the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    pub volume: f32,

    /// Pulse tempo when a track has no known BPM (default: 120)
    pub default_bpm: u32,

    /// Progress poll cadence in milliseconds (default: 250)
    pub progress_poll_ms: u64,

    /// Play the next queued track when one ends (default: true)
    pub auto_advance: bool,
}

impl PlaybackConfig {
    pub fn progress_poll_interval(&self) -> Duration {
        Duration::from_millis(self.progress_poll_ms.max(1))
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            default_bpm: 120,
            progress_poll_ms: 250,
            auto_advance: true,
        }
    }
}

/// Serializable view of the live playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub state: PlaybackState,
    pub current_track: Option<Track>,
    pub queue: Vec<Track>,
    pub is_playing: bool,
    pub progress_seconds: f64,
    pub duration_seconds: f64,
    pub volume: f32,
    pub is_muted: bool,
    /// Volume restored on unmute, present only while muted
    pub pre_mute_volume: Option<f32>,
    pub bpm: Option<u32>,
}
