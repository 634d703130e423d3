//! Playback Events
//!
//! Two directions of traffic:
//! - [`PlaybackEvent`]: outward, drained by the UI layer
//! - [`EngineMessage`]: inward, posted by audio resources and background
//!   tasks to the engine's channel
//!
//! Every inward message names the [`ResourceId`] it originated from, so the
//! engine can drop messages from resources it has already torn down.

use crate::resource::ResourceId;
use crate::types::PlaybackState;
use pulse_core::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A different track became current
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Position update (periodic while playing, and after seeks)
    PositionUpdate {
        position_seconds: f64,
        duration_seconds: f64,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// Chosen volume level (0.0-1.0)
        volume: f32,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Queue replaced
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Tempo analysis finished for the current track
    TempoDetected { track_id: TrackId, bpm: u32 },

    /// Error occurred during playback
    Error {
        /// Error message
        message: String,
    },
}

/// Lifecycle notifications from an audio resource
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEvent {
    /// Media metadata is available
    Loaded { duration: Duration },

    /// Playback actually started
    Playing,

    /// Playback actually paused
    Paused,

    /// Reached the natural end of the media
    Ended,

    /// Load, decode or network failure
    Error { message: String },
}

/// Messages delivered to the engine's channel
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    /// Event raised by an audio resource
    Resource {
        resource: ResourceId,
        event: ResourceEvent,
    },

    /// Background tempo analysis finished
    TempoAnalyzed {
        resource: ResourceId,
        track_id: TrackId,
        bpm: u32,
    },

    /// Progress poll tick
    ProgressTick { resource: ResourceId },
}

impl EngineMessage {
    /// Resource this message originated from
    pub fn resource(&self) -> ResourceId {
        match self {
            Self::Resource { resource, .. }
            | Self::TempoAnalyzed { resource, .. }
            | Self::ProgressTick { resource } => *resource,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_event_serializes_tagged() {
        let event = PlaybackEvent::TempoDetected {
            track_id: "t1".into(),
            bpm: 128,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "tempoDetected");
        assert_eq!(json["bpm"], 128);
    }

    #[test]
    fn message_reports_origin() {
        let id = ResourceId::new(7);
        let msg = EngineMessage::ProgressTick { resource: id };
        assert_eq!(msg.resource(), id);

        let msg = EngineMessage::Resource {
            resource: id,
            event: ResourceEvent::Ended,
        };
        assert_eq!(msg.resource(), id);
    }
}
