/// Collaborator traits consumed by the playback core and the audio server
use crate::error::Result;
use crate::types::{DecodedAudio, TrackBytes, TrackId};
use async_trait::async_trait;
use bytes::Bytes;

/// Byte store holding the binary payload of each track
///
/// Implementers return `Ok(None)` when the track or its payload is absent and
/// reserve `Err` for unexpected read failures.
#[async_trait]
pub trait TrackStore: Send + Sync {
    /// Fetch the full payload of a track
    ///
    /// # Errors
    /// Returns an error if the store fails while reading the payload
    async fn get_track_bytes(&self, id: &TrackId) -> Result<Option<TrackBytes>>;
}

/// Audio decoder trait
///
/// Decodes a complete in-memory payload into normalized samples.
pub trait AudioDecoder: Send + Sync {
    /// Decode audio bytes, keeping the first channel
    ///
    /// # Errors
    /// Returns an error if the container or codec cannot be decoded
    fn decode(&self, audio_bytes: &[u8]) -> Result<DecodedAudio>;
}

/// Fetches the bytes behind an audio locator
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Download the complete payload at `url`
    ///
    /// # Errors
    /// Returns an error if the request fails or the server answers with a
    /// non-success status
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}

/// Best-effort tempo estimation for a track's audio
///
/// Infallible by contract: implementers recover every failure to a fallback
/// tempo, since tempo only drives cosmetic beat pulses.
#[async_trait]
pub trait TempoEstimator: Send + Sync {
    /// Estimate beats per minute of the audio at `source_url`
    async fn estimate_bpm(&self, source_url: &str) -> u32;
}
