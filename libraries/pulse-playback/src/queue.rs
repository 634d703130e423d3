//! Play queue
//!
//! Insertion order is playback order. Navigation is relative to a track's
//! identity, not to a stored cursor, so replacing the queue never leaves a
//! dangling index behind.

use pulse_core::{Track, TrackId};

/// Ordered list of tracks with circular navigation
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<Track>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all tracks
    pub fn set(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Index of the first track with this identity
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    /// Track after `id`, wrapping to the first
    ///
    /// `None` if the queue is empty or `id` is not queued.
    pub fn next_after(&self, id: &TrackId) -> Option<&Track> {
        let index = self.position_of(id)?;
        self.tracks.get((index + 1) % self.tracks.len())
    }

    /// Track before `id`, wrapping to the last
    pub fn previous_before(&self, id: &TrackId) -> Option<&Track> {
        let index = self.position_of(id)?;
        let len = self.tracks.len();
        self.tracks.get((index + len - 1) % len)
    }

    /// Write a computed tempo into every queued copy of a track
    pub fn update_bpm(&mut self, id: &TrackId, bpm: u32) {
        for track in self.tracks.iter_mut().filter(|t| &t.id == id) {
            track.bpm = Some(bpm);
        }
    }
}
