//! Pulse Player Core
//!
//! Platform-agnostic types, collaborator traits and error handling shared by
//! the playback engine, the tempo analyzer and the audio server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `TrackBytes`, `DecodedAudio`
//! - **Collaborator Traits**: `TrackStore`, `AudioDecoder`, `AudioFetcher`, `TempoEstimator`
//! - **Error Handling**: unified `PulseError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use pulse_core::{CatalogTrack, Track};
//!
//! let raw: CatalogTrack = serde_json::from_str(
//!     r#"{"id": "t1", "title": "Song", "url": null, "artists": "[\"A\", \"B\"]", "tags": "live"}"#,
//! ).unwrap();
//!
//! let track = Track::from(raw);
//! assert_eq!(track.artists, vec!["A", "B"]);
//! assert_eq!(track.source_url, "/tracks/t1/audio");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod store;
pub mod traits;
pub mod types;

pub use error::{PulseError, Result};
pub use store::MemoryTrackStore;
pub use traits::{AudioDecoder, AudioFetcher, TempoEstimator, TrackStore};
pub use types::{audio_path, CatalogTrack, DecodedAudio, Track, TrackBytes, TrackId};
