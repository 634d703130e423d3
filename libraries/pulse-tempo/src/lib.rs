//! Pulse Player Tempo
//!
//! Coarse, deterministic tempo estimation for beat-synchronized visuals.
//!
//! This crate provides:
//! - [`TempoAnalyzer`]: onset-energy BPM estimator over mono PCM samples
//! - [`SymphoniaDecoder`]: in-memory decode of MP3, FLAC, OGG, WAV, AAC
//! - [`HttpAudioFetcher`]: downloads the audio behind a track locator
//! - [`TempoDetector`]: fetch → decode → analyze, recovering every failure
//!   to [`FALLBACK_BPM`]
//!
//! # Example
//!
//! ```rust
//! use pulse_tempo::{TempoAnalyzer, FALLBACK_BPM};
//!
//! let analyzer = TempoAnalyzer::new();
//!
//! // Silence has no energy peaks, so analysis falls back
//! let silence = vec![0.0f32; 44100];
//! assert_eq!(analyzer.analyze_or_fallback(&silence, 44100), FALLBACK_BPM);
//! ```

mod analyzer;
mod decoder;
mod detector;
mod error;
mod fetcher;

pub use analyzer::{
    TempoAnalyzer, FALLBACK_BPM, MAX_BPM, MIN_BPM, PEAK_THRESHOLD_FACTOR, WINDOW_SECONDS,
};
pub use decoder::SymphoniaDecoder;
pub use detector::TempoDetector;
pub use error::{DetectError, Result, TempoError};
pub use fetcher::HttpAudioFetcher;
