//! Pulse Player - Playback Engine
//!
//! Platform-agnostic playback management for Pulse Player.
//!
//! This crate provides:
//! - [`PlaybackEngine`]: single-owner state machine over one audio resource
//! - Play queue with circular next/previous navigation
//! - Volume control (0.0-1.0, mute with exact restore)
//! - Session tempo cache fed by background BPM analysis
//! - [`PulseScheduler`]: beat pulses on a watch channel for UI beat-sync
//!
//! # Architecture
//!
//! `pulse-playback` knows nothing about how audio is actually produced.
//! Platform code provides an [`AudioBackend`] that opens [`AudioResource`]s;
//! resources report their lifecycle through a [`ResourceEventSink`], which
//! stamps each event with the resource's [`ResourceId`]. The engine drops
//! any message whose resource is no longer the active one, so late callbacks
//! from a replaced track can never corrupt the session.
//!
//! # Example
//!
//! ```rust,no_run
//! use pulse_core::Track;
//! use pulse_playback::{AudioBackend, PlaybackConfig, PlaybackEngine};
//! use pulse_core::TempoEstimator;
//! use std::sync::Arc;
//!
//! # async fn run(backend: Arc<dyn AudioBackend>, estimator: Arc<dyn TempoEstimator>)
//! # -> pulse_playback::Result<()> {
//! let mut engine = PlaybackEngine::new(PlaybackConfig::default(), backend, estimator);
//!
//! let tracks = vec![Track::new("a", "First"), Track::new("b", "Second")];
//! engine.play_track(tracks[0].clone(), Some(tracks))?;
//!
//! // Beat pulses for visuals
//! let mut pulses = engine.pulses();
//! tokio::spawn(async move {
//!     while pulses.changed().await.is_ok() {
//!         println!("beat {}", pulses.borrow().seq);
//!     }
//! });
//!
//! loop {
//!     engine.run_next().await;
//!     for event in engine.drain_events() {
//!         println!("{:?}", event);
//!     }
//! }
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod events;
pub mod pulse;
pub mod queue;
pub mod resource;
pub mod task;
pub mod types;
pub mod volume;

pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::{EngineMessage, PlaybackEvent, ResourceEvent};
pub use pulse::{Pulse, PulseScheduler};
pub use queue::Queue;
pub use resource::{AudioBackend, AudioResource, ResourceEventSink, ResourceId};
pub use task::ScopedTask;
pub use types::{PlaybackConfig, PlaybackState, SessionSnapshot};
pub use volume::Volume;
