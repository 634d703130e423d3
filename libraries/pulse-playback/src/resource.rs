//! Platform-agnostic audio resource traits
//!
//! Abstracts the media element that actually plays a track (a browser
//! audio element, a native output stream, a mock in tests).

use crate::error::Result;
use crate::events::{EngineMessage, ResourceEvent};
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Identity of one audio resource instance
///
/// Allocated by the engine, never reused within an engine's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

impl ResourceId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "res-{}", self.0)
    }
}

/// Handle a resource uses to report lifecycle events
///
/// Every event is stamped with the resource's own ID.
#[derive(Debug, Clone)]
pub struct ResourceEventSink {
    resource: ResourceId,
    tx: UnboundedSender<EngineMessage>,
}

impl ResourceEventSink {
    pub(crate) fn new(resource: ResourceId, tx: UnboundedSender<EngineMessage>) -> Self {
        Self { resource, tx }
    }

    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    /// Post an event to the engine
    ///
    /// Events sent after the engine is dropped are silently lost.
    pub fn emit(&self, event: ResourceEvent) {
        let _ = self.tx.send(EngineMessage::Resource {
            resource: self.resource,
            event,
        });
    }
}

/// One playable media instance
///
/// Loading is asynchronous: `open` returns immediately and the resource
/// reports `Loaded`, `Playing`, `Ended` or `Error` through its sink.
pub trait AudioResource: Send {
    /// Start or resume playback
    fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the position
    fn pause(&mut self);

    /// Stop playback
    fn stop(&mut self);

    /// Move the playhead
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Current playhead position
    fn position(&self) -> Duration;

    /// Output gain (0.0-1.0)
    fn set_volume(&mut self, gain: f32);

    /// Free the underlying media; the resource is unusable afterwards
    fn release(&mut self);
}

/// Factory for audio resources
pub trait AudioBackend: Send + Sync {
    /// Create a resource for the audio at `url`
    ///
    /// # Errors
    /// Returns an error if the resource cannot be created at all. Failures
    /// discovered while loading are reported through `sink` instead.
    fn open(&self, url: &str, sink: ResourceEventSink) -> Result<Box<dyn AudioResource>>;
}
