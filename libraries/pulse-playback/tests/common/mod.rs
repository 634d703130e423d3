//! Test doubles for the playback engine

#![allow(dead_code)]

use async_trait::async_trait;
use pulse_core::{TempoEstimator, Track};
use pulse_playback::{
    AudioBackend, AudioResource, PlaybackConfig, PlaybackEngine, PlaybackError, ResourceEvent,
    ResourceEventSink, ResourceId,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TRACK_DURATION: Duration = Duration::from_secs(180);

/// Shared bookkeeping of everything the mock backend did
#[derive(Debug, Default)]
pub struct BackendLog {
    pub live: usize,
    pub max_live: usize,
    pub opened: Vec<String>,
    pub released: Vec<ResourceId>,
    pub sinks: Vec<ResourceEventSink>,
    pub last_volume: Option<f32>,
    pub position: Duration,
    pub fail_open: bool,
    pub fail_play: bool,
    pub hide_duration: bool,
}

/// In-memory backend that reports lifecycle events like a media element
///
/// `open` reports `Loaded` immediately unless the duration is hidden; `play` and `pause` echo `Playing`
/// and `Paused`.
#[derive(Clone, Default)]
pub struct MockBackend {
    pub log: Arc<Mutex<BackendLog>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> usize {
        self.log.lock().unwrap().live
    }

    pub fn max_live(&self) -> usize {
        self.log.lock().unwrap().max_live
    }

    pub fn opened(&self) -> Vec<String> {
        self.log.lock().unwrap().opened.clone()
    }

    /// Sink of the n-th opened resource (0-based)
    pub fn sink(&self, n: usize) -> ResourceEventSink {
        self.log.lock().unwrap().sinks[n].clone()
    }

    pub fn last_volume(&self) -> Option<f32> {
        self.log.lock().unwrap().last_volume
    }

    pub fn set_position(&self, position: Duration) {
        self.log.lock().unwrap().position = position;
    }

    /// Stop reporting `Loaded`, as a stream with unknown length would
    pub fn hide_duration(&self) {
        self.log.lock().unwrap().hide_duration = true;
    }

    pub fn fail_next_open(&self) {
        self.log.lock().unwrap().fail_open = true;
    }
}

impl AudioBackend for MockBackend {
    fn open(
        &self,
        url: &str,
        sink: ResourceEventSink,
    ) -> pulse_playback::Result<Box<dyn AudioResource>> {
        let mut log = self.log.lock().unwrap();

        if std::mem::take(&mut log.fail_open) {
            return Err(PlaybackError::resource(format!("cannot open {}", url)));
        }

        log.live += 1;
        log.max_live = log.max_live.max(log.live);
        log.opened.push(url.to_string());
        log.sinks.push(sink.clone());

        if !log.hide_duration {
            sink.emit(ResourceEvent::Loaded {
                duration: TRACK_DURATION,
            });
        }

        Ok(Box::new(MockResource {
            sink,
            log: Arc::clone(&self.log),
            released: false,
        }))
    }
}

struct MockResource {
    sink: ResourceEventSink,
    log: Arc<Mutex<BackendLog>>,
    released: bool,
}

impl AudioResource for MockResource {
    fn play(&mut self) -> pulse_playback::Result<()> {
        if self.log.lock().unwrap().fail_play {
            return Err(PlaybackError::resource("playback refused"));
        }
        self.sink.emit(ResourceEvent::Playing);
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.emit(ResourceEvent::Paused);
    }

    fn stop(&mut self) {}

    fn seek(&mut self, position: Duration) -> pulse_playback::Result<()> {
        self.log.lock().unwrap().position = position;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.log.lock().unwrap().position
    }

    fn set_volume(&mut self, gain: f32) {
        self.log.lock().unwrap().last_volume = Some(gain);
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            let mut log = self.log.lock().unwrap();
            log.live -= 1;
            log.released.push(self.sink.resource());
        }
    }
}

/// Estimator answering with a fixed tempo after a delay
pub struct DelayedEstimator {
    pub bpm: u32,
    pub delay: Duration,
}

#[async_trait]
impl TempoEstimator for DelayedEstimator {
    async fn estimate_bpm(&self, _source_url: &str) -> u32 {
        tokio::time::sleep(self.delay).await;
        self.bpm
    }
}

pub fn track(id: &str) -> Track {
    Track::new(id, format!("Track {}", id)).with_source_url(format!("/tracks/{}/audio", id))
}

pub fn tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| track(id)).collect()
}

/// Engine over a fresh mock backend, analysis answering 128 BPM after 1s
pub fn engine() -> (PlaybackEngine, MockBackend) {
    engine_with(PlaybackConfig::default())
}

pub fn engine_with(config: PlaybackConfig) -> (PlaybackEngine, MockBackend) {
    let backend = MockBackend::new();
    let estimator = DelayedEstimator {
        bpm: 128,
        delay: Duration::from_secs(1),
    };
    let engine = PlaybackEngine::new(config, Arc::new(backend.clone()), Arc::new(estimator));
    (engine, backend)
}

/// Let spawned tasks run, then apply everything they posted
pub async fn settle(engine: &mut PlaybackEngine) {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    engine.process_pending();
}

/// Advance paused time, then settle
pub async fn advance(engine: &mut PlaybackEngine, by: Duration) {
    tokio::time::advance(by).await;
    settle(engine).await;
}
