//! Playback engine
//!
//! Single-owner state machine over one audio resource and a play queue.
//! Audio resources and background tasks never touch the engine directly:
//! they post [`EngineMessage`]s to its channel, and the owner feeds them
//! back through [`PlaybackEngine::process_pending`] or
//! [`PlaybackEngine::run_next`].

use crate::error::{PlaybackError, Result};
use crate::events::{EngineMessage, PlaybackEvent, ResourceEvent};
use crate::pulse::{Pulse, PulseScheduler};
use crate::queue::Queue;
use crate::resource::{AudioBackend, AudioResource, ResourceEventSink, ResourceId};
use crate::task::ScopedTask;
use crate::types::{PlaybackConfig, PlaybackState, SessionSnapshot};
use crate::volume::Volume;
use pulse_core::{TempoEstimator, Track, TrackId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// The resource currently owned by the engine
struct ActiveResource {
    id: ResourceId,
    resource: Box<dyn AudioResource>,
}

/// Client playback engine
///
/// Owns at most one live audio resource. Switching tracks always stops and
/// releases the current resource before the next one is opened.
///
/// Operations that arm timers or start tempo analysis must run inside a
/// Tokio runtime.
pub struct PlaybackEngine {
    config: PlaybackConfig,
    backend: Arc<dyn AudioBackend>,
    estimator: Arc<dyn TempoEstimator>,

    state: PlaybackState,
    queue: Queue,
    current_track: Option<Track>,
    active: Option<ActiveResource>,
    next_resource_id: u64,

    // Start playback once the pending resource is open
    autoplay: bool,
    is_playing: bool,
    progress_seconds: f64,
    duration_seconds: f64,
    volume: Volume,

    // Session tempo cache, written only when analysis results are applied
    tempo_cache: HashMap<TrackId, u32>,

    pulse: PulseScheduler,
    progress_poll: Option<ScopedTask>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,

    tx: mpsc::UnboundedSender<EngineMessage>,
    rx: mpsc::UnboundedReceiver<EngineMessage>,
}

impl PlaybackEngine {
    /// Create new playback engine
    pub fn new(
        config: PlaybackConfig,
        backend: Arc<dyn AudioBackend>,
        estimator: Arc<dyn TempoEstimator>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            volume: Volume::new(config.volume),
            config,
            backend,
            estimator,
            state: PlaybackState::Idle,
            queue: Queue::new(),
            current_track: None,
            active: None,
            next_resource_id: 0,
            autoplay: false,
            is_playing: false,
            progress_seconds: 0.0,
            duration_seconds: 0.0,
            tempo_cache: HashMap::new(),
            pulse: PulseScheduler::new(),
            progress_poll: None,
            pending_events: Vec::new(),
            tx,
            rx,
        }
    }

    // ===== Queue =====

    /// Replace the queue; never touches the active resource
    pub fn set_queue(&mut self, tracks: Vec<Track>) {
        let tracks = tracks
            .into_iter()
            .map(|track| self.with_cached_bpm(track))
            .collect();
        self.queue.set(tracks);
        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    // ===== Transport =====

    /// Switch to `track` and start playing it
    ///
    /// Replaces the queue first when `tracks` is given.
    pub fn play_track(&mut self, track: Track, tracks: Option<Vec<Track>>) -> Result<()> {
        if let Some(tracks) = tracks {
            self.set_queue(tracks);
        }
        self.open_track(track, true)
    }

    /// Switch to `track` without starting playback
    ///
    /// The engine settles in `Ready` once the resource reports it loaded.
    pub fn load_track(&mut self, track: Track, tracks: Option<Vec<Track>>) -> Result<()> {
        if let Some(tracks) = tracks {
            self.set_queue(tracks);
        }
        self.open_track(track, false)
    }

    /// Start or resume playback
    pub fn play(&mut self) -> Result<()> {
        let active = self.active.as_mut().ok_or(PlaybackError::NoTrackLoaded)?;

        if let Err(e) = active.resource.play() {
            self.fail(e.to_string());
            return Err(e);
        }

        self.is_playing = true;
        self.set_state(PlaybackState::Playing);
        self.start_timers();
        Ok(())
    }

    /// Pause playback
    pub fn pause(&mut self) -> Result<()> {
        let active = self.active.as_mut().ok_or(PlaybackError::NoTrackLoaded)?;
        active.resource.pause();

        self.is_playing = false;
        self.stop_timers();
        self.set_state(PlaybackState::Paused);
        Ok(())
    }

    /// Move the playhead, clamped to `[0, duration]`
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        let active = self.active.as_mut().ok_or(PlaybackError::NoTrackLoaded)?;

        let target = if seconds.is_finite() {
            seconds.clamp(0.0, self.duration_seconds)
        } else {
            0.0
        };

        if let Err(e) = active.resource.seek(Duration::from_secs_f64(target)) {
            self.fail(e.to_string());
            return Err(e);
        }

        self.progress_seconds = target;
        self.emit_position();
        Ok(())
    }

    /// Skip to the next queued track, wrapping to the first
    ///
    /// No-op when the queue is empty or the current track is not queued.
    pub fn next(&mut self) -> Result<()> {
        let target = self
            .current_track
            .as_ref()
            .and_then(|current| self.queue.next_after(&current.id))
            .cloned();

        match target {
            Some(track) => self.play_track(track, None),
            None => Ok(()),
        }
    }

    /// Go back to the previous queued track, wrapping to the last
    pub fn previous(&mut self) -> Result<()> {
        let target = self
            .current_track
            .as_ref()
            .and_then(|current| self.queue.previous_before(&current.id))
            .cloned();

        match target {
            Some(track) => self.play_track(track, None),
            None => Ok(()),
        }
    }

    // ===== Volume =====

    /// Set volume level (0.0-1.0)
    ///
    /// NaN and infinite values are ignored. While muted only the level
    /// restored on unmute changes.
    pub fn set_volume(&mut self, volume: f32) {
        if !self.volume.set_level(volume) {
            debug!(volume, "Ignoring non-finite volume");
            return;
        }
        self.apply_volume();
    }

    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    // ===== Lifecycle =====

    /// Release the resource and reset the session to `Idle`
    ///
    /// The queue, volume and tempo cache are kept. Messages still in flight
    /// from the released resource are discarded when processed.
    pub fn cleanup(&mut self) {
        self.teardown();
        self.current_track = None;
        self.progress_seconds = 0.0;
        self.duration_seconds = 0.0;
        self.set_state(PlaybackState::Idle);
    }

    // ===== Message processing =====

    /// Apply every message already waiting in the channel
    ///
    /// Returns the number of messages processed.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.dispatch(message);
            processed += 1;
        }
        processed
    }

    /// Wait for the next message and apply it
    pub async fn run_next(&mut self) {
        if let Some(message) = self.rx.recv().await {
            self.dispatch(message);
        }
    }

    /// Apply one message
    ///
    /// Messages from any resource other than the active one are dropped.
    pub fn dispatch(&mut self, message: EngineMessage) {
        let origin = message.resource();
        if self.active_resource() != Some(origin) {
            debug!(resource = %origin, message = ?message, "Discarding stale message");
            return;
        }

        match message {
            EngineMessage::Resource { event, .. } => self.handle_resource_event(event),
            EngineMessage::TempoAnalyzed { track_id, bpm, .. } => {
                self.apply_tempo(track_id, bpm);
            }
            EngineMessage::ProgressTick { .. } => self.poll_progress(),
        }
    }

    // ===== Observers =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn queue(&self) -> &[Track] {
        self.queue.tracks()
    }

    pub fn progress_seconds(&self) -> f64 {
        self.progress_seconds
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Chosen volume level, kept while muted
    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    /// Gain actually applied to the resource
    pub fn effective_volume(&self) -> f32 {
        self.volume.gain()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Known tempo of the current track
    pub fn bpm(&self) -> Option<u32> {
        self.current_track.as_ref().and_then(|t| t.bpm)
    }

    /// Cached tempo for any track analyzed this session
    pub fn cached_bpm(&self, id: &TrackId) -> Option<u32> {
        self.tempo_cache.get(id).copied()
    }

    /// ID of the live resource, if a track is loaded
    pub fn active_resource(&self) -> Option<ResourceId> {
        self.active.as_ref().map(|a| a.id)
    }

    /// Receiver of beat pulses
    pub fn pulses(&self) -> watch::Receiver<Pulse> {
        self.pulse.subscribe()
    }

    /// Whether a beat timer is armed
    pub fn is_pulsing(&self) -> bool {
        self.pulse.is_running()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            current_track: self.current_track.clone(),
            queue: self.queue.tracks().to_vec(),
            is_playing: self.is_playing,
            progress_seconds: self.progress_seconds,
            duration_seconds: self.duration_seconds,
            volume: self.volume.level(),
            is_muted: self.volume.is_muted(),
            pre_mute_volume: self.volume.pre_mute_level(),
            bpm: self.bpm(),
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internals =====

    fn open_track(&mut self, track: Track, autoplay: bool) -> Result<()> {
        // The previous resource must be gone before the next one exists
        self.teardown();

        let track = self.with_cached_bpm(track);
        let resource_id = self.allocate_resource_id();
        let previous_track_id = self.current_track.take().map(|t| t.id);

        self.progress_seconds = 0.0;
        self.duration_seconds = track
            .duration_hint
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        self.autoplay = autoplay;
        self.current_track = Some(track.clone());
        self.set_state(PlaybackState::Loading);
        self.emit(PlaybackEvent::TrackChanged {
            track_id: track.id.clone(),
            previous_track_id,
        });

        info!(
            track_id = %track.id,
            resource = %resource_id,
            autoplay,
            "Opening track"
        );

        let sink = ResourceEventSink::new(resource_id, self.tx.clone());
        let mut resource = match self.backend.open(&track.source_url, sink) {
            Ok(resource) => resource,
            Err(e) => {
                self.fail(e.to_string());
                return Err(e);
            }
        };

        resource.set_volume(self.volume.gain());
        self.active = Some(ActiveResource {
            id: resource_id,
            resource,
        });

        if autoplay {
            if let Some(active) = self.active.as_mut() {
                if let Err(e) = active.resource.play() {
                    self.fail(e.to_string());
                    return Err(e);
                }
            }
        }

        if track.bpm.is_none() {
            self.spawn_tempo_analysis(resource_id, &track);
        }

        Ok(())
    }

    fn handle_resource_event(&mut self, event: ResourceEvent) {
        match event {
            ResourceEvent::Loaded { duration } => {
                self.duration_seconds = duration.as_secs_f64();
                if self.state == PlaybackState::Loading && !self.autoplay {
                    self.set_state(PlaybackState::Ready);
                }
                self.emit_position();
            }
            ResourceEvent::Playing => {
                self.autoplay = false;
                self.is_playing = true;
                self.set_state(PlaybackState::Playing);
                self.start_timers();
            }
            ResourceEvent::Paused => {
                self.is_playing = false;
                self.stop_timers();
                if self.state == PlaybackState::Playing {
                    self.set_state(PlaybackState::Paused);
                }
            }
            ResourceEvent::Ended => self.handle_track_ended(),
            ResourceEvent::Error { message } => self.fail(message),
        }
    }

    fn handle_track_ended(&mut self) {
        self.is_playing = false;
        self.stop_timers();
        self.progress_seconds = 0.0;
        self.set_state(PlaybackState::Ended);
        self.emit_position();

        if self.config.auto_advance {
            // Failures are already reported through the event stream
            if let Err(e) = self.next() {
                warn!(error = %e, "Auto-advance failed");
            }
        }
    }

    fn apply_tempo(&mut self, track_id: TrackId, bpm: u32) {
        let Some(current) = self.current_track.as_mut() else {
            return;
        };
        if current.id != track_id {
            return;
        }

        current.bpm = Some(bpm);
        self.tempo_cache.insert(track_id.clone(), bpm);
        self.queue.update_bpm(&track_id, bpm);

        info!(track_id = %track_id, bpm, "Tempo detected");
        self.emit(PlaybackEvent::TempoDetected { track_id, bpm });

        if self.is_playing {
            self.pulse.start(bpm);
        }
    }

    fn poll_progress(&mut self) {
        let Some(active) = self.active.as_ref() else {
            return;
        };
        let position = active.resource.position().as_secs_f64();
        // Unknown duration (0) leaves the position unclamped
        self.progress_seconds = if self.duration_seconds > 0.0 {
            position.min(self.duration_seconds)
        } else {
            position
        };
        self.emit_position();
    }

    fn spawn_tempo_analysis(&self, resource: ResourceId, track: &Track) {
        let estimator = Arc::clone(&self.estimator);
        let tx = self.tx.clone();
        let url = track.source_url.clone();
        let track_id = track.id.clone();

        debug!(track_id = %track_id, resource = %resource, "Starting tempo analysis");

        // Not scoped: a superseded result is dropped by the identity check
        tokio::spawn(async move {
            let bpm = estimator.estimate_bpm(&url).await;
            let _ = tx.send(EngineMessage::TempoAnalyzed {
                resource,
                track_id,
                bpm,
            });
        });
    }

    fn start_timers(&mut self) {
        let Some(resource) = self.active_resource() else {
            return;
        };

        let bpm = self.bpm().unwrap_or(self.config.default_bpm);
        self.pulse.start(bpm);

        let period = self.config.progress_poll_interval();
        let tx = self.tx.clone();
        let first_tick = tokio::time::Instant::now() + period;
        self.progress_poll = Some(ScopedTask::spawn(async move {
            let mut interval = tokio::time::interval_at(first_tick, period);
            loop {
                interval.tick().await;
                if tx.send(EngineMessage::ProgressTick { resource }).is_err() {
                    break;
                }
            }
        }));
    }

    fn stop_timers(&mut self) {
        self.pulse.stop();
        self.progress_poll = None;
    }

    /// Stop and release the active resource and cancel its timers
    fn teardown(&mut self) {
        self.stop_timers();
        self.is_playing = false;
        self.autoplay = false;

        if let Some(mut active) = self.active.take() {
            active.resource.stop();
            active.resource.release();
            debug!(resource = %active.id, "Released audio resource");
        }
    }

    fn fail(&mut self, message: String) {
        warn!(error = %message, "Playback failed");
        self.teardown();
        self.set_state(PlaybackState::Failed);
        self.emit(PlaybackEvent::Error { message });
    }

    fn apply_volume(&mut self) {
        let gain = self.volume.gain();
        if let Some(active) = self.active.as_mut() {
            active.resource.set_volume(gain);
        }
        self.emit(PlaybackEvent::VolumeChanged {
            volume: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    fn with_cached_bpm(&self, mut track: Track) -> Track {
        if track.bpm.is_none() {
            track.bpm = self.tempo_cache.get(&track.id).copied();
        }
        track
    }

    fn allocate_resource_id(&mut self) -> ResourceId {
        self.next_resource_id += 1;
        ResourceId::new(self.next_resource_id)
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "State transition");
            self.state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit_position(&mut self) {
        self.emit(PlaybackEvent::PositionUpdate {
            position_seconds: self.progress_seconds,
            duration_seconds: self.duration_seconds,
        });
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.teardown();
    }
}
