//! Beat pulse scheduler
//!
//! Emits one [`Pulse`] per beat on a watch channel so the UI can sync
//! visuals to the music. Pulses are cosmetic: the period is a plain
//! repeating timer with no drift compensation.

use crate::task::ScopedTask;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// One beat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pulse {
    /// Monotonic beat counter, never reset between schedules
    pub seq: u64,
    /// Milliseconds since the scheduler was created
    ///
    /// Shares one epoch across every schedule, so it keeps increasing
    /// through pauses and tempo changes.
    pub elapsed_ms: u64,
    /// Tempo of the schedule that produced this pulse
    pub bpm: u32,
}

/// Drives the beat timer
///
/// At most one timer is armed at a time.
#[derive(Debug)]
pub struct PulseScheduler {
    tx: Arc<watch::Sender<Pulse>>,
    timer: Option<ScopedTask>,
    bpm: Option<u32>,
    epoch: Instant,
}

impl PulseScheduler {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Pulse::default());
        Self {
            tx: Arc::new(tx),
            timer: None,
            bpm: None,
            epoch: Instant::now(),
        }
    }

    /// Beat period for a tempo, `None` for zero
    pub fn period_for(bpm: u32) -> Option<Duration> {
        if bpm == 0 {
            return None;
        }
        Some(Duration::from_secs_f64(60.0 / f64::from(bpm)))
    }

    /// Arm the timer at `bpm`, replacing any armed timer
    ///
    /// A tempo of zero stops the scheduler and leaves it idle.
    pub fn start(&mut self, bpm: u32) {
        self.stop();

        let Some(period) = Self::period_for(bpm) else {
            debug!(bpm, "Ignoring pulse start with zero tempo");
            return;
        };

        let tx = Arc::clone(&self.tx);
        let epoch = self.epoch;
        let started = Instant::now();

        self.timer = Some(ScopedTask::spawn(async move {
            let mut interval = tokio::time::interval_at(started + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                let now = interval.tick().await;
                let elapsed_ms = now.duration_since(epoch).as_millis() as u64;
                tx.send_modify(|pulse| {
                    pulse.seq += 1;
                    pulse.elapsed_ms = elapsed_ms;
                    pulse.bpm = bpm;
                });
            }
        }));
        self.bpm = Some(bpm);

        debug!(bpm, period_ms = period.as_millis() as u64, "Pulse started");
    }

    /// Cancel the armed timer, if any
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
            debug!("Pulse stopped");
        }
        self.bpm = None;
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Tempo of the armed timer
    pub fn bpm(&self) -> Option<u32> {
        self.bpm
    }

    /// Subscribe to beat pulses
    pub fn subscribe(&self) -> watch::Receiver<Pulse> {
        self.tx.subscribe()
    }
}

impl Default for PulseScheduler {
    fn default() -> Self {
        Self::new()
    }
}
