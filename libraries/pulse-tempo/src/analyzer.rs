//! Onset-energy tempo estimation
//!
//! The signal is cut into short windows, each reduced to the sum of its
//! absolute sample magnitudes. Windows that are strict local maxima above
//! half the loudest window count as beats; the mean distance between them
//! gives the beat period.

use crate::error::{Result, TempoError};
use tracing::trace;

/// Analysis window length in seconds
pub const WINDOW_SECONDS: f64 = 0.05;

/// Peaks must exceed this fraction of the loudest window
pub const PEAK_THRESHOLD_FACTOR: f64 = 0.5;

/// Lowest tempo ever reported
pub const MIN_BPM: u32 = 60;

/// Highest tempo ever reported
pub const MAX_BPM: u32 = 200;

/// Tempo used whenever analysis fails
pub const FALLBACK_BPM: u32 = 120;

/// Energy-peak BPM estimator
///
/// Stateless and deterministic: the same samples and sample rate always
/// produce the same result.
#[derive(Debug, Clone, Copy, Default)]
pub struct TempoAnalyzer;

impl TempoAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Samples per analysis window at the given sample rate
    pub fn window_len(sample_rate: u32) -> usize {
        (f64::from(sample_rate) * WINDOW_SECONDS).floor() as usize
    }

    /// Estimate the tempo of a mono signal
    ///
    /// Returns a BPM clamped to [`MIN_BPM`]..=[`MAX_BPM`], or an error when
    /// the signal has no usable beat structure.
    pub fn analyze(&self, samples: &[f32], sample_rate: u32) -> Result<u32> {
        if samples.is_empty() {
            return Err(TempoError::EmptyInput);
        }

        let window = Self::window_len(sample_rate);
        if window == 0 {
            return Err(TempoError::InvalidSampleRate(sample_rate));
        }

        let envelope = Self::energy_envelope(samples, window);
        let peaks = Self::find_peaks(&envelope);

        trace!(
            windows = envelope.len(),
            peaks = peaks.len(),
            "Energy envelope analyzed"
        );

        if peaks.len() < 2 {
            return Err(TempoError::TooFewPeaks(peaks.len()));
        }

        // Sum of consecutive gaps telescopes to last - first
        let span = (peaks[peaks.len() - 1] - peaks[0]) as f64;
        let mean_gap = span / (peaks.len() - 1) as f64;

        // Evaluated in exactly this order; rearranging it moves .5 ties
        let beat_minutes = (window as f64 * mean_gap) / (f64::from(sample_rate) * 60.0);
        let bpm = (1.0 / beat_minutes).round();

        Ok((bpm as u32).clamp(MIN_BPM, MAX_BPM))
    }

    /// Like [`analyze`](Self::analyze), but yields [`FALLBACK_BPM`] on failure
    pub fn analyze_or_fallback(&self, samples: &[f32], sample_rate: u32) -> u32 {
        self.analyze(samples, sample_rate).unwrap_or(FALLBACK_BPM)
    }

    /// Per-window sum of absolute magnitudes (trailing partial window kept)
    pub fn energy_envelope(samples: &[f32], window: usize) -> Vec<f64> {
        samples
            .chunks(window)
            .map(|chunk| chunk.iter().map(|s| f64::from(s.abs())).sum())
            .collect()
    }

    /// Indices of strict local maxima above the threshold
    ///
    /// The first and last windows are never peaks.
    pub fn find_peaks(envelope: &[f64]) -> Vec<usize> {
        if envelope.len() < 3 {
            return Vec::new();
        }

        let max = envelope.iter().copied().fold(0.0_f64, f64::max);
        let threshold = PEAK_THRESHOLD_FACTOR * max;

        (1..envelope.len() - 1)
            .filter(|&i| {
                let e = envelope[i];
                e > threshold && e > envelope[i - 1] && e > envelope[i + 1]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Silence with a 50-sample burst at `offset` into every `period`
    fn click_track(sample_rate: u32, period: usize, offset: usize, periods: usize) -> Vec<f32> {
        let mut samples = vec![0.0f32; period * periods];
        let window = TempoAnalyzer::window_len(sample_rate);
        for p in 0..periods {
            let start = p * period + offset;
            for s in &mut samples[start..start + window] {
                *s = 0.8;
            }
        }
        samples
    }

    #[test]
    fn test_constants_are_pinned() {
        assert_eq!(WINDOW_SECONDS, 0.05);
        assert_eq!(PEAK_THRESHOLD_FACTOR, 0.5);
        assert_eq!(MIN_BPM, 60);
        assert_eq!(MAX_BPM, 200);
        assert_eq!(FALLBACK_BPM, 120);
    }

    #[test]
    fn test_window_len() {
        assert_eq!(TempoAnalyzer::window_len(44100), 2205);
        assert_eq!(TempoAnalyzer::window_len(1000), 50);
        assert_eq!(TempoAnalyzer::window_len(19), 0);
    }

    #[test]
    fn test_envelope_keeps_partial_window() {
        let samples = [0.5, -0.5, 1.0, -0.25, 0.25];
        let envelope = TempoAnalyzer::energy_envelope(&samples, 2);
        assert_eq!(envelope, vec![1.0, 1.25, 0.25]);
    }

    #[test]
    fn test_peaks_exclude_edges_and_plateaus() {
        let envelope = [9.0, 1.0, 5.0, 1.0, 5.0, 5.0, 1.0, 9.0];
        assert_eq!(TempoAnalyzer::find_peaks(&envelope), vec![2]);
    }

    #[test]
    fn test_peaks_below_threshold_ignored() {
        let envelope = [0.0, 10.0, 0.0, 4.0, 0.0, 10.0, 0.0];
        assert_eq!(TempoAnalyzer::find_peaks(&envelope), vec![1, 5]);
    }

    #[test]
    fn test_click_track_120_bpm() {
        let samples = click_track(1000, 500, 200, 8);
        assert_eq!(TempoAnalyzer::new().analyze(&samples, 1000), Ok(120));
    }

    #[test]
    fn test_half_bpm_tie_rounds_up() {
        // 17 gaps over 160 windows of 400 samples at 8 kHz is exactly 127.5 BPM
        let sample_rate = 8000;
        let window = TempoAnalyzer::window_len(sample_rate);
        assert_eq!(window, 400);

        let mut peaks: Vec<usize> = (1..=145).step_by(9).collect();
        peaks.push(161);
        assert_eq!(peaks.len(), 18);

        let mut samples = vec![0.0f32; 163 * window];
        for &p in &peaks {
            for s in &mut samples[p * window..(p + 1) * window] {
                *s = 0.8;
            }
        }

        let envelope = TempoAnalyzer::energy_envelope(&samples, window);
        assert_eq!(TempoAnalyzer::find_peaks(&envelope), peaks);
        assert_eq!(TempoAnalyzer::new().analyze(&samples, sample_rate), Ok(128));
    }

    #[test]
    fn test_fast_tempo_clamped_to_max() {
        let samples = click_track(1000, 100, 0, 20);
        assert_eq!(TempoAnalyzer::new().analyze(&samples, 1000), Ok(MAX_BPM));
    }

    #[test]
    fn test_slow_tempo_clamped_to_min() {
        let samples = click_track(1000, 3000, 200, 4);
        assert_eq!(TempoAnalyzer::new().analyze(&samples, 1000), Ok(MIN_BPM));
    }

    #[test]
    fn test_silence_falls_back() {
        let analyzer = TempoAnalyzer::new();
        let silence = vec![0.0f32; 44100];
        assert_eq!(
            analyzer.analyze(&silence, 44100),
            Err(TempoError::TooFewPeaks(0))
        );
        assert_eq!(analyzer.analyze_or_fallback(&silence, 44100), FALLBACK_BPM);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            TempoAnalyzer::new().analyze(&[], 44100),
            Err(TempoError::EmptyInput)
        );
    }

    #[test]
    fn test_tiny_sample_rate_rejected() {
        assert_eq!(
            TempoAnalyzer::new().analyze(&[0.5; 100], 10),
            Err(TempoError::InvalidSampleRate(10))
        );
    }

    #[test]
    fn test_single_peak_is_failure() {
        let samples = click_track(1000, 5000, 2000, 1);
        assert_eq!(
            TempoAnalyzer::new().analyze(&samples, 1000),
            Err(TempoError::TooFewPeaks(1))
        );
    }
}
