//! Fetch → decode → analyze pipeline

use crate::analyzer::{TempoAnalyzer, FALLBACK_BPM};
use crate::decoder::SymphoniaDecoder;
use crate::error::DetectError;
use crate::fetcher::HttpAudioFetcher;
use async_trait::async_trait;
use pulse_core::{AudioDecoder, AudioFetcher, DecodedAudio, PulseError, TempoEstimator};
use std::sync::Arc;
use tracing::{debug, warn};

/// Best-effort tempo detection for a track locator
///
/// Every failure along the way (network, decode, too few peaks) is logged
/// and recovered to [`FALLBACK_BPM`].
pub struct TempoDetector<F = HttpAudioFetcher, D = SymphoniaDecoder> {
    fetcher: F,
    decoder: Arc<D>,
    analyzer: TempoAnalyzer,
}

impl<F, D> TempoDetector<F, D>
where
    F: AudioFetcher,
    D: AudioDecoder + 'static,
{
    pub fn new(fetcher: F, decoder: D) -> Self {
        Self {
            fetcher,
            decoder: Arc::new(decoder),
            analyzer: TempoAnalyzer::new(),
        }
    }

    /// Decode a payload and estimate its tempo
    ///
    /// Decoding is CPU bound and runs on the blocking pool.
    pub async fn analyze_bytes(&self, bytes: bytes::Bytes) -> Result<u32, DetectError> {
        let decoder = Arc::clone(&self.decoder);
        let decoded: DecodedAudio = tokio::task::spawn_blocking(move || decoder.decode(&bytes))
            .await
            .map_err(|e| PulseError::decode(format!("Decode task failed: {}", e)))??;

        let bpm = self
            .analyzer
            .analyze(&decoded.channel_samples, decoded.sample_rate)?;
        Ok(bpm)
    }

    async fn detect(&self, source_url: &str) -> Result<u32, DetectError> {
        let bytes = self.fetcher.fetch(source_url).await?;
        self.analyze_bytes(bytes).await
    }
}

impl TempoDetector {
    /// HTTP detector resolving relative locators against `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> pulse_core::Result<Self> {
        Ok(Self::new(
            HttpAudioFetcher::with_base_url(base_url)?,
            SymphoniaDecoder::new(),
        ))
    }
}

#[async_trait]
impl<F, D> TempoEstimator for TempoDetector<F, D>
where
    F: AudioFetcher,
    D: AudioDecoder + 'static,
{
    async fn estimate_bpm(&self, source_url: &str) -> u32 {
        match self.detect(source_url).await {
            Ok(bpm) => {
                debug!(url = %source_url, bpm, "Tempo detected");
                bpm
            }
            Err(e) => {
                warn!(url = %source_url, error = %e, "Tempo detection failed, using fallback");
                FALLBACK_BPM
            }
        }
    }
}
