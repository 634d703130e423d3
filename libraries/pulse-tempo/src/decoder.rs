/// Audio decoder implementation using Symphonia
use pulse_core::{AudioDecoder, DecodedAudio, PulseError, Result};
use std::io::Cursor;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use tracing::{debug, warn};

/// In-memory decoder using Symphonia
///
/// Supports: MP3, FLAC, OGG, WAV, AAC
///
/// Only the first channel is kept; tempo analysis works on mono input.
#[derive(Debug, Clone, Default)]
pub struct SymphoniaDecoder {
    /// Container hint (file extension) for the prober
    extension: Option<String>,
}

impl SymphoniaDecoder {
    /// Create a decoder that probes the container from content alone
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder that hints the prober with a file extension
    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            extension: Some(extension.into()),
        }
    }

    /// Append channel 0 of a decoded packet, normalized to [-1.0, 1.0]
    ///
    /// Signed integers use symmetric scaling (divide by 2^(N-1)).
    fn append_first_channel(decoded: AudioBufferRef, out: &mut Vec<f32>) {
        if decoded.spec().channels.count() == 0 {
            return;
        }

        match decoded {
            AudioBufferRef::F32(buf) => Self::extend_with(&buf, out, |s| s.clamp(-1.0, 1.0)),
            AudioBufferRef::F64(buf) => {
                Self::extend_with(&buf, out, |s| (s as f32).clamp(-1.0, 1.0));
            }
            AudioBufferRef::S32(buf) => Self::extend_with(&buf, out, |s| s as f32 / 2147483648.0),
            AudioBufferRef::S24(buf) => {
                Self::extend_with(&buf, out, |s| s.inner() as f32 / 8388608.0);
            }
            AudioBufferRef::S16(buf) => Self::extend_with(&buf, out, |s| s as f32 / 32768.0),
            AudioBufferRef::S8(buf) => Self::extend_with(&buf, out, |s| s as f32 / 128.0),
            AudioBufferRef::U32(buf) => {
                Self::extend_with(&buf, out, |s| (s as f32 / u32::MAX as f32) * 2.0 - 1.0);
            }
            AudioBufferRef::U24(buf) => {
                Self::extend_with(&buf, out, |s| (s.inner() as f32 / 16777215.0) * 2.0 - 1.0);
            }
            AudioBufferRef::U16(buf) => {
                Self::extend_with(&buf, out, |s| (s as f32 / u16::MAX as f32) * 2.0 - 1.0);
            }
            AudioBufferRef::U8(buf) => {
                Self::extend_with(&buf, out, |s| (s as f32 / u8::MAX as f32) * 2.0 - 1.0);
            }
        }
    }

    fn extend_with<T, F>(buf: &AudioBuffer<T>, out: &mut Vec<f32>, normalize: F)
    where
        T: Sample + Copy,
        F: Fn(T) -> f32,
    {
        out.extend(buf.chan(0).iter().map(|&s| normalize(s)));
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio> {
        if bytes.is_empty() {
            return Err(PulseError::decode("Empty audio payload"));
        }

        let source = Cursor::new(bytes.to_vec());
        let mss = MediaSourceStream::new(Box::new(source), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = &self.extension {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| PulseError::decode(format!("Failed to probe audio: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| PulseError::decode("No default audio track"))?;
        let track_id = track.id;

        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| PulseError::decode("Unknown sample rate"))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| PulseError::decode(format!("Failed to create decoder: {}", e)))?;

        let mut channel_samples = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => {
                    return Err(PulseError::decode(format!("Failed to read packet: {}", e)));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => Self::append_first_channel(decoded, &mut channel_samples),
                // A corrupt frame is skipped, the rest of the stream is still usable
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!(error = %e, "Skipping undecodable packet");
                }
                Err(e) => return Err(PulseError::decode(format!("Decode error: {}", e))),
            }
        }

        if channel_samples.is_empty() {
            return Err(PulseError::decode("Stream contained no audio samples"));
        }

        debug!(
            samples = channel_samples.len(),
            sample_rate, "Decoded audio for analysis"
        );

        Ok(DecodedAudio {
            channel_samples,
            sample_rate,
        })
    }
}
