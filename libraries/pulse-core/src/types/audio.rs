/// Audio payload and decoded sample types
use bytes::Bytes;

/// Binary payload of a track as served by a byte store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackBytes {
    /// The full payload
    pub bytes: Bytes,

    /// Total payload length in bytes
    pub total_length: u64,
}

impl TrackBytes {
    /// Wrap a payload, deriving the total length from it
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let total_length = bytes.len() as u64;
        Self {
            bytes,
            total_length,
        }
    }

    /// Inclusive byte slice `[start, end]`
    ///
    /// Callers resolve the range against `total_length` first; the slice is
    /// clamped to the payload so it never panics.
    pub fn slice(&self, start: u64, end: u64) -> Bytes {
        let len = self.bytes.len();
        let start = (start as usize).min(len);
        let end = (end as usize).saturating_add(1).min(len).max(start);
        self.bytes.slice(start..end)
    }
}

/// Decoded audio, one channel
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Normalized samples (-1.0 to 1.0) of the first channel
    pub channel_samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Duration of the decoded signal in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.channel_samples.len() as f64 / f64::from(self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_is_inclusive() {
        let payload = TrackBytes::new((0u8..10).collect::<Vec<_>>());
        assert_eq!(payload.total_length, 10);
        assert_eq!(payload.slice(0, 3).as_ref(), &[0, 1, 2, 3]);
        assert_eq!(payload.slice(9, 9).as_ref(), &[9]);
    }

    #[test]
    fn slice_never_reads_past_the_payload() {
        let payload = TrackBytes::new(vec![1u8, 2, 3]);
        assert_eq!(payload.slice(1, 100).as_ref(), &[2, 3]);
        assert!(payload.slice(5, 8).is_empty());
    }

    #[test]
    fn duration_from_sample_count() {
        let audio = DecodedAudio {
            channel_samples: vec![0.0; 22050],
            sample_rate: 44100,
        };
        assert!((audio.duration_secs() - 0.5).abs() < f64::EPSILON);
    }
}
