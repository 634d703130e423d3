/// Tempo analysis errors
///
/// None of these reach the UI: the detector recovers each one to the
/// fallback tempo.
use thiserror::Error;

/// Result type alias using `TempoError`
pub type Result<T> = std::result::Result<T, TempoError>;

/// Tempo analysis error types
#[derive(Error, Debug, PartialEq)]
pub enum TempoError {
    /// No samples to analyze
    #[error("No samples to analyze")]
    EmptyInput,

    /// Sample rate too low to form a single analysis window
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// Fewer than two energy peaks survived thresholding
    #[error("Too few energy peaks: {0}")]
    TooFewPeaks(usize),
}

/// Failure anywhere in the fetch → decode → analyze pipeline
#[derive(Error, Debug)]
pub enum DetectError {
    #[error(transparent)]
    Source(#[from] pulse_core::PulseError),

    #[error(transparent)]
    Analysis(#[from] TempoError),
}
