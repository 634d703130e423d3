//! Pulse Server Library
//!
//! Audio delivery for Pulse Player: serves each track's payload over HTTP
//! with byte-range support so the player can seek without downloading the
//! whole file.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod range;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{AudioFormat, ServerConfig};
pub use error::{Result, ServerError};
pub use range::{resolve_range, ByteRange, RangeRequest};
pub use services::file_storage::FileTrackStore;
pub use state::AppState;
