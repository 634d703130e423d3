/// API route modules
pub mod health;
pub mod stream;

use crate::state::AppState;
use axum::{routing::get, Router};

/// Routes served by the audio server
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/tracks/:id/audio", get(stream::stream_track_audio))
        .with_state(app_state)
}
