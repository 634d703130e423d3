//! Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use pulse_core::{MemoryTrackStore, PulseError, TrackBytes, TrackId, TrackStore};
use pulse_server::{api, state::AppState};
use std::sync::Arc;

/// Deterministic payload where byte `i` is `i % 251`
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Router over an in-memory store holding `track-1` (1000 bytes) and
/// `empty` (0 bytes)
pub async fn create_test_app() -> Router {
    let store = MemoryTrackStore::new();
    store.insert("track-1", payload(1000)).await;
    store.insert("empty", Vec::<u8>::new()).await;
    api::router(AppState::new(Arc::new(store)))
}

/// Store whose reads always fail
pub struct FailingStore;

#[async_trait]
impl TrackStore for FailingStore {
    async fn get_track_bytes(&self, _id: &TrackId) -> pulse_core::Result<Option<TrackBytes>> {
        Err(PulseError::storage("disk on fire"))
    }
}
