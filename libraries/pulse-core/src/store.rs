/// In-memory byte store
use crate::error::Result;
use crate::traits::TrackStore;
use crate::types::{TrackBytes, TrackId};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Track store backed by a map, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryTrackStore {
    payloads: RwLock<HashMap<TrackId, Bytes>>,
}

impl MemoryTrackStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a track payload
    pub async fn insert(&self, id: impl Into<TrackId>, bytes: impl Into<Bytes>) {
        self.payloads.write().await.insert(id.into(), bytes.into());
    }

    /// Remove a track payload, returning whether it existed
    pub async fn remove(&self, id: &TrackId) -> bool {
        self.payloads.write().await.remove(id).is_some()
    }
}

#[async_trait]
impl TrackStore for MemoryTrackStore {
    async fn get_track_bytes(&self, id: &TrackId) -> Result<Option<TrackBytes>> {
        Ok(self
            .payloads
            .read()
            .await
            .get(id)
            .cloned()
            .map(TrackBytes::new))
    }
}
