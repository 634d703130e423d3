/// File storage service - serves track payloads from disk
use async_trait::async_trait;
use pulse_core::{PulseError, TrackBytes, TrackId, TrackStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Byte store reading `<base_path>/<track id>.<extension>`
#[derive(Debug, Clone)]
pub struct FileTrackStore {
    base_path: PathBuf,
    extension: String,
}

impl FileTrackStore {
    pub fn new(base_path: PathBuf, extension: impl Into<String>) -> Self {
        Self {
            base_path,
            extension: extension.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Create the storage directory
    pub async fn initialize(&self) -> pulse_core::Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    /// Path of a track's payload, `None` for IDs that could escape the
    /// storage directory
    pub fn track_path(&self, track_id: &TrackId) -> Option<PathBuf> {
        if !track_id.is_path_safe() {
            return None;
        }
        let filename = format!("{}.{}", track_id.as_str(), self.extension);
        Some(self.base_path.join(filename))
    }

    /// Write a track payload
    pub async fn store(&self, track_id: &TrackId, data: &[u8]) -> pulse_core::Result<PathBuf> {
        let path = self.track_path(track_id).ok_or_else(|| {
            PulseError::invalid_input(format!("Unsafe track id: {}", track_id))
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&path, data).await?;
        Ok(path)
    }

    /// Delete a track payload, returning whether it existed
    pub async fn delete(&self, track_id: &TrackId) -> pulse_core::Result<bool> {
        let Some(path) = self.track_path(track_id) else {
            return Ok(false);
        };

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl TrackStore for FileTrackStore {
    async fn get_track_bytes(&self, id: &TrackId) -> pulse_core::Result<Option<TrackBytes>> {
        let Some(path) = self.track_path(id) else {
            tracing::warn!(track_id = %id, "Rejected unsafe track id");
            return Ok(None);
        };

        match fs::read(&path).await {
            Ok(data) => Ok(Some(TrackBytes::new(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PulseError::storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
