//! File storage service tests
//! Tests payload reads, path validation, and serving files through the router

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use pulse_core::{TrackId, TrackStore};
use pulse_server::{api, state::AppState, AudioFormat, FileTrackStore};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Test initialization creates the storage directory
#[tokio::test]
async fn test_initialize_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let storage_path = temp_dir.path().join("nested").join("tracks");

    let storage = FileTrackStore::new(storage_path.clone(), "mp3");
    storage.initialize().await.unwrap();

    assert!(storage_path.is_dir(), "Storage directory should be created");
}

/// Test a missing file reads as absent, not as an error
#[tokio::test]
async fn test_missing_file_is_none() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileTrackStore::new(temp_dir.path().to_path_buf(), "mp3");

    let result = storage
        .get_track_bytes(&TrackId::new("ghost"))
        .await
        .unwrap();
    assert!(result.is_none());
}

/// Test unsafe IDs never reach the filesystem
#[tokio::test]
async fn test_traversal_ids_are_absent() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileTrackStore::new(temp_dir.path().join("tracks"), "mp3");
    storage.initialize().await.unwrap();

    // A file outside the storage directory
    std::fs::write(temp_dir.path().join("secret.mp3"), b"secret").unwrap();

    for id in ["../secret", "..", "a/b", ""] {
        let result = storage.get_track_bytes(&TrackId::new(id)).await.unwrap();
        assert!(result.is_none(), "{:?} should not resolve", id);
    }

    assert!(storage
        .store(&TrackId::new("../escape"), b"x")
        .await
        .is_err());
}

/// Test an unreadable path surfaces as a storage error
#[tokio::test]
async fn test_unreadable_path_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileTrackStore::new(temp_dir.path().to_path_buf(), "mp3");

    // A directory where the file should be
    std::fs::create_dir(temp_dir.path().join("dir.mp3")).unwrap();

    assert!(storage.get_track_bytes(&TrackId::new("dir")).await.is_err());
}

/// Test delete reports whether the payload existed
#[tokio::test]
async fn test_delete() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileTrackStore::new(temp_dir.path().to_path_buf(), "ogg");

    let track_id = TrackId::new("song");
    storage.store(&track_id, b"ogg bytes").await.unwrap();

    assert!(storage.delete(&track_id).await.unwrap());
    assert!(!storage.delete(&track_id).await.unwrap());
    assert!(storage.get_track_bytes(&track_id).await.unwrap().is_none());
}

/// Test files on disk are served with ranges and the configured MIME type
#[tokio::test]
async fn test_serves_stored_file_with_range() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileTrackStore::new(temp_dir.path().to_path_buf(), "flac");

    let data: Vec<u8> = (0..=255u8).collect();
    storage.store(&TrackId::new("t1"), &data).await.unwrap();

    let app = api::router(AppState::with_format(Arc::new(storage), AudioFormat::Flac));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/tracks/t1/audio")
                .header(header::RANGE, "bytes=16-31")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/flac");
    assert_eq!(response.headers()[header::CONTENT_RANGE], "bytes 16-31/256");

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], &data[16..32]);
}
