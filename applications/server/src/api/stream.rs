/// Audio streaming API
use crate::{
    error::{Result, ServerError},
    range::{resolve_range, RangeRequest},
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use pulse_core::TrackId;

/// GET /tracks/:id/audio
/// Serve a track's audio payload with single byte-range support
pub async fn stream_track_audio(
    Path(track_id): Path<String>,
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    let track_id = TrackId::new(track_id);

    let payload = app_state
        .store
        .get_track_bytes(&track_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Track not found".to_string()))?;

    // A header that is not visible ASCII is treated like no header at all
    let range_header = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());

    match resolve_range(range_header, payload.total_length) {
        RangeRequest::Full => {
            tracing::debug!(track_id = %track_id, bytes = payload.total_length, "Serving full payload");

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, app_state.content_type)
                .header(header::CONTENT_LENGTH, payload.total_length)
                .header(header::ACCEPT_RANGES, "bytes")
                .body(Body::from(payload.bytes))
                .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
        }
        RangeRequest::Partial(range) => {
            tracing::debug!(
                track_id = %track_id,
                start = range.start,
                end = range.end,
                "Serving partial payload"
            );

            Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, app_state.content_type)
                .header(header::CONTENT_LENGTH, range.content_length())
                .header(header::CONTENT_RANGE, range.content_range())
                .header(header::ACCEPT_RANGES, "bytes")
                .body(Body::from(payload.slice(range.start, range.end)))
                .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
        }
        RangeRequest::Unsatisfiable => Err(ServerError::RangeNotSatisfiable {
            total: payload.total_length,
        }),
    }
}
