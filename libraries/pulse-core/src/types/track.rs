/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Path of the audio endpoint for a track, relative to the server root
pub fn audio_path(id: &TrackId) -> String {
    format!("/tracks/{}/audio", id.as_str())
}

/// Audio track as seen by the playback core
///
/// Produced once at the storage boundary (see [`CatalogTrack`]); the playback
/// engine never re-parses track metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist names, in catalog order
    pub artists: Vec<String>,

    /// Free-form tags
    pub tags: Vec<String>,

    /// Duration reported by the catalog, if known
    pub duration_hint: Option<Duration>,

    /// Locator the playback backend opens to stream the audio
    pub source_url: String,

    /// Cached tempo estimate, filled in lazily by the playback engine
    pub bpm: Option<u32>,
}

impl Track {
    /// Create a track pointing at its default audio endpoint
    pub fn new(id: impl Into<TrackId>, title: impl Into<String>) -> Self {
        let id = id.into();
        let source_url = audio_path(&id);
        Self {
            id,
            title: title.into(),
            artists: Vec::new(),
            tags: Vec::new(),
            duration_hint: None,
            source_url,
            bpm: None,
        }
    }

    /// Builder-style override of the audio locator
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    /// Builder-style override of the cached tempo
    pub fn with_bpm(mut self, bpm: u32) -> Self {
        self.bpm = Some(bpm);
        self
    }

    /// Builder-style override of the duration hint
    pub fn with_duration_hint(mut self, duration: Duration) -> Self {
        self.duration_hint = Some(duration);
        self
    }
}

/// A list field as it arrives from the catalog
///
/// The catalog stores list fields either as a real array, as a JSON-encoded
/// array inside a string, or as a single plain string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseList {
    /// Proper array
    Many(Vec<String>),

    /// String, possibly JSON-encoded
    One(String),
}

impl Default for LooseList {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl LooseList {
    /// Normalize into a list of non-empty entries
    pub fn into_vec(self) -> Vec<String> {
        let items = match self {
            Self::Many(items) => items,
            Self::One(raw) => {
                let trimmed = raw.trim();
                if trimmed.starts_with('[') {
                    serde_json::from_str::<Vec<String>>(trimmed).unwrap_or_else(|_| vec![raw])
                } else {
                    vec![raw]
                }
            }
        };

        items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }
}

/// Track record in the catalog's loose wire shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogTrack {
    pub id: TrackId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub artists: LooseList,

    #[serde(default)]
    pub tags: LooseList,

    #[serde(default)]
    pub duration_ms: Option<u64>,

    #[serde(default)]
    pub bpm: Option<u32>,
}

impl From<CatalogTrack> for Track {
    fn from(raw: CatalogTrack) -> Self {
        let source_url = raw
            .url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| audio_path(&raw.id));

        Self {
            id: raw.id,
            title: raw.title,
            artists: raw.artists.into_vec(),
            tags: raw.tags.into_vec(),
            duration_hint: raw.duration_ms.map(Duration::from_millis),
            source_url,
            bpm: raw.bpm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Track {
        let raw: CatalogTrack = serde_json::from_str(json).unwrap();
        Track::from(raw)
    }

    #[test]
    fn new_track_points_at_audio_endpoint() {
        let track = Track::new("abc", "Song");
        assert_eq!(track.source_url, "/tracks/abc/audio");
        assert_eq!(track.bpm, None);
    }

    #[test]
    fn artists_as_array() {
        let track = parse(r#"{"id": "1", "title": "T", "artists": ["A", "B"]}"#);
        assert_eq!(track.artists, vec!["A", "B"]);
    }

    #[test]
    fn artists_as_json_string() {
        let track = parse(r#"{"id": "1", "title": "T", "artists": "[\"A\",\"B\"]"}"#);
        assert_eq!(track.artists, vec!["A", "B"]);
    }

    #[test]
    fn artists_as_plain_string() {
        let track = parse(r#"{"id": "1", "title": "T", "artists": "Solo Artist"}"#);
        assert_eq!(track.artists, vec!["Solo Artist"]);
    }

    #[test]
    fn malformed_json_string_is_kept_verbatim() {
        let track = parse(r#"{"id": "1", "title": "T", "tags": "[broken"}"#);
        assert_eq!(track.tags, vec!["[broken"]);
    }

    #[test]
    fn missing_lists_are_empty() {
        let track = parse(r#"{"id": "1", "title": "T"}"#);
        assert!(track.artists.is_empty());
        assert!(track.tags.is_empty());
    }

    #[test]
    fn null_url_falls_back_to_audio_endpoint() {
        let track = parse(r#"{"id": "xyz", "title": "T", "url": null}"#);
        assert_eq!(track.source_url, "/tracks/xyz/audio");

        let track = parse(r#"{"id": "xyz", "title": "T", "url": "http://cdn/x.mp3"}"#);
        assert_eq!(track.source_url, "http://cdn/x.mp3");
    }

    #[test]
    fn duration_and_bpm_carry_over() {
        let track = parse(r#"{"id": "1", "title": "T", "durationMs": 1500, "bpm": 128}"#);
        assert_eq!(track.duration_hint, Some(Duration::from_millis(1500)));
        assert_eq!(track.bpm, Some(128));
    }
}
