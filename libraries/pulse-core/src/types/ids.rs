/// ID types for Pulse Player entities
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Track identifier
///
/// Identity is what the playback engine compares when it looks a track up in
/// the queue, so two `Track` values with the same id are the same track even
/// if the rest of their metadata differs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random track ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is safe to use as a single path segment
    pub fn is_path_safe(&self) -> bool {
        !self.0.is_empty()
            && self.0 != "."
            && self.0 != ".."
            && !self.0.contains(['/', '\\', '\0'])
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(TrackId::generate(), TrackId::generate());
    }

    #[test]
    fn path_safety() {
        assert!(TrackId::new("abc-123").is_path_safe());
        assert!(!TrackId::new("").is_path_safe());
        assert!(!TrackId::new("..").is_path_safe());
        assert!(!TrackId::new("../etc/passwd").is_path_safe());
        assert!(!TrackId::new("a\\b").is_path_safe());
    }
}
