mod audio;
mod ids;
mod track;

pub use audio::{DecodedAudio, TrackBytes};
pub use ids::TrackId;
pub use track::{audio_path, CatalogTrack, Track};
