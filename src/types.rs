//!
//! src/types.rs
//!
//! Core data model: platforms, canonical tracks and
//! playlist results shared across the converter
//!
//!

use std::fmt;

use serde::{Deserialize, Serialize};

/// Thumbnail used when a native payload carries no artwork.
pub const DEFAULT_THUMBNAIL: &str =
    "https://iili.io/HlHy9Yx.png";

/// Resolved tracks stay cached for a day.
pub const SONG_CACHE_EXPIRY_SECS: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "SPOTIFY")]
    Spotify,
    #[serde(rename = "YOUTUBE")]
    Youtube,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Spotify => "SPOTIFY",
            Platform::Youtube => "YOUTUBE",
        }
    }
    pub fn parse(s: &str) -> Option<Platform> {
        match s.to_ascii_uppercase().as_str() {
            "SPOTIFY" => Some(Platform::Spotify),
            "YOUTUBE" => Some(Platform::Youtube),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform-agnostic representation of a song.
///
/// Built once per native payload by the normalizer and immutable after
/// that. Absent native data maps to empty strings, never to `None`, and
/// `duration` is always milliseconds regardless of the source platform's
/// native unit. Both search queries are derived up front so either
/// direction of conversion can reuse a cached track as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub url: String,
    /// All artist names joined with ", " in platform order.
    pub artists: String,
    /// Milliseconds.
    pub duration: u64,
    pub thumbnail: String,
    pub album: String,
    pub is_explicit: bool,
    pub spotify_search_query: String,
    pub youtube_search_query: String,
    pub platform: Platform,
}

impl Track {
    /// The search query formatted for the given platform's search syntax.
    pub fn query_for(&self, platform: Platform) -> &str {
        match platform {
            Platform::Spotify => &self.spotify_search_query,
            Platform::Youtube => &self.youtube_search_query,
        }
    }
}

/// Aggregate outcome of fetching or converting a playlist.
///
/// Metadata fields are empty strings when the playlist was synthesized by
/// a conversion rather than fetched from a platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub author: String,
    /// Sum of track durations, milliseconds.
    pub duration: u64,
    pub track_count: usize,
    pub tracks: Vec<Track>,
    pub platform: Platform,
    /// Overall match confidence in [0, 100]. 0 for source-side fetches.
    pub similarity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_round_trips_through_strings() {
        assert_eq!(Platform::parse("SPOTIFY"), Some(Platform::Spotify));
        assert_eq!(Platform::parse("youtube"), Some(Platform::Youtube));
        assert_eq!(Platform::parse("tidal"), None);
        assert_eq!(Platform::Spotify.as_str(), "SPOTIFY");
    }

    #[test]
    fn platform_serializes_in_wire_casing() {
        let json = serde_json::to_string(&Platform::Youtube).unwrap();
        assert_eq!(json, "\"YOUTUBE\"");
        let back: Platform = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Platform::Youtube);
    }
}
