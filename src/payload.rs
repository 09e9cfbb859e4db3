//!
//! src/payload.rs
//!
//! Strict decode structs for the native track and playlist
//! payloads returned by the two platforms. Every field that a
//! platform may omit is an Option here; defaults are applied in
//! one place by the normalizer, never at call sites.
//!
//!

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlbumRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<ImageRef>>,
}

/// One track object as Spotify's API returns it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotifyTrack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Option<Vec<ArtistRef>>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub explicit: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotifyPlaylistItem {
    #[serde(default)]
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotifyTracksPage {
    #[serde(default)]
    pub items: Option<Vec<SpotifyPlaylistItem>>,
    #[serde(default)]
    pub total: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotifyOwner {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotifyPlaylist {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<ImageRef>>,
    #[serde(default)]
    pub owner: Option<SpotifyOwner>,
    #[serde(default)]
    pub tracks: Option<SpotifyTracksPage>,
}

/// The `tracks.items` wrapper of a Spotify search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifySearchTracks {
    #[serde(default)]
    pub items: Option<Vec<SpotifyTrack>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifySearchResponse {
    #[serde(default)]
    pub tracks: Option<SpotifySearchTracks>,
}

/// One song as the ytmusic API returns it. Durations come back in
/// whole seconds here, unlike Spotify's milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YoutubeTrack {
    #[serde(default, rename = "videoId")]
    pub video_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artists: Option<Vec<ArtistRef>>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub thumbnails: Option<Vec<ImageRef>>,
    #[serde(default, rename = "isExplicit")]
    pub is_explicit: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YoutubeAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YoutubePlaylist {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnails: Option<Vec<ImageRef>>,
    #[serde(default)]
    pub author: Option<YoutubeAuthor>,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default, rename = "trackCount")]
    pub track_count: Option<usize>,
    #[serde(default)]
    pub tracks: Option<Vec<YoutubeTrack>>,
}

/// A native track payload from either platform, pre-normalization.
#[derive(Debug, Clone)]
pub enum NativeTrack {
    Spotify(SpotifyTrack),
    Youtube(YoutubeTrack),
}

/// A native playlist payload from either platform, pre-normalization.
#[derive(Debug, Clone)]
pub enum NativePlaylist {
    Spotify(SpotifyPlaylist),
    Youtube(YoutubePlaylist),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spotify_track_decodes_with_missing_fields() {
        let track: SpotifyTrack = serde_json::from_str(r#"{"name": "Solo"}"#).unwrap();
        assert_eq!(track.name.as_deref(), Some("Solo"));
        assert!(track.id.is_none());
        assert!(track.album.is_none());
        assert!(track.artists.is_none());
    }

    #[test]
    fn youtube_track_decodes_camel_case_keys() {
        let raw = r#"{
            "videoId": "abc123",
            "title": "Song",
            "duration_seconds": 185,
            "isExplicit": true
        }"#;
        let track: YoutubeTrack = serde_json::from_str(raw).unwrap();
        assert_eq!(track.video_id.as_deref(), Some("abc123"));
        assert_eq!(track.duration_seconds, Some(185));
        assert_eq!(track.is_explicit, Some(true));
    }
}
