//!
//! src/normalize.rs
//!
//! Canonicalizes native track payloads from either platform into
//! the shared Track representation and derives both platforms'
//! search queries. Pure functions, safe to call concurrently.
//!
//!

use once_cell::sync::Lazy;
use regex::Regex;

use crate::payload::{NativeTrack, SpotifyTrack, YoutubeTrack};
use crate::types::{Platform, Track, DEFAULT_THUMBNAIL};

/// Trailing featured-artist markers, both the bare " feat. X" and the
/// parenthesized "(feat. X" forms. Everything from the marker to the end
/// of the title is dropped.
static FEAT_SUFFIX_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\sfeat\..*$").unwrap(),
        Regex::new(r"(?i)\(feat\..*$").unwrap(),
    ]
});

/// Strip a trailing "feat." suffix from a title for comparison purposes.
pub fn remove_feat_suffix(title: &str) -> String {
    let mut out = title.to_string();
    for pattern in FEAT_SUFFIX_PATTERNS.iter() {
        out = pattern.replace(&out, "").into_owned();
    }
    out.trim().to_string()
}

fn join_artists(artists: Option<&[crate::payload::ArtistRef]>) -> (String, String) {
    let names: Vec<&str> = artists
        .unwrap_or(&[])
        .iter()
        .filter_map(|a| a.name.as_deref())
        .collect();
    let first = names.first().copied().unwrap_or("").to_string();
    (names.join(", "), first)
}

fn spotify_query(title: &str, first_artist: &str, album: &str) -> String {
    format!("{title} artist:{first_artist} album:{album}")
}

fn youtube_query(title: &str, first_artist: &str) -> String {
    format!("\"{title}\" by {first_artist}")
}

/// Canonicalize a Spotify track payload. Durations are already in
/// milliseconds and pass through unchanged.
pub fn from_spotify(track: &SpotifyTrack) -> Track {
    let (artists, first_artist) = join_artists(track.artists.as_deref());

    let mut album_name = String::new();
    let mut thumbnail = DEFAULT_THUMBNAIL.to_string();
    if let Some(album) = &track.album {
        album_name = album.name.clone().unwrap_or_default();
        if let Some(url) = album
            .images
            .as_deref()
            .and_then(|imgs| imgs.first())
            .and_then(|img| img.url.clone())
        {
            thumbnail = url;
        }
    }

    let id = track.id.clone().unwrap_or_default();
    let title = track.name.clone().unwrap_or_default();

    Track {
        url: format!("https://open.spotify.com/track/{id}"),
        spotify_search_query: spotify_query(&title, &first_artist, &album_name),
        youtube_search_query: youtube_query(&title, &first_artist),
        id,
        title,
        artists,
        duration: track.duration_ms.unwrap_or(0),
        thumbnail,
        album: album_name,
        is_explicit: track.explicit.unwrap_or(false),
        platform: Platform::Spotify,
    }
}

/// Canonicalize a ytmusic track payload. Native durations are whole
/// seconds and are converted to milliseconds here, at creation time.
pub fn from_youtube(track: &YoutubeTrack) -> Track {
    let (artists, first_artist) = join_artists(track.artists.as_deref());

    let album_name = track
        .album
        .as_ref()
        .and_then(|a| a.name.clone())
        .unwrap_or_default();
    let thumbnail = track
        .thumbnails
        .as_deref()
        .and_then(|t| t.first())
        .and_then(|img| img.url.clone())
        .unwrap_or_else(|| DEFAULT_THUMBNAIL.to_string());

    let id = track.video_id.clone().unwrap_or_default();
    let title = track.title.clone().unwrap_or_default();

    Track {
        url: format!("https://music.youtube.com/watch?v={id}"),
        spotify_search_query: spotify_query(&title, &first_artist, &album_name),
        youtube_search_query: youtube_query(&title, &first_artist),
        id,
        title,
        artists,
        duration: track.duration_seconds.unwrap_or(0) * 1000,
        thumbnail,
        album: album_name,
        is_explicit: track.is_explicit.unwrap_or(false),
        platform: Platform::Youtube,
    }
}

pub fn canonicalize(native: &NativeTrack) -> Track {
    match native {
        NativeTrack::Spotify(t) => from_spotify(t),
        NativeTrack::Youtube(t) => from_youtube(t),
    }
}
