//!
//! src/classify.rs
//!
//! Maps a playlist url onto its owning platform and
//! native playlist id. Pure string parsing, no network.
//!
//!

use url::Url;

use crate::types::Platform;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistLocator {
    pub platform: Platform,
    pub playlist_id: String,
}

/// Identify which platform a playlist url belongs to and pull out its
/// native id. Unknown hosts, unparseable urls and YouTube urls without a
/// `list` parameter all classify to `None` rather than an error.
pub fn classify(raw_url: &str) -> Option<PlaylistLocator> {
    let url = Url::parse(raw_url).ok()?;
    let host = url.host_str()?;

    if host.eq_ignore_ascii_case("music.youtube.com") {
        let playlist_id = url
            .query_pairs()
            .find(|(k, _)| k == "list")
            .map(|(_, v)| v.trim().to_string())?;
        if playlist_id.is_empty() {
            return None;
        }
        return Some(PlaylistLocator { platform: Platform::Youtube, playlist_id });
    }

    if host.eq_ignore_ascii_case("open.spotify.com") {
        // Last non-empty path segment; query string and trailing slashes
        // must not leak into the id.
        let playlist_id = url
            .path_segments()?
            .filter(|s| !s.trim().is_empty())
            .last()
            .map(|s| s.trim().to_string())?;
        return Some(PlaylistLocator { platform: Platform::Spotify, playlist_id });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spotify_url_classifies_with_query_string() {
        let locator =
            classify("https://open.spotify.com/playlist/playlist_id?si=random_query")
                .unwrap();
        assert_eq!(locator.platform, Platform::Spotify);
        assert_eq!(locator.playlist_id, "playlist_id");
    }

    #[test]
    fn spotify_url_tolerates_trailing_slash() {
        let locator =
            classify("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M/")
                .unwrap();
        assert_eq!(locator.playlist_id, "37i9dQZF1DXcBWIGoYBM5M");
    }

    #[test]
    fn youtube_url_takes_list_parameter() {
        let locator = classify(
            "https://music.youtube.com/playlist?list=PLabc123&feature=share",
        )
        .unwrap();
        assert_eq!(locator.platform, Platform::Youtube);
        assert_eq!(locator.playlist_id, "PLabc123");
    }

    #[test]
    fn youtube_url_without_list_is_unclassified() {
        assert_eq!(classify("https://music.youtube.com/playlist?feature=share"), None);
    }

    #[test]
    fn unknown_host_is_unclassified() {
        assert_eq!(classify("https://google.com/playlist/playlist_id"), None);
    }

    #[test]
    fn garbage_input_is_unclassified() {
        assert_eq!(classify("not a url at all"), None);
    }
}
