//!
//! src/score.rs
//!
//! Deterministic confidence score between two canonical tracks.
//! Four independent sub-checks, each worth at most one point, so the
//! result is always one of {0, 0.5, 1, .., 4}.
//!
//!

use crate::normalize::remove_feat_suffix;
use crate::types::Track;

/// Maximum achievable score; playlist similarity is rescaled by this.
pub const MAX_SCORE: f64 = 4.0;

/// Durations within this many milliseconds of each other count as equal.
pub const DURATION_TOLERANCE_MS: u64 = 2_000;

fn comparable_title(title: &str) -> String {
    remove_feat_suffix(title).to_lowercase()
}

/// Score how closely two canonical tracks match.
///
/// Sub-checks, summed:
/// 1. titles equal after feat-suffix strip, case and whitespace folded (1.0)
/// 2. artist lists have the same element count (0.5) and every artist of
///    the shorter list appears in the longer one (0.5)
/// 3. album names equal, case and whitespace folded (1.0)
/// 4. durations within [`DURATION_TOLERANCE_MS`] (1.0)
pub fn calculate_similarity(track1: &Track, track2: &Track) -> f64 {
    let mut similarity = 0.0;

    if comparable_title(&track1.title) == comparable_title(&track2.title) {
        similarity += 1.0;
    }

    let artists1: Vec<&str> = track1.artists.trim().split(", ").collect();
    let artists2: Vec<&str> = track2.artists.trim().split(", ").collect();

    if artists1.len() == artists2.len() {
        similarity += 0.5;
    }
    // Asymmetric containment: every artist of the shorter list must be a
    // literal member of the longer one. On a length tie the first list is
    // the shorter side.
    let (shorter, longer) = if artists1.len() <= artists2.len() {
        (&artists1, &artists2)
    } else {
        (&artists2, &artists1)
    };
    if shorter.iter().all(|artist| longer.contains(artist)) {
        similarity += 0.5;
    }

    let album1 = track1.album.trim().to_lowercase();
    let album2 = track2.album.trim().to_lowercase();
    if album1 == album2 {
        similarity += 1.0;
    }

    if track1.duration.abs_diff(track2.duration) <= DURATION_TOLERANCE_MS {
        similarity += 1.0;
    }

    similarity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Platform, DEFAULT_THUMBNAIL};

    fn track(title: &str, artists: &str, album: &str, duration: u64) -> Track {
        Track {
            id: "id".into(),
            title: title.into(),
            url: String::new(),
            artists: artists.into(),
            duration,
            thumbnail: DEFAULT_THUMBNAIL.into(),
            album: album.into(),
            is_explicit: false,
            spotify_search_query: String::new(),
            youtube_search_query: String::new(),
            platform: Platform::Spotify,
        }
    }

    #[test]
    fn identical_tracks_score_full_marks() {
        let a = track("Let me Know", "girl, boy", "Big Boy Talk", 140_000);
        assert_eq!(calculate_similarity(&a, &a), 4.0);
    }

    #[test]
    fn case_and_artist_order_do_not_matter() {
        let a = track("Let me Know", "girl, boy", "Big Boy Talk", 140_000);
        let b = track("Let me know", "boy, girl", "Big Boy Talk", 140_000);
        assert_eq!(calculate_similarity(&a, &b), 4.0);
    }

    #[test]
    fn partial_match_scores_two_and_a_half() {
        // Title matches (1), artist counts match (0.5) but "girl" is not in
        // the other list (no containment), albums differ, and the duration
        // gap sits exactly on the tolerance (1).
        let a = track("Let me Know", "boy, girl", "Big Boy Talk", 140_000);
        let b = track("Let me Know", "boy, girl2", "Big Girl", 142_000);
        assert_eq!(calculate_similarity(&a, &b), 2.5);
    }

    #[test]
    fn feat_suffix_does_not_break_title_match() {
        let a = track("Who Is She (feat. Xanemusic)", "a", "x", 1000);
        let b = track("Who Is She", "a", "x", 1000);
        assert_eq!(calculate_similarity(&a, &b), 4.0);
    }

    #[test]
    fn subset_artist_list_earns_containment_point() {
        let a = track("Song", "A", "x", 1000);
        let b = track("Song", "A, B", "x", 1000);
        // counts differ (no 0.5) but {A} is contained in {A, B}
        assert_eq!(calculate_similarity(&a, &b), 3.5);
    }

    #[test]
    fn equal_length_without_containment_only_gets_length_point() {
        let a = track("Song", "A, B", "x", 1000);
        let b = track("Song", "A, C", "x", 1000);
        assert_eq!(calculate_similarity(&a, &b), 3.0);
    }

    #[test]
    fn empty_albums_count_as_equal() {
        let a = track("Song", "A", "", 1000);
        let b = track("Song", "A", "  ", 1000);
        assert_eq!(calculate_similarity(&a, &b), 4.0);
    }

    #[test]
    fn duration_tolerance_is_two_seconds_inclusive() {
        let a = track("Song", "A", "x", 100_000);
        let close = track("Song", "A", "x", 102_000);
        let far = track("Song", "A", "x", 102_001);
        assert_eq!(calculate_similarity(&a, &close), 4.0);
        assert_eq!(calculate_similarity(&a, &far), 3.0);
    }
}
