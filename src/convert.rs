//!
//! src/convert.rs
//!
//! Drives a whole conversion: classify the url, pull the source
//! playlist, resolve every track on the target platform through a
//! bounded fan-out, and aggregate duration, count and similarity.
//!
//!

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::cache::TrackCache;
use crate::classify::{classify, PlaylistLocator};
use crate::config::ConvertLimits;
use crate::errors::ConvertError;
use crate::fetch::Clients;
use crate::normalize;
use crate::payload::NativePlaylist;
use crate::resolver::Resolver;
use crate::score::{calculate_similarity, MAX_SCORE};
use crate::types::{Platform, Playlist, Track};

pub struct Converter {
    clients: Clients,
    resolver: Resolver,
    limits: ConvertLimits,
}

/// Shape a fetched native playlist into the canonical representation,
/// normalizing every track. Missing metadata degrades to empty strings.
fn assemble_source_playlist(native: NativePlaylist) -> Playlist {
    match native {
        NativePlaylist::Spotify(playlist) => {
            let tracks: Vec<Track> = playlist
                .tracks
                .as_ref()
                .and_then(|page| page.items.as_ref())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| item.track.as_ref())
                        .map(normalize::from_spotify)
                        .collect()
                })
                .unwrap_or_default();
            let duration = tracks.iter().map(|t| t.duration).sum();

            Playlist {
                id: playlist.id.unwrap_or_default(),
                title: playlist.name.unwrap_or_default(),
                description: playlist.description.unwrap_or_default(),
                thumbnail: playlist
                    .images
                    .as_deref()
                    .and_then(|imgs| imgs.first())
                    .and_then(|img| img.url.clone())
                    .unwrap_or_default(),
                author: playlist
                    .owner
                    .and_then(|o| o.display_name)
                    .unwrap_or_default(),
                duration,
                track_count: tracks.len(),
                tracks,
                platform: Platform::Spotify,
                similarity: 0.0,
            }
        }
        NativePlaylist::Youtube(playlist) => {
            let tracks: Vec<Track> = playlist
                .tracks
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .map(normalize::from_youtube)
                .collect();

            Playlist {
                id: playlist.id.unwrap_or_default(),
                title: playlist.title.unwrap_or_default(),
                description: playlist.description.unwrap_or_default(),
                thumbnail: playlist
                    .thumbnails
                    .as_deref()
                    .and_then(|t| t.first())
                    .and_then(|img| img.url.clone())
                    .unwrap_or_default(),
                author: playlist.author.and_then(|a| a.name).unwrap_or_default(),
                duration: playlist.duration_seconds.unwrap_or(0) * 1000,
                track_count: tracks.len(),
                tracks,
                platform: Platform::Youtube,
                similarity: 0.0,
            }
        }
    }
}

impl Converter {
    pub fn new(clients: Clients, cache: Arc<TrackCache>, limits: ConvertLimits) -> Self {
        let resolver = Resolver::new(cache, clients.clone());
        Self { clients, resolver, limits }
    }

    /// Fetch a playlist with its native metadata, tracks normalized.
    pub async fn fetch_playlist(&self, url: &str) -> Result<Playlist, ConvertError> {
        let locator = classify(url)
            .ok_or_else(|| ConvertError::InvalidUrl(url.to_string()))?;
        self.fetch_by_locator(&locator).await
    }

    async fn fetch_by_locator(
        &self,
        locator: &PlaylistLocator,
    ) -> Result<Playlist, ConvertError> {
        let native = self
            .clients
            .platform(locator.platform)
            .playlist(&locator.playlist_id)
            .await?;
        Ok(assemble_source_playlist(native))
    }

    /// Convert the playlist at `url` to its counterpart on `target`.
    ///
    /// Source tracks that cannot be resolved are skipped with no
    /// placeholder; output order equals source order with the gaps
    /// removed. The result's similarity is the mean per-track score
    /// rescaled to a percentage, 0 when nothing resolved.
    pub async fn convert(
        &self,
        url: &str,
        target: Platform,
    ) -> Result<Playlist, ConvertError> {
        let locator = classify(url)
            .ok_or_else(|| ConvertError::InvalidUrl(url.to_string()))?;
        if locator.platform == target {
            return Err(ConvertError::InvalidUrl(format!(
                "playlist is already on {target}"
            )));
        }

        let source = self.fetch_by_locator(&locator).await?;
        info!(
            source = %locator.platform,
            target = %target,
            tracks = source.tracks.len(),
            "convert.start"
        );

        // Resolutions are independent; fan out under a bounded permit
        // pool and collect in spawn order to keep the source ordering.
        let semaphore = Arc::new(Semaphore::new(self.limits.resolve_concurrency));
        let mut handles = Vec::with_capacity(source.tracks.len());
        for src_track in source.tracks.iter().cloned() {
            let resolver = self.resolver.clone();
            let semaphore = semaphore.clone();
            let query = src_track.query_for(target).to_string();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| ConvertError::Task(format!("semaphore: {e}")))?;
                let resolved = resolver.resolve(&query, target).await?;
                Ok::<_, ConvertError>(resolved.map(|track| {
                    let score = calculate_similarity(&src_track, &track);
                    (track, score)
                }))
            }));
        }

        let mut tracks: Vec<Track> = Vec::new();
        let mut total_duration: u64 = 0;
        let mut total_similarity: f64 = 0.0;
        for handle in handles {
            let outcome = handle
                .await
                .map_err(|e| ConvertError::Task(e.to_string()))??;
            match outcome {
                Some((track, score)) => {
                    total_duration += track.duration;
                    total_similarity += score;
                    tracks.push(track);
                }
                None => warn!(target = %target, "convert.track.skipped"),
            }
        }

        let track_count = tracks.len();
        let similarity = if track_count > 0 {
            (total_similarity / track_count as f64) / MAX_SCORE * 100.0
        } else {
            0.0
        };
        info!(
            resolved = track_count,
            skipped = source.tracks.len() - track_count,
            similarity,
            "convert.done"
        );

        Ok(Playlist {
            id: String::new(),
            title: String::new(),
            description: String::new(),
            thumbnail: String::new(),
            author: String::new(),
            duration: total_duration,
            track_count,
            tracks,
            platform: target,
            similarity,
        })
    }
}
