//!
//! src/resolver.rs
//!
//! Resolves a search query to its best-matching track on the
//! target platform, cache first. Search failures and empty result
//! sets both come back as a miss, never as an error.
//!
//!

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::TrackCache;
use crate::errors::ConvertError;
use crate::fetch::Clients;
use crate::normalize;
use crate::types::{Platform, Track};

#[derive(Clone)]
pub struct Resolver {
    cache: Arc<TrackCache>,
    clients: Clients,
}

impl Resolver {
    pub fn new(cache: Arc<TrackCache>, clients: Clients) -> Self {
        Self { cache, clients }
    }

    /// Find the target platform's counterpart for a search query.
    ///
    /// Cache hit returns the cached track as-is. On a miss the target
    /// platform is searched once, only the first-ranked candidate is
    /// normalized and cached, and ranking among candidates is left to
    /// the platform. `Ok(None)` means the track could not be resolved;
    /// `Err` is reserved for cache faults.
    pub async fn resolve(
        &self,
        query: &str,
        target: Platform,
    ) -> Result<Option<Track>, ConvertError> {
        if let Some(track) = self.cache.get(query).await? {
            debug!(query, platform = %target, "resolve.cache.hit");
            return Ok(Some(track));
        }

        let candidates = match self.clients.platform(target).search(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(query, platform = %target, error = ?e, "resolve.search.failed");
                return Ok(None);
            }
        };

        let first = match candidates.first() {
            Some(first) => first,
            None => {
                debug!(query, platform = %target, "resolve.search.empty");
                return Ok(None);
            }
        };

        let track = normalize::canonicalize(first);
        // Never cache a miss; only a complete successful search lands here.
        self.cache.put(query, &track).await?;
        debug!(query, platform = %target, track = %track.id, "resolve.done");
        Ok(Some(track))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::config::CacheConfig;
    use crate::fetch::MusicPlatform;
    use crate::payload::{NativePlaylist, NativeTrack, SpotifyTrack};
    use crate::types::SONG_CACHE_EXPIRY_SECS;

    struct FakePlatform {
        results: HashMap<String, Vec<NativeTrack>>,
        fail_search: bool,
        search_calls: AtomicUsize,
    }

    impl FakePlatform {
        fn with_results(results: HashMap<String, Vec<NativeTrack>>) -> Self {
            Self { results, fail_search: false, search_calls: AtomicUsize::new(0) }
        }
        fn failing() -> Self {
            Self {
                results: HashMap::new(),
                fail_search: true,
                search_calls: AtomicUsize::new(0),
            }
        }
        fn calls(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MusicPlatform for FakePlatform {
        async fn playlist(&self, _id: &str) -> Result<NativePlaylist, ConvertError> {
            Err(ConvertError::NotFound(Platform::Spotify))
        }
        async fn search(&self, query: &str) -> Result<Vec<NativeTrack>, ConvertError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_search {
                return Err(ConvertError::Http("search unavailable".into()));
            }
            Ok(self.results.get(query).cloned().unwrap_or_default())
        }
    }

    fn spotify_candidate(id: &str, title: &str) -> NativeTrack {
        NativeTrack::Spotify(SpotifyTrack {
            id: Some(id.into()),
            name: Some(title.into()),
            duration_ms: Some(180_000),
            ..Default::default()
        })
    }

    // File-backed per-test cache; the TempDir must outlive the pool.
    async fn temp_cache() -> (Arc<TrackCache>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let cfg = CacheConfig {
            db_url: format!("sqlite:{}/cache.db", dir.path().display()),
            ttl_secs: SONG_CACHE_EXPIRY_SECS,
        };
        (Arc::new(TrackCache::init(&cfg).await.unwrap()), dir)
    }

    fn clients_of(fake: Arc<FakePlatform>) -> Clients {
        Clients { spotify: fake.clone(), youtube: fake }
    }

    #[tokio::test]
    async fn second_resolve_for_same_query_hits_the_cache() {
        let mut results = HashMap::new();
        results.insert("q".to_string(), vec![spotify_candidate("t1", "Song")]);
        let fake = Arc::new(FakePlatform::with_results(results));
        let (cache, _dir) = temp_cache().await;
        let resolver = Resolver::new(cache, clients_of(fake.clone()));

        let first = resolver.resolve("q", Platform::Spotify).await.unwrap().unwrap();
        let second = resolver.resolve("q", Platform::Spotify).await.unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn only_the_first_candidate_is_taken() {
        let mut results = HashMap::new();
        results.insert(
            "q".to_string(),
            vec![spotify_candidate("best", "Song"), spotify_candidate("worse", "Song")],
        );
        let fake = Arc::new(FakePlatform::with_results(results));
        let (cache, _dir) = temp_cache().await;
        let resolver = Resolver::new(cache, clients_of(fake));

        let track = resolver.resolve("q", Platform::Spotify).await.unwrap().unwrap();
        assert_eq!(track.id, "best");
    }

    #[tokio::test]
    async fn empty_search_is_a_miss_and_is_not_cached() {
        let fake = Arc::new(FakePlatform::with_results(HashMap::new()));
        let (cache, _dir) = temp_cache().await;
        let resolver = Resolver::new(cache, clients_of(fake.clone()));

        assert!(resolver.resolve("q", Platform::Spotify).await.unwrap().is_none());
        assert!(resolver.resolve("q", Platform::Spotify).await.unwrap().is_none());
        // no negative caching: both calls reached the platform
        assert_eq!(fake.calls(), 2);
    }

    #[tokio::test]
    async fn search_failure_is_absorbed_into_a_miss() {
        let fake = Arc::new(FakePlatform::failing());
        let (cache, _dir) = temp_cache().await;
        let resolver = Resolver::new(cache, clients_of(fake.clone()));

        assert!(resolver.resolve("q", Platform::Youtube).await.unwrap().is_none());
        assert_eq!(fake.calls(), 1);
    }
}
