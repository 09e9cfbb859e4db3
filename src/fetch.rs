//!
//! src/fetch.rs
//!
//! Platform collaborators: the MusicPlatform trait the engine
//! resolves against, plus the concrete reqwest clients for the
//! Spotify web API and a ytmusic-style JSON API.
//!
//!

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{header, redirect, Client, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::{HttpConfig, SpotifyConfig, YouTubeConfig};
use crate::errors::ConvertError;
use crate::payload::{
    NativePlaylist, NativeTrack, SpotifyPlaylist, SpotifySearchResponse, YoutubePlaylist,
    YoutubeTrack,
};
use crate::types::Platform;

/// Client building functionality
fn client_helper(http: &HttpConfig) -> reqwest::ClientBuilder {
    Client::builder()
        .timeout(http.timeout)
        .connect_timeout(http.connect_timeout)
        .pool_max_idle_per_host(http.pool_max_idle_per_host)
        .pool_idle_timeout(Some(http.pool_idle_timeout))
        .redirect(redirect::Policy::limited(http.max_redirects as usize))
}

pub fn base_client(http: &HttpConfig) -> Result<Client, ConvertError> {
    let mut h = header::HeaderMap::new();
    h.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
    client_helper(http)
        .default_headers(h)
        .build()
        .map_err(|e| ConvertError::Http(format!("build client: {e}")))
}

/// What the engine needs from a streaming platform: fetch a native
/// playlist by id and search for tracks by query text. Concrete reqwest
/// clients implement this in production; tests substitute fakes.
#[async_trait]
pub trait MusicPlatform: Send + Sync {
    async fn playlist(&self, playlist_id: &str) -> Result<NativePlaylist, ConvertError>;
    async fn search(&self, query: &str) -> Result<Vec<NativeTrack>, ConvertError>;
}

/// One collaborator per supported platform.
#[derive(Clone)]
pub struct Clients {
    pub spotify: Arc<dyn MusicPlatform>,
    pub youtube: Arc<dyn MusicPlatform>,
}

impl Clients {
    pub fn platform(&self, platform: Platform) -> Arc<dyn MusicPlatform> {
        match platform {
            Platform::Spotify => self.spotify.clone(),
            Platform::Youtube => self.youtube.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    bearer: String,
    expires_at: Instant,
}

pub struct SpotifyClient {
    http: Client,
    cfg: SpotifyConfig,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    pub fn new(http_config: &HttpConfig, cfg: &SpotifyConfig) -> Result<Self, ConvertError> {
        let http = base_client(http_config)?;
        Ok(Self { http, cfg: cfg.clone(), token: Mutex::new(None) })
    }

    /// Client-credentials bearer token, cached until shortly before its
    /// reported expiry.
    async fn bearer(&self) -> Result<String, ConvertError> {
        let mut slot = self.token.lock().await;
        if let Some(cached) = slot.as_ref() {
            if Instant::now() < cached.expires_at {
                return Ok(cached.bearer.clone());
            }
        }

        let response = self
            .http
            .post(self.cfg.token_url.clone())
            .basic_auth(&self.cfg.client_id, Some(&self.cfg.client_secret))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ConvertError::Http(format!(
                "spotify token request failed: {}",
                response.status()
            )));
        }
        let token: TokenResponse = response.json().await?;
        let lifetime = token.expires_in.unwrap_or(3600).saturating_sub(30);
        let bearer = token.access_token.clone();
        *slot = Some(CachedToken {
            bearer: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });
        Ok(bearer)
    }
}

#[async_trait]
impl MusicPlatform for SpotifyClient {
    /// GET /v1/playlists/{id}
    async fn playlist(&self, playlist_id: &str) -> Result<NativePlaylist, ConvertError> {
        let bearer = self.bearer().await?;
        let url = self
            .cfg
            .api_base
            .join(&format!("playlists/{playlist_id}"))
            .map_err(|e| ConvertError::Http(format!("playlist url: {e}")))?;
        let response = self.http.get(url).bearer_auth(bearer).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            return Err(ConvertError::NotFound(Platform::Spotify));
        }
        if !status.is_success() {
            return Err(ConvertError::Http(format!("spotify playlist: {status}")));
        }
        let playlist: SpotifyPlaylist = response.json().await?;
        Ok(NativePlaylist::Spotify(playlist))
    }

    /// GET /v1/search?type=track&q=...&limit=...
    async fn search(&self, query: &str) -> Result<Vec<NativeTrack>, ConvertError> {
        let bearer = self.bearer().await?;
        let url = self
            .cfg
            .api_base
            .join("search")
            .map_err(|e| ConvertError::Http(format!("search url: {e}")))?;
        let response = self
            .http
            .get(url)
            .bearer_auth(bearer)
            .query(&[
                ("type", "track"),
                ("q", query),
                ("limit", &self.cfg.search_limit.to_string()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ConvertError::Http(format!(
                "spotify search: {}",
                response.status()
            )));
        }
        let parsed: SpotifySearchResponse = response.json().await?;
        let items = parsed.tracks.and_then(|t| t.items).unwrap_or_default();
        Ok(items.into_iter().map(NativeTrack::Spotify).collect())
    }
}

pub struct YouTubeClient {
    http: Client,
    cfg: YouTubeConfig,
}

impl YouTubeClient {
    pub fn new(http_config: &HttpConfig, cfg: &YouTubeConfig) -> Result<Self, ConvertError> {
        let http = base_client(http_config)?;
        Ok(Self { http, cfg: cfg.clone() })
    }
}

#[async_trait]
impl MusicPlatform for YouTubeClient {
    /// GET {base}/playlists/{id}
    async fn playlist(&self, playlist_id: &str) -> Result<NativePlaylist, ConvertError> {
        let url = self
            .cfg
            .api_base
            .join(&format!("playlists/{playlist_id}"))
            .map_err(|e| ConvertError::Http(format!("playlist url: {e}")))?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ConvertError::NotFound(Platform::Youtube));
        }
        if !status.is_success() {
            return Err(ConvertError::Http(format!("youtube playlist: {status}")));
        }
        let playlist: YoutubePlaylist = response.json().await?;
        Ok(NativePlaylist::Youtube(playlist))
    }

    /// GET {base}/search?query=...&filter=songs&limit=...
    async fn search(&self, query: &str) -> Result<Vec<NativeTrack>, ConvertError> {
        let url = self
            .cfg
            .api_base
            .join("search")
            .map_err(|e| ConvertError::Http(format!("search url: {e}")))?;
        let response = self
            .http
            .get(url)
            .query(&[
                ("query", query),
                ("filter", "songs"),
                ("limit", &self.cfg.search_limit.to_string()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ConvertError::Http(format!(
                "youtube search: {}",
                response.status()
            )));
        }
        let tracks: Vec<YoutubeTrack> = response.json().await?;
        Ok(tracks.into_iter().map(NativeTrack::Youtube).collect())
    }
}
