//!
//! src/config.rs
//!
//! Environment-backed configuration for the converter:
//! platform credentials, http client tuning, cache location
//! and logging directives
//!
//!

use std::time;

use url::Url;

use crate::errors::ConvertError;
use crate::types::SONG_CACHE_EXPIRY_SECS;

/// Constants for HTTP Config
pub const HTTP_TIMEOUT: u64 = 8000;
pub const HTTP_CONNECT_TIMEOUT: u64 = 2000;
pub const HTTP_POOL_MAX_IDLE: usize = 16;
pub const HTTP_POOL_IDLE_TIMEOUT: u64 = 90000;
pub const HTTP_MAX_REDIRECTS: u8 = 4;

/// Wrapper over env::var to return an invalid environment var error
fn env_check(s: &str) -> Result<String, ConvertError> {
    match std::env::var(s) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConvertError::Config(format!("{s} was not set"))),
    }
}

/// Ensures that url is https
fn ensure_https(url: &Url) -> Result<(), String> {
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(format!("URL must be https: {url}"))
    }
}

fn ensure_host(url: &Url, expected_host: &str) -> Result<(), String> {
    match url.host_str() {
        Some(h) if h.eq_ignore_ascii_case(expected_host) => Ok(()),
        Some(h) => Err(
            format!("Unexpected host for {url} (got {h}, expected {expected_host})")
        ),
        None => Err(format!("URL missing host: {url}")),
    }
}

fn ensure_trailing_slash(url: &mut Url) {
    if !url.path().ends_with('/') {
        let mut path = url.path().to_string();
        path.push('/');
        url.set_path(&path);
    }
}

fn env_to_uint(s: &str, default: u32) -> u32 {
    match std::env::var(s) {
        Ok(v) => v.parse::<u32>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Configuration that Spotify expects when hitting endpoints
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: Url,
    pub api_base: Url,
    pub search_limit: u32,
}

fn build_spotify() -> Result<SpotifyConfig, ConvertError> {
    let client_id = env_check("SPOTIFY_CLIENT_ID")?;
    let client_secret = env_check("SPOTIFY_CLIENT_SECRET")?;

    // form urls
    let token_url = std::env::var("SPOTIFY_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string());
    let api_base = std::env::var("SPOTIFY_API_BASE")
        .unwrap_or_else(|_| "https://api.spotify.com/v1/".to_string());

    let token_url = Url::parse(&token_url)
        .map_err(|_| ConvertError::Config("SPOTIFY_TOKEN_URL invalid".to_string()))?;
    let mut api_base = Url::parse(&api_base)
        .map_err(|_| ConvertError::Config("SPOTIFY_API_BASE invalid".to_string()))?;

    // ensure valid https and hostname for both urls
    ensure_https(&token_url).map_err(ConvertError::Config)?;
    ensure_https(&api_base).map_err(ConvertError::Config)?;
    ensure_host(&token_url, "accounts.spotify.com").map_err(ConvertError::Config)?;
    ensure_host(&api_base, "api.spotify.com").map_err(ConvertError::Config)?;

    ensure_trailing_slash(&mut api_base);

    let search_limit = env_to_uint("SPOTIFY_SEARCH_LIMIT", 1);

    Ok(SpotifyConfig { client_id, client_secret, token_url, api_base, search_limit })
}

/// Configuration for the ytmusic bridge API. Typically a self-hosted
/// service, so no scheme or host is enforced.
#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    pub api_base: Url,
    pub search_limit: u32,
}

fn build_youtube() -> Result<YouTubeConfig, ConvertError> {
    let api_base = std::env::var("YTMUSIC_API_BASE")
        .unwrap_or_else(|_| "http://127.0.0.1:9863/".to_string());
    let mut api_base = Url::parse(&api_base)
        .map_err(|e| ConvertError::Config(format!("YTMUSIC_API_BASE invalid {e}")))?;

    ensure_trailing_slash(&mut api_base);

    let search_limit = env_to_uint("YTMUSIC_SEARCH_LIMIT", 1);

    Ok(YouTubeConfig { api_base, search_limit })
}

///
/// Configuration for Http timeouts, pooling, etc.
///
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: time::Duration,
    pub connect_timeout: time::Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: time::Duration,
    pub max_redirects: u8,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: time::Duration::from_millis(HTTP_TIMEOUT),
            connect_timeout: time::Duration::from_millis(HTTP_CONNECT_TIMEOUT),
            pool_max_idle_per_host: HTTP_POOL_MAX_IDLE,
            pool_idle_timeout: time::Duration::from_millis(HTTP_POOL_IDLE_TIMEOUT),
            max_redirects: HTTP_MAX_REDIRECTS,
        }
    }
}

///
/// Configuration for the resolution cache
///
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub db_url: String,
    pub ttl_secs: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            db_url: "sqlite:./data/cache.db".to_string(),
            ttl_secs: SONG_CACHE_EXPIRY_SECS,
        }
    }
}

fn build_cache() -> CacheConfig {
    let mut cfg = CacheConfig::default();
    if let Ok(db_url) = std::env::var("CACHE_DB_URL") {
        if !db_url.trim().is_empty() {
            cfg.db_url = db_url;
        }
    }
    cfg
}

///
/// Limits on the conversion fan-out
///
#[derive(Debug, Clone)]
pub struct ConvertLimits {
    pub resolve_concurrency: usize,
}

impl Default for ConvertLimits {
    fn default() -> Self {
        Self { resolve_concurrency: 8 }
    }
}

///
/// Configuration for Logger
///
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub include_file_line: bool,
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter_directives: "info,playlist_converter=debug,reqwest=warn".to_string(),
            include_file_line: true,
            include_target: true,
        }
    }
}

///
/// AppConfig which holds everything the converter needs at startup
///
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub spotify: SpotifyConfig,
    pub youtube: YouTubeConfig,
    pub http: HttpConfig,
    pub cache: CacheConfig,
    pub limits: ConvertLimits,
    pub logging: LoggingConfig,
}

///
/// Return all environment variables to caller at program start.
///
pub fn load_config() -> Result<AppConfig, ConvertError> {
    dotenvy::dotenv().ok();

    let spotify = build_spotify()?;
    let youtube = build_youtube()?;
    let http = HttpConfig::default();
    let cache = build_cache();
    let limits = ConvertLimits::default();
    let logging = LoggingConfig::default();

    Ok(AppConfig { spotify, youtube, http, cache, limits, logging })
}
