//!
//! src/main.rs
//!
//! Wires the converter together: configuration, logging, platform
//! clients and the resolution cache, then runs one conversion from
//! the command line and prints the result as JSON
//!
//!

mod cache;
mod classify;
mod config;
mod convert;
mod errors;
mod fetch;
mod logging;
mod normalize;
mod payload;
mod resolver;
mod score;
mod types;

use std::sync::Arc;

use crate::convert::Converter;
use crate::errors::ConvertError;
use crate::fetch::{Clients, SpotifyClient, YouTubeClient};
use crate::types::Platform;

#[tokio::main]
async fn main() -> Result<(), ConvertError> {
    let cfg = config::load_config()?;
    let _guard = logging::init_logging(&cfg.logging)?;

    tracing::info!(
        service = "playlist-converter",
        version = %env!("CARGO_PKG_VERSION"),
        "starting"
    );

    let mut args = std::env::args().skip(1);
    let url = args.next().ok_or_else(|| {
        ConvertError::Config(
            "usage: playlist-converter <playlist-url> <SPOTIFY|YOUTUBE>".to_string(),
        )
    })?;
    let target = args
        .next()
        .and_then(|s| Platform::parse(&s))
        .ok_or_else(|| {
            ConvertError::Config("target platform must be SPOTIFY or YOUTUBE".to_string())
        })?;

    let clients = Clients {
        spotify: Arc::new(SpotifyClient::new(&cfg.http, &cfg.spotify)?),
        youtube: Arc::new(YouTubeClient::new(&cfg.http, &cfg.youtube)?),
    };
    let cache = Arc::new(cache::TrackCache::init(&cfg.cache).await?);
    let purged = cache.purge_expired().await?;
    tracing::debug!(purged, "cache.purge");

    let converter = Converter::new(clients, cache, cfg.limits.clone());

    let playlist = converter.convert(&url, target).await?;
    println!("{}", serde_json::to_string_pretty(&playlist)?);

    Ok(())
}
