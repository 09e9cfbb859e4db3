//!
//! src/cache.rs
//!
//! Resolution cache: a shared sqlite-backed key/value store mapping
//! search-query strings to serialized canonical tracks with a fixed
//! per-entry expiry. Reads never extend an entry's lifetime.
//!
//!

use std::str::FromStr;

use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Row, Sqlite};

use crate::config::CacheConfig;
use crate::errors::ConvertError;
use crate::types::Track;

pub struct TrackCache {
    pool: Pool<Sqlite>,
    ttl_secs: i64,
}

impl TrackCache {
    pub async fn init(cfg: &CacheConfig) -> Result<Self, ConvertError> {
        let options = SqliteConnectOptions::from_str(&cfg.db_url)
            .map_err(|e| ConvertError::Cache(format!("cache url {}: {e}", cfg.db_url)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(8)
            .connect_with(options)
            .await?;

        sqlx::query("PRAGMA journal_mode=WAL;").execute(&pool).await?;
        sqlx::query("PRAGMA synchronous=NORMAL;").execute(&pool).await?;

        let this = Self { pool, ttl_secs: cfg.ttl_secs };
        this.ensure_schema().await?;
        Ok(this)
    }

    async fn ensure_schema(&self) -> Result<(), ConvertError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS songs (
              query       TEXT PRIMARY KEY,
              payload     TEXT NOT NULL,
              expires_at  INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_songs_expiry ON songs(expires_at);"
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    /// Look up a previously resolved track by its search query. Entries
    /// past their expiry are treated as absent.
    pub async fn get(&self, key: &str) -> Result<Option<Track>, ConvertError> {
        let row = sqlx::query(
            "SELECT payload FROM songs WHERE query = ?1 AND expires_at > ?2;"
        )
        .bind(key)
        .bind(Self::now())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let payload: String = row.get("payload");
                let track: Track = serde_json::from_str(&payload)?;
                Ok(Some(track))
            }
            None => Ok(None),
        }
    }

    /// Store a resolved track under its search query. Last write wins on
    /// concurrent puts for the same key; payloads for a given query are
    /// idempotent so this is harmless.
    pub async fn put(&self, key: &str, track: &Track) -> Result<(), ConvertError> {
        let payload = serde_json::to_string(track)?;
        sqlx::query(
            r#"
            INSERT INTO songs (query, payload, expires_at) VALUES (?1, ?2, ?3)
              ON CONFLICT(query) DO UPDATE
                 SET payload = excluded.payload,
                     expires_at = excluded.expires_at;
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(Self::now() + self.ttl_secs)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Drop entries past their expiry. Returns the number removed.
    pub async fn purge_expired(&self) -> Result<u64, ConvertError> {
        let result = sqlx::query("DELETE FROM songs WHERE expires_at <= ?1;")
            .bind(Self::now())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
