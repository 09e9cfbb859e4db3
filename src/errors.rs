//!
//! src/errors.rs
//!
//! Defines the error taxonomy of the converter and
//! conversions from library errors
//!
//!

use thiserror::Error;

use crate::types::Platform;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("config error: {0}")]
    Config(String),
    #[error("playlist url is invalid: {0}")]
    InvalidUrl(String),
    #[error("playlist not found on {0}")]
    NotFound(Platform),
    #[error("http error: {0}")]
    Http(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("cache error: {0}")]
    Cache(String),
    #[error("task error: {0}")]
    Task(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ConvertError {
    fn from(e: reqwest::Error) -> Self { ConvertError::Http(e.to_string()) }
}

impl From<serde_json::Error> for ConvertError {
    fn from(e: serde_json::Error) -> Self { ConvertError::Parse(e.to_string()) }
}

impl From<sqlx::Error> for ConvertError {
    fn from(e: sqlx::Error) -> Self { ConvertError::Cache(e.to_string()) }
}

impl From<url::ParseError> for ConvertError {
    fn from(e: url::ParseError) -> Self { ConvertError::InvalidUrl(e.to_string()) }
}
