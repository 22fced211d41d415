//! Unified error type for the launchmap pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("geocode: no results for address {0:?}")]
    NotFound(String),

    #[error("source unavailable (status={status}): {message}")]
    SourceUnavailable { status: u16, message: String },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("cache write failed: {0}")]
    CacheWrite(String),
}
