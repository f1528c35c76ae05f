//! Error types for the data pipeline
//!
//! Transport, status and decode failures stay distinct so the reconciler
//! can log them precisely. None of them ever reach the rendering layer as
//! a panic or a propagated error: they end up as a snapshot `error` string
//! or a scheduled retry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout, invalid URL.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-2xx status.
    #[error("HTTP Error: {status} {text}")]
    Status { status: u16, text: String },

    /// Body was not the JSON shape we expected.
    #[error("failed to decode {what}: {message}")]
    Decode { what: String, message: String },

    /// Local backup file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport { source, .. } if source.is_timeout())
    }
}
