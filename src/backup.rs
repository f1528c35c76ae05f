//! Static backup document loader
//!
//! `/profile.json` on the site origin holds the same payloads as the API,
//! aggregated into one document. It can also be read from a local file.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::BackupDocument;

pub const BACKUP_PATH: &str = "/profile.json";

#[async_trait]
pub trait BackupSource: Send + Sync {
    async fn load(&self) -> Result<BackupDocument, ApiError>;
}

/// Where the backup document lives
#[derive(Debug, Clone, PartialEq)]
pub enum BackupLocation {
    Url(String),
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct BackupLoader {
    http: reqwest::Client,
    location: BackupLocation,
}

impl BackupLoader {
    pub fn new(location: BackupLocation, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                url: BACKUP_PATH.to_string(),
                source,
            })?;
        Ok(Self { http, location })
    }

    /// Local file when `backup_path` is set, otherwise `<site>/profile.json`.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let location = match &config.backup_path {
            Some(path) => BackupLocation::File(path.clone()),
            None => BackupLocation::Url(format!("{}{}", config.site_origin(), BACKUP_PATH)),
        };
        Self::new(location, config.timeout())
    }

    pub fn location(&self) -> &BackupLocation {
        &self.location
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { url: url.to_string(), source })?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl BackupSource for BackupLoader {
    async fn load(&self) -> Result<BackupDocument, ApiError> {
        let (what, body) = match &self.location {
            BackupLocation::Url(url) => {
                debug!(%url, "loading backup document");
                (url.clone(), self.fetch(url).await?)
            }
            BackupLocation::File(path) => {
                debug!(path = %path.display(), "reading backup document");
                let body = tokio::fs::read(path).await.map_err(|source| ApiError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                (path.display().to_string(), body)
            }
        };

        serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            what,
            message: e.to_string(),
        })
    }
}
