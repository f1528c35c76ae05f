//! Portfolio API client
//!
//! Thin wrapper over reqwest: one base URL, a per-request timeout, an
//! `Api-Key` authorization header and a cookie store so the API session
//! survives between calls. Every non-2xx answer becomes `ApiError::Status`.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{RawExperience, RawProfile, RawProject, RawSkill, RawSocialLink, SourceDocuments};

pub const PROFILE_PATH: &str = "/api/me/profile/";
pub const PROJECTS_PATH: &str = "/api/me/projects/";
pub const SKILLS_PATH: &str = "/api/me/skills/";
pub const EXPERIENCE_PATH: &str = "/api/me/experience/";
pub const SOCIAL_LINKS_PATH: &str = "/api/me/social-links/";

/// All five, in fetch order.
pub const ENDPOINTS: [&str; 5] =
    [PROFILE_PATH, PROJECTS_PATH, SKILLS_PATH, EXPERIENCE_PATH, SOCIAL_LINKS_PATH];

/// Default per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// The five list endpoints the portfolio is assembled from.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn profile(&self) -> Result<RawProfile, ApiError>;
    async fn projects(&self) -> Result<Vec<RawProject>, ApiError>;
    async fn skills(&self) -> Result<Vec<RawSkill>, ApiError>;
    async fn experience(&self) -> Result<Vec<RawExperience>, ApiError>;
    async fn social_links(&self) -> Result<Vec<RawSocialLink>, ApiError>;

    /// One attempt: all five requests in flight together, each settling on
    /// its own. A failure in one never cancels the others.
    async fn fetch_all(&self) -> RemoteBundle {
        let (profile, projects, skills, experience, social_links) = futures::join!(
            self.profile(),
            self.projects(),
            self.skills(),
            self.experience(),
            self.social_links(),
        );
        RemoteBundle {
            profile,
            projects,
            skills,
            experience,
            social_links,
        }
    }
}

/// Independently settled results of one attempt.
#[derive(Debug)]
pub struct RemoteBundle {
    pub profile: Result<RawProfile, ApiError>,
    pub projects: Result<Vec<RawProject>, ApiError>,
    pub skills: Result<Vec<RawSkill>, ApiError>,
    pub experience: Result<Vec<RawExperience>, ApiError>,
    pub social_links: Result<Vec<RawSocialLink>, ApiError>,
}

impl RemoteBundle {
    /// At least one endpoint answered. Partial success counts as success.
    pub fn any_success(&self) -> bool {
        self.profile.is_ok()
            || self.projects.is_ok()
            || self.skills.is_ok()
            || self.experience.is_ok()
            || self.social_links.is_ok()
    }

    /// Endpoint path and error for every failed request.
    pub fn failures(&self) -> Vec<(&'static str, &ApiError)> {
        let mut out = Vec::new();
        if let Err(e) = &self.profile {
            out.push((PROFILE_PATH, e));
        }
        if let Err(e) = &self.projects {
            out.push((PROJECTS_PATH, e));
        }
        if let Err(e) = &self.skills {
            out.push((SKILLS_PATH, e));
        }
        if let Err(e) = &self.experience {
            out.push((EXPERIENCE_PATH, e));
        }
        if let Err(e) = &self.social_links {
            out.push((SOCIAL_LINKS_PATH, e));
        }
        out
    }

    /// Successful payloads; failed endpoints become empty values.
    pub fn into_documents(self) -> SourceDocuments {
        SourceDocuments {
            profile: self.profile.unwrap_or_default(),
            projects: self.projects.unwrap_or_default(),
            skills: self.skills.unwrap_or_default(),
            experience: self.experience.unwrap_or_default(),
            social_links: self.social_links.unwrap_or_default(),
        }
    }
}

/// HTTP implementation of `RemoteSource`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(&config.api_base(), config.api_key.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Single project by slug
    pub async fn project(&self, slug: &str) -> Result<RawProject, ApiError> {
        self.get(&format!("{}{}/", PROJECTS_PATH, slug)).await
    }

    /// Single skill by id
    pub async fn skill(&self, id: u64) -> Result<RawSkill, ApiError> {
        self.get(&format!("{}{}/", SKILLS_PATH, id)).await
    }

    /// Single experience entry by id
    pub async fn experience_entry(&self, id: u64) -> Result<RawExperience, ApiError> {
        self.get(&format!("{}{}/", EXPERIENCE_PATH, id)).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let mut request = self.http.get(&url).header(CONTENT_TYPE, "application/json");
        if let Some(key) = &self.api_key {
            request = request.header(AUTHORIZATION, format!("Api-Key {}", key));
        }

        let response = request.send().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

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
            .map_err(|source| ApiError::Transport { url, source })?;

        serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            what: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl RemoteSource for ApiClient {
    async fn profile(&self) -> Result<RawProfile, ApiError> {
        self.get(PROFILE_PATH).await
    }

    async fn projects(&self) -> Result<Vec<RawProject>, ApiError> {
        self.get(PROJECTS_PATH).await
    }

    async fn skills(&self) -> Result<Vec<RawSkill>, ApiError> {
        self.get(SKILLS_PATH).await
    }

    async fn experience(&self) -> Result<Vec<RawExperience>, ApiError> {
        self.get(EXPERIENCE_PATH).await
    }

    async fn social_links(&self) -> Result<Vec<RawSocialLink>, ApiError> {
        self.get(SOCIAL_LINKS_PATH).await
    }
}
