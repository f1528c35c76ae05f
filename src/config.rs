//! Configuration management with XDG paths
//!
//! ~/.config/folio/config.json   - site/API location, API key, retry tuning (0600)
//! ~/.local/state/folio/         - theme preference, log file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;

use crate::theme::Theme;

const APP_NAME: &str = "folio";

/// Get config directory (~/.config/folio/)
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get state directory (~/.local/state/folio/)
pub fn state_dir() -> Result<PathBuf> {
    let base = dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/state")))
        .context("Could not determine state directory")?;
    Ok(base.join(APP_NAME))
}

/// Get config file path
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Ensure all directories exist
pub fn ensure_dirs() -> Result<()> {
    fs::create_dir_all(config_dir()?)?;
    fs::create_dir_all(state_dir()?)?;
    Ok(())
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Origin serving `/profile.json`, and the API when `api_url` is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,

    /// API base URL; empty or unset means the site origin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Sent as `Authorization: Api-Key <key>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Read the backup document from disk instead of the site
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,

    /// Per-request timeout (ms)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries after the first failed API attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry n waits `retry_base_ms * n`
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,

    /// Theme used until the user toggles one
    #[serde(default)]
    pub initial_theme: Theme,
}

fn default_timeout_ms() -> u64 { 10_000 }
fn default_max_retries() -> u32 { 5 }
fn default_retry_base_ms() -> u64 { 2_000 }

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: None,
            api_url: None,
            api_key: None,
            backup_path: None,
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            retry_base_ms: default_retry_base_ms(),
            initial_theme: Theme::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// File contents only; used when the result is saved back
    pub fn load_file() -> Result<Self> {
        ensure_dirs()?;
        let path = config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Save config to disk with secure permissions
    pub fn save(&self) -> Result<()> {
        ensure_dirs()?;
        let path = config_path()?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, &content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        // Set permissions to 0600 (owner read/write only) for API key security
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;

        Ok(())
    }

    /// Environment variables take precedence over the file
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| var(key).filter(|v| !v.is_empty());
        if let Some(v) = non_empty("FOLIO_SITE_URL") {
            self.site_url = Some(v);
        }
        if let Some(v) = non_empty("FOLIO_API_URL") {
            self.api_url = Some(v);
        }
        if let Some(v) = non_empty("FOLIO_API_KEY") {
            self.api_key = Some(v);
        }
    }

    /// Origin without a trailing slash; empty when unset
    pub fn site_origin(&self) -> String {
        self.site_url
            .as_deref()
            .unwrap_or("")
            .trim_end_matches('/')
            .to_string()
    }

    /// API base, falling back to the site origin
    pub fn api_base(&self) -> String {
        match self.api_url.as_deref().map(|u| u.trim_end_matches('/')) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => self.site_origin(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Set a value by CLI key name
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "site" | "site_url" => self.site_url = Some(value.to_string()),
            "api" | "api_url" => self.api_url = Some(value.to_string()),
            "key" | "api_key" => self.api_key = Some(value.to_string()),
            "backup" | "backup_path" => self.backup_path = Some(PathBuf::from(value)),
            "theme" | "initial_theme" => {
                self.initial_theme = Theme::parse(value)
                    .with_context(|| format!("Unknown theme: {}. Valid: light, dark", value))?;
            }
            _ => anyhow::bail!("Unknown config key: {}. Valid keys: site, api, key, backup, theme", key),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let cfg = Config::default();
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.max_retries, 5);
        assert_eq!(cfg.retry_base_ms, 2000);
        assert_eq!(cfg.initial_theme, Theme::Dark);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"site_url":"https://me.dev"}"#).unwrap();
        assert_eq!(cfg.timeout_ms, 10_000);
        assert_eq!(cfg.api_base(), "https://me.dev");
    }

    #[test]
    fn test_api_base_prefers_api_url() {
        let cfg = Config {
            site_url: Some("https://me.dev/".into()),
            api_url: Some("https://api.me.dev/".into()),
            ..Default::default()
        };
        assert_eq!(cfg.site_origin(), "https://me.dev");
        assert_eq!(cfg.api_base(), "https://api.me.dev");

        let cfg = Config { api_url: Some(String::new()), ..Default::default() };
        assert_eq!(cfg.api_base(), "");
    }

    #[test]
    fn test_env_overrides() {
        let mut cfg = Config { api_key: Some("file-key".into()), ..Default::default() };
        cfg.apply_env(|key| match key {
            "FOLIO_API_KEY" => Some("env-key".into()),
            "FOLIO_API_URL" => Some(String::new()),
            _ => None,
        });
        assert_eq!(cfg.api_key.as_deref(), Some("env-key"));
        assert!(cfg.api_url.is_none());
    }

    #[test]
    fn test_config_set() {
        let mut cfg = Config::default();
        cfg.set("theme", "light").unwrap();
        cfg.set("key", "abc").unwrap();
        assert_eq!(cfg.initial_theme, Theme::Light);
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert!(cfg.set("theme", "sepia").is_err());
        assert!(cfg.set("colour", "x").is_err());

        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("abc"));
    }
}
