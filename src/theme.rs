//! Light/dark theme preference
//!
//! The only thing folio persists: `{"theme": "dark"}` in the state
//! directory. A missing or unreadable file falls back to the configured
//! initial theme.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn name(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Light => "☀️",
            Theme::Dark => "🌙",
        }
    }

    pub fn parse(s: &str) -> Option<Theme> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Next theme in `options`, wrapping around. Unknown current -> first option.
    pub fn next_in(&self, options: &[Theme]) -> Theme {
        match options.iter().position(|t| t == self) {
            Some(idx) => options[(idx + 1) % options.len()],
            None => options.first().copied().unwrap_or(*self),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemeFile {
    theme: Theme,
}

/// Reads and writes the persisted theme.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the XDG state directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(config::state_dir()?.join("theme.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved theme, or `initial` when nothing usable is stored.
    pub fn load(&self, initial: Theme) -> Theme {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return initial;
        };
        match serde_json::from_str::<ThemeFile>(&content) {
            Ok(file) => file.theme,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable theme preference");
                initial
            }
        }
    }

    pub fn save(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string(&ThemeFile { theme })?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Advance to the next option and persist it.
    pub fn toggle(&self, current: Theme, options: &[Theme]) -> Result<Theme> {
        let next = current.next_in(options);
        self.save(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_initial() {
        let dir = TempDir::new().unwrap();
        let store = ThemeStore::new(dir.path().join("theme.json"));
        assert_eq!(store.load(Theme::Light), Theme::Light);
        assert_eq!(store.load(Theme::Dark), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists() {
        let dir = TempDir::new().unwrap();
        let store = ThemeStore::new(dir.path().join("nested").join("theme.json"));
        let options = [Theme::Light, Theme::Dark];

        let next = store.toggle(Theme::Dark, &options).unwrap();
        assert_eq!(next, Theme::Light);
        assert_eq!(store.load(Theme::Dark), Theme::Light);

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, r#"{"theme":"light"}"#);
    }

    #[test]
    fn test_garbage_file_uses_initial() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("theme.json");
        fs::write(&path, "purple").unwrap();
        assert_eq!(ThemeStore::new(path).load(Theme::Dark), Theme::Dark);
    }

    #[test]
    fn test_next_in_wraps() {
        let options = [Theme::Light, Theme::Dark];
        assert_eq!(Theme::Light.next_in(&options), Theme::Dark);
        assert_eq!(Theme::Dark.next_in(&options), Theme::Light);
        assert_eq!(Theme::Dark.next_in(&[Theme::Light]), Theme::Light);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Theme::parse(" Dark "), Some(Theme::Dark));
        assert_eq!(Theme::parse("sepia"), None);
    }
}
