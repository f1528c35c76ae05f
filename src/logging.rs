//! Tracing subscriber setup
//!
//! The TUI owns stdout, so everything goes to a log file in the state
//! directory. `FOLIO_LOG` takes the usual `EnvFilter` directives.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config;

pub const LOG_ENV: &str = "FOLIO_LOG";
pub const LOG_FILE: &str = "folio.log";

pub fn default_log_path() -> Result<PathBuf> {
    Ok(config::state_dir()?.join(LOG_FILE))
}

/// Install the global subscriber, appending to `path`.
pub fn init(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    build_subscriber(file, std::env::var(LOG_ENV).ok().as_deref())
        .try_init()
        .context("Tracing subscriber already installed")?;
    Ok(())
}

/// Filter directives fall back to `info` when unset or unparseable.
pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

pub fn build_subscriber(
    log_file: File,
    directives: Option<&str>,
) -> impl tracing::Subscriber + Send + Sync {
    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter(directives))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_events_land_in_file() {
        let log_file = NamedTempFile::new().unwrap();
        let subscriber = build_subscriber(log_file.reopen().unwrap(), Some("debug"));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(attempt = 3, "remote attempt failed");
        });

        let written = std::fs::read_to_string(log_file.path()).unwrap();
        assert!(written.contains("remote attempt failed"));
        assert!(written.contains("attempt=3"));
    }

    #[test]
    fn test_default_level_drops_debug() {
        let log_file = NamedTempFile::new().unwrap();
        let subscriber = build_subscriber(log_file.reopen().unwrap(), None);

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("hidden");
            tracing::info!("shown");
        });

        let written = std::fs::read_to_string(log_file.path()).unwrap();
        assert!(!written.contains("hidden"));
        assert!(written.contains("shown"));
    }
}
