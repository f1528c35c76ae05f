//! Portfolio data reconciliation
//!
//! Two flows start together:
//!
//! - Flow A loads the backup document once. Success publishes `Backup`,
//!   failure publishes the hard-coded `Fallback` with the error message.
//! - Flow B queries the five API endpoints concurrently. Any successful
//!   endpoint makes the attempt a success and publishes `Remote`; failed
//!   endpoints contribute empty values. A failed attempt is retried after
//!   `base_delay * n` up to `max_retries` times, then gives up silently.
//!
//! Snapshots are replaced whole through a watch channel. A `Remote`
//! snapshot is never replaced by a later `Backup`/`Fallback` publish.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backup::{BackupLoader, BackupSource};
use crate::client::{ApiClient, RemoteSource};
use crate::config::Config;
use crate::content::PortfolioContent;
use crate::error::ApiError;
use crate::fallback;
use crate::transform::transform;

// ═══════════════════════════════════════════════════════════════
// Snapshot
// ═══════════════════════════════════════════════════════════════

/// Where the currently shown content came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Fallback(PortfolioContent),
    Backup(PortfolioContent),
    Remote(PortfolioContent),
}

impl DataSource {
    pub fn content(&self) -> &PortfolioContent {
        match self {
            DataSource::Fallback(c) | DataSource::Backup(c) | DataSource::Remote(c) => c,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Fallback(_) => "fallback",
            DataSource::Backup(_) => "backup",
            DataSource::Remote(_) => "api",
        }
    }
}

/// The single published view of portfolio content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioSnapshot {
    /// `None` until the first flow publishes
    pub data: Option<DataSource>,
    /// Set when the backup failed and the fallback is shown
    pub error: Option<String>,
}

impl PortfolioSnapshot {
    pub fn loading() -> Self {
        Self::default()
    }

    pub fn ready(source: DataSource) -> Self {
        Self { data: Some(source), error: None }
    }

    pub fn is_loading(&self) -> bool {
        self.data.is_none()
    }

    pub fn is_using_api(&self) -> bool {
        matches!(self.data, Some(DataSource::Remote(_)))
    }

    pub fn content(&self) -> Option<&PortfolioContent> {
        self.data.as_ref().map(DataSource::content)
    }

    pub fn source_label(&self) -> &'static str {
        self.data.as_ref().map(DataSource::label).unwrap_or("loading")
    }
}

#[derive(Serialize)]
struct SnapshotView<'a> {
    source: &'static str,
    is_loading: bool,
    is_using_api: bool,
    error: Option<&'a str>,
    #[serde(flatten)]
    content: Option<&'a PortfolioContent>,
}

impl Serialize for PortfolioSnapshot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SnapshotView {
            source: self.source_label(),
            is_loading: self.is_loading(),
            is_using_api: self.is_using_api(),
            error: self.error.as_deref(),
            content: self.content(),
        }
        .serialize(serializer)
    }
}

/// Holds the current snapshot; writers replace it whole.
#[derive(Debug, Clone)]
pub struct SnapshotCell {
    tx: Arc<watch::Sender<PortfolioSnapshot>>,
}

impl Default for SnapshotCell {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotCell {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(PortfolioSnapshot::loading());
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<PortfolioSnapshot> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> PortfolioSnapshot {
        self.tx.borrow().clone()
    }

    /// Replace the snapshot. Returns false when a remote snapshot is kept
    /// over a non-remote one.
    pub fn publish(&self, snapshot: PortfolioSnapshot) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_using_api() && !snapshot.is_using_api() {
                debug!(late = snapshot.source_label(), "keeping API snapshot");
                return false;
            }
            *current = snapshot;
            true
        })
    }
}

// ═══════════════════════════════════════════════════════════════
// Retry
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_base_ms),
        }
    }

    /// Linear backoff: retry `n` waits `base_delay * n`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Attempt counter owned by Flow B.
#[derive(Debug, Clone)]
pub struct RetryState {
    policy: RetryPolicy,
    retries: u32,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy, retries: 0 }
    }

    /// Retries scheduled so far.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn max_retries(&self) -> u32 {
        self.policy.max_retries
    }

    pub fn exhausted(&self) -> bool {
        self.retries >= self.policy.max_retries
    }

    /// Count a retry and return its delay, or `None` once the bound is hit.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.exhausted() {
            return None;
        }
        self.retries += 1;
        Some(self.policy.delay_for(self.retries))
    }

    /// No further retries will be scheduled.
    pub fn stop(&mut self) {
        self.retries = self.policy.max_retries;
    }
}

// ═══════════════════════════════════════════════════════════════
// Flows
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("No API data available")]
    NoData,
}

/// Flow A: backup document, or the fallback bundle with the load error.
pub async fn load_backup(backup: &dyn BackupSource, now: chrono::DateTime<Utc>) -> PortfolioSnapshot {
    match backup.load().await {
        Ok(doc) => {
            info!("loaded backup data");
            PortfolioSnapshot::ready(DataSource::Backup(transform(&doc.into(), now)))
        }
        Err(e) => {
            warn!(error = %e, "failed to load backup data, using hardcoded fallback");
            fallback_snapshot(&e, now)
        }
    }
}

fn fallback_snapshot(error: &ApiError, now: chrono::DateTime<Utc>) -> PortfolioSnapshot {
    PortfolioSnapshot {
        data: Some(DataSource::Fallback(fallback::content(now))),
        error: Some(error.to_string()),
    }
}

/// One Flow B attempt: all five endpoints, partial success accepted.
pub async fn attempt_remote(
    remote: &dyn RemoteSource,
    now: chrono::DateTime<Utc>,
) -> Result<PortfolioContent, AttemptError> {
    let bundle = remote.fetch_all().await;
    for (endpoint, error) in bundle.failures() {
        warn!(endpoint, timeout = error.is_timeout(), error = %error, "endpoint fetch failed");
    }

    if !bundle.any_success() {
        return Err(AttemptError::NoData);
    }
    Ok(transform(&bundle.into_documents(), now))
}

async fn run_backup(backup: Arc<dyn BackupSource>, cell: SnapshotCell) {
    let snapshot = load_backup(backup.as_ref(), Utc::now()).await;
    cell.publish(snapshot);
}

async fn run_remote(
    remote: Arc<dyn RemoteSource>,
    cell: SnapshotCell,
    mut retry: RetryState,
    cancel: CancellationToken,
) {
    loop {
        match attempt_remote(remote.as_ref(), Utc::now()).await {
            Ok(content) => {
                info!(attempt = retry.retries() + 1, "loaded API data");
                cell.publish(PortfolioSnapshot::ready(DataSource::Remote(content)));
                retry.stop();
                return;
            }
            Err(e) => {
                warn!(attempt = retry.retries() + 1, error = %e, "API fetch attempt failed");

                let Some(delay) = retry.next_delay() else {
                    info!("max retries reached, staying with backup data");
                    return;
                };
                info!(
                    delay_ms = delay.as_millis() as u64,
                    retry = retry.retries(),
                    max = retry.max_retries(),
                    "retrying API"
                );

                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("pending API retry cancelled");
                        return;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════
// Orchestration
// ═══════════════════════════════════════════════════════════════

pub struct Reconciler {
    remote: Arc<dyn RemoteSource>,
    backup: Arc<dyn BackupSource>,
    policy: RetryPolicy,
}

impl Reconciler {
    pub fn new(remote: Arc<dyn RemoteSource>, backup: Arc<dyn BackupSource>) -> Self {
        Self {
            remote,
            backup,
            policy: RetryPolicy::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let remote = Arc::new(ApiClient::from_config(config)?);
        let backup = Arc::new(BackupLoader::from_config(config)?);
        Ok(Self::new(remote, backup).with_policy(RetryPolicy::from_config(config)))
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Start both flows. Flow A is spawned first.
    pub fn spawn(self) -> ReconcilerHandle {
        let cell = SnapshotCell::new();
        let cancel = CancellationToken::new();

        let backup_task = tokio::spawn(run_backup(self.backup, cell.clone()));
        let remote_task = tokio::spawn(run_remote(
            self.remote,
            cell.clone(),
            RetryState::new(self.policy),
            cancel.clone(),
        ));

        ReconcilerHandle {
            cell,
            cancel,
            tasks: vec![backup_task, remote_task],
        }
    }
}

pub struct ReconcilerHandle {
    cell: SnapshotCell,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl ReconcilerHandle {
    pub fn subscribe(&self) -> watch::Receiver<PortfolioSnapshot> {
        self.cell.subscribe()
    }

    pub fn current(&self) -> PortfolioSnapshot {
        self.cell.current()
    }

    /// Both flows are done: backup published, API loaded or given up.
    pub fn is_settled(&self) -> bool {
        self.tasks.iter().all(JoinHandle::is_finished)
    }

    /// Drop any pending retry. An attempt already in flight still completes.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Wait for both flows and return the final snapshot.
    pub async fn settle(self) -> PortfolioSnapshot {
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "reconciler task ended abnormally");
            }
        }
        self.cell.current()
    }
}
