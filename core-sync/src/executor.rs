//! # Sync Plan Executor
//!
//! Drives a [`SyncPlan`] through its phases with validated transitions.
//!
//! ## Phases
//!
//! ```text
//! Planned → Deleting → Uploading → Downloading → Done
//!    ↓          ↓           ↓            ↓
//!    └──────────┴───────────┴────────────┴──→ Cancelled
//! ```
//!
//! ## Checkpoints
//!
//! Cancellation is polled, never preemptive:
//! - before the delete phase (deletes themselves are not gated)
//! - before the upload phase and before every upload
//! - before the download phase and before every download, after the disk
//!   space check and the progress report
//!
//! ## Failure handling
//!
//! - A failed recycle or upload is counted and the loop moves on.
//! - A failed download is counted and ends the download phase.
//! - A remote title that is not a plain file name is counted as failed and
//!   skipped without touching the disk.
//! - Free space at or below `min_free_space_percent` ends the download phase
//!   with a status message. It is re-checked before every download.

use bridge_traits::{
    Album, FileSystemAccess, LocalFile, LocalMetadata, ProgressSink, Recycler, RemoteItem,
    RemoteStore,
};
use core_runtime::config::SyncConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};

use crate::candidate::Candidate;
use crate::error::{Result, SyncError};
use crate::matching::is_plain_file_name;
use crate::outcome::SyncOutcome;
use crate::plan::SyncPlan;

/// Executor state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorPhase {
    Planned,
    Deleting,
    Uploading,
    Downloading,
    Done,
    Cancelled,
}

impl ExecutorPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutorPhase::Done | ExecutorPhase::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutorPhase::Planned => "planned",
            ExecutorPhase::Deleting => "deleting",
            ExecutorPhase::Uploading => "uploading",
            ExecutorPhase::Downloading => "downloading",
            ExecutorPhase::Done => "done",
            ExecutorPhase::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ExecutorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Collaborators and settings for one execution
pub struct PlanExecutor<'a> {
    store: &'a dyn RemoteStore,
    fs: &'a dyn FileSystemAccess,
    metadata: &'a dyn LocalMetadata,
    recycler: &'a dyn Recycler,
    progress: &'a dyn ProgressSink,
    config: &'a SyncConfig,
    local_dir: &'a Path,
    title: &'a str,
    phase: ExecutorPhase,
}

impl<'a> PlanExecutor<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: &'a dyn RemoteStore,
        fs: &'a dyn FileSystemAccess,
        metadata: &'a dyn LocalMetadata,
        recycler: &'a dyn Recycler,
        progress: &'a dyn ProgressSink,
        config: &'a SyncConfig,
        local_dir: &'a Path,
        title: &'a str,
    ) -> Self {
        Self {
            store,
            fs,
            metadata,
            recycler,
            progress,
            config,
            local_dir,
            title,
            phase: ExecutorPhase::Planned,
        }
    }

    pub fn phase(&self) -> ExecutorPhase {
        self.phase
    }

    /// Run every phase of `plan`, returning the terminal phase.
    ///
    /// `album` is realised remotely on the first upload and updated in place.
    ///
    /// # Errors
    ///
    /// Fails only when the album cannot be realised remotely or when called
    /// twice. Per-item failures are counted in `outcome`.
    pub async fn execute(
        &mut self,
        plan: SyncPlan,
        album: &mut Album,
        outcome: &mut SyncOutcome,
    ) -> Result<ExecutorPhase> {
        if self.checkpoint(outcome)? {
            return Ok(self.phase);
        }

        self.transition(ExecutorPhase::Deleting)?;
        self.run_deletes(&plan.deletes, outcome).await;

        if self.checkpoint(outcome)? {
            return Ok(self.phase);
        }
        self.transition(ExecutorPhase::Uploading)?;
        if self.run_uploads(&plan.uploads, album, outcome).await? {
            return Ok(self.phase);
        }

        if self.checkpoint(outcome)? {
            return Ok(self.phase);
        }
        self.transition(ExecutorPhase::Downloading)?;
        if self.run_downloads(&plan.downloads, outcome).await? {
            return Ok(self.phase);
        }

        self.transition(ExecutorPhase::Done)?;
        Ok(self.phase)
    }

    /// Returns `true` once cancellation has been observed and recorded
    fn checkpoint(&mut self, outcome: &mut SyncOutcome) -> Result<bool> {
        if !self.progress.is_cancelled() {
            return Ok(false);
        }
        info!(phase = %self.phase, "Sync cancelled");
        outcome.mark_cancelled();
        self.transition(ExecutorPhase::Cancelled)?;
        Ok(true)
    }

    #[instrument(skip_all, fields(album = %self.title, count = deletes.len()))]
    async fn run_deletes(&self, deletes: &[Candidate], outcome: &mut SyncOutcome) {
        for candidate in deletes {
            match self
                .recycler
                .recycle(candidate.local(), candidate.remote())
                .await
            {
                Ok(()) => debug!(name = %candidate.name(), "Recycled"),
                Err(e) => {
                    warn!(name = %candidate.name(), error = %e, "Failed to recycle");
                    self.record_failed(outcome);
                }
            }
        }
    }

    /// Returns `true` when the phase stopped on cancellation
    #[instrument(skip_all, fields(album = %self.title, count = uploads.len()))]
    async fn run_uploads(
        &mut self,
        uploads: &[Candidate],
        album: &mut Album,
        outcome: &mut SyncOutcome,
    ) -> Result<bool> {
        let mut attempted = false;
        let mut cancelled = false;

        for candidate in uploads {
            if self.checkpoint(outcome)? {
                cancelled = true;
                break;
            }

            let Some(local) = candidate.local() else {
                continue;
            };

            if !album.exists_remotely() {
                *album = self.store.ensure_album(album).await?;
                info!(album = %self.title, "Created remote album");
            }

            self.progress
                .report(&format!("Uploading {} : {}...", self.title, local.name));
            attempted = true;

            let checksum = match &local.checksum {
                Some(checksum) => Some(checksum.clone()),
                None => self.metadata.checksum(local).await,
            };

            match self
                .store
                .upload(local, candidate.remote(), album, checksum.as_deref())
                .await
            {
                Ok(true) => {
                    debug!(file = %local.name, "Uploaded");
                    outcome.record_uploaded();
                    self.progress.add_outcome(0, 1, 0);
                }
                Ok(false) => {
                    warn!(file = %local.name, "Upload rejected");
                    self.record_failed(outcome);
                }
                Err(e) => {
                    warn!(file = %local.name, error = %e, "Upload failed");
                    self.record_failed(outcome);
                }
            }
        }

        if attempted {
            if let Err(e) = self
                .store
                .set_album_capture_date(self.local_dir, album)
                .await
            {
                warn!(album = %self.title, error = %e, "Failed to update album date");
            }
        }

        Ok(cancelled)
    }

    /// Returns `true` when the phase stopped on cancellation
    #[instrument(skip_all, fields(album = %self.title, count = downloads.len()))]
    async fn run_downloads(
        &mut self,
        downloads: &[Candidate],
        outcome: &mut SyncOutcome,
    ) -> Result<bool> {
        for candidate in downloads {
            let Some(remote) = candidate.remote() else {
                continue;
            };

            let Some(dest) = self.destination(candidate.local(), remote) else {
                warn!(album = %self.title, title = %remote.title, "Refusing to download outside the album directory");
                self.record_failed(outcome);
                continue;
            };

            if !self.has_free_space().await {
                let status = format!(
                    "Available disk space was less than {}%. Skipping downloads.",
                    self.config.min_free_space_percent
                );
                warn!(album = %self.title, "{}", status);
                self.progress.set_status(&status);
                outcome.set_status(status);
                return Ok(false);
            }

            self.progress
                .report(&format!("Downloading {} : {}...", self.title, remote.title));

            if self.checkpoint(outcome)? {
                return Ok(true);
            }

            match self.store.download(&dest, remote).await {
                Ok(true) => {
                    debug!(file = %remote.title, "Downloaded");
                    self.touch_local_dir().await;
                    outcome.record_downloaded();
                    self.progress.add_outcome(1, 0, 0);
                }
                result => {
                    match result {
                        Err(e) => error!(file = %remote.title, error = %e, "Download failed"),
                        _ => error!(file = %remote.title, "Download wrote nothing"),
                    }
                    self.record_failed(outcome);
                    self.progress.report("Download error. Aborting.");
                    outcome.set_status("Download error. Aborting.");
                    return Ok(false);
                }
            }
        }

        Ok(false)
    }

    async fn has_free_space(&self) -> bool {
        match self.fs.volume_space(&self.config.photo_root).await {
            Ok(space) => space.free_percent() > self.config.min_free_space_percent,
            Err(e) => {
                warn!(error = %e, "Unable to query free disk space");
                false
            }
        }
    }

    /// `None` when a remote-only title would resolve outside `local_dir`
    fn destination(&self, local: Option<&LocalFile>, remote: &RemoteItem) -> Option<PathBuf> {
        match local {
            Some(local) => Some(local.path.clone()),
            None if is_plain_file_name(&remote.title) => Some(self.local_dir.join(&remote.title)),
            None => None,
        }
    }

    /// Set the album directory mtime to its newest file
    async fn touch_local_dir(&self) {
        match self.fs.latest_modified(self.local_dir).await {
            Ok(Some(latest)) => {
                if let Err(e) = self.fs.set_modified(self.local_dir, latest).await {
                    warn!(error = %e, "Failed to update album directory timestamp");
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to read album directory timestamps"),
        }
    }

    fn record_failed(&self, outcome: &mut SyncOutcome) {
        outcome.record_failed();
        self.progress.add_outcome(0, 0, 1);
    }

    fn transition(&mut self, to: ExecutorPhase) -> Result<()> {
        self.validate_transition(to)?;
        debug!(from = %self.phase, %to, "Executor phase change");
        self.phase = to;
        Ok(())
    }

    fn validate_transition(&self, to: ExecutorPhase) -> Result<()> {
        let valid = match (self.phase, to) {
            (ExecutorPhase::Planned, ExecutorPhase::Deleting) => true,
            (ExecutorPhase::Deleting, ExecutorPhase::Uploading) => true,
            (ExecutorPhase::Uploading, ExecutorPhase::Downloading) => true,
            (ExecutorPhase::Downloading, ExecutorPhase::Done) => true,

            // Any live phase can stop
            (from, ExecutorPhase::Cancelled) => !from.is_terminal(),

            _ => false,
        };

        if !valid {
            return Err(SyncError::InvalidStateTransition {
                from: self.phase.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }

        Ok(())
    }
}
