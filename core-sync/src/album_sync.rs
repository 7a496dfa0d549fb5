//! # Album Sync
//!
//! One local directory bound to one remote album, and the entry point that
//! runs a full reconciliation pass over them.
//!
//! ## Pass
//!
//! ```text
//! list remote + list local → match → date filter → deletion oracle
//!     → classifier → plan → executor (delete, upload, download)
//! ```
//!
//! Listings are snapshots taken once at the start of the pass.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::{AlbumSync, SyncBridges, SyncSession, TrashIndex};
//!
//! let session = Arc::new(SyncSession::new());
//! let bridges = SyncBridges::new(
//!     Arc::new(TokioFileSystem::new()),
//!     Arc::new(FileMetadataReader::new()),
//!     recycler,
//!     session.clone(),
//! );
//!
//! let trash = TrashIndex::load(store.as_ref(), &trash_album).await?;
//! let mut sync = AlbumSync::new(album, "/home/me/Pictures/Holiday", bridges, config);
//!
//! if sync.local_change_date().await? > last_run {
//!     let outcome = sync.process(store.as_ref(), last_run, &trash).await?;
//!     println!("{} downloaded", outcome.downloaded);
//! }
//! ```

use bridge_traits::{
    Album, FileSystemAccess, LocalMetadata, ProgressSink, Recycler, RemoteStore, TrashOracle,
};
use chrono::{DateTime, Utc};
use core_runtime::config::SyncConfig;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::candidate::Candidate;
use crate::classifier::ActionClassifier;
use crate::date_filter::retain_newer_than;
use crate::deletion::DeletionOracle;
use crate::error::{Result, SyncError};
use crate::executor::PlanExecutor;
use crate::matching::match_items;
use crate::outcome::SyncOutcome;
use crate::plan::SyncPlan;

/// Host-provided collaborators for album passes
#[derive(Clone)]
pub struct SyncBridges {
    pub file_system: Arc<dyn FileSystemAccess>,
    pub metadata: Arc<dyn LocalMetadata>,
    pub recycler: Arc<dyn Recycler>,
    pub progress: Arc<dyn ProgressSink>,
}

impl SyncBridges {
    pub fn new(
        file_system: Arc<dyn FileSystemAccess>,
        metadata: Arc<dyn LocalMetadata>,
        recycler: Arc<dyn Recycler>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            file_system,
            metadata,
            recycler,
            progress,
        }
    }
}

/// A local directory paired with a remote album
pub struct AlbumSync {
    album: Album,
    local_dir: PathBuf,
    bridges: SyncBridges,
    config: Arc<SyncConfig>,
}

impl AlbumSync {
    pub fn new(
        album: Album,
        local_dir: impl Into<PathBuf>,
        bridges: SyncBridges,
        config: Arc<SyncConfig>,
    ) -> Self {
        Self {
            album,
            local_dir: local_dir.into(),
            bridges,
            config,
        }
    }

    /// Whether the album already exists remotely
    pub fn has_remote_album(&self) -> bool {
        self.album.exists_remotely()
    }

    /// # Errors
    ///
    /// [`SyncError::MissingField`] when the album has no title.
    pub fn album_title(&self) -> Result<&str> {
        self.album
            .title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| SyncError::MissingField {
                entity: "Album".to_string(),
                field: "title".to_string(),
            })
    }

    /// The album, including its remote id once a pass has created it
    pub fn album(&self) -> &Album {
        &self.album
    }

    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }

    /// Later of the newest local file and the remote album's update time.
    ///
    /// An empty or missing directory counts as the Unix epoch.
    pub async fn local_change_date(&self) -> Result<DateTime<Utc>> {
        let local = self
            .bridges
            .file_system
            .latest_modified(&self.local_dir)
            .await
            .map_err(|e| SyncError::LocalStorage(e.to_string()))?
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        Ok(match self.album.updated {
            Some(remote) if remote > local => remote,
            _ => local,
        })
    }

    /// Run one reconciliation pass.
    ///
    /// Candidates whose latest timestamp is not after `cutoff` are left
    /// alone. `trash` answers whether an item was already deleted elsewhere.
    ///
    /// # Errors
    ///
    /// Fails on a missing album or item title, a failed remote listing or
    /// album creation, or an unreadable local directory. Per-item transfer
    /// failures are counted in the returned outcome instead.
    #[instrument(skip_all, fields(album = %self))]
    pub async fn process(
        &mut self,
        store: &dyn RemoteStore,
        cutoff: DateTime<Utc>,
        trash: &dyn TrashOracle,
    ) -> Result<SyncOutcome> {
        let title = self.album_title()?.to_string();
        let progress = self.bridges.progress.as_ref();

        progress.report(&format!("Synchronising {}...", title));
        let auto_backup = store.is_auto_backup_album(&self.album);

        let remote_items = if self.has_remote_album() {
            progress.report(&format!("Querying remote for album {}", title));
            store.list_items(&self.album).await?
        } else {
            Vec::new()
        };

        let local_files = self
            .bridges
            .file_system
            .list_files(&self.local_dir)
            .await
            .map_err(|e| SyncError::LocalStorage(e.to_string()))?;

        debug!(
            remote = remote_items.len(),
            local = local_files.len(),
            auto_backup,
            "Listed album contents"
        );

        let report = match_items(store, remote_items, local_files, &self.config)?;
        let mut candidates = retain_newer_than(report.candidates, cutoff);

        if self.config.compare_checksums {
            self.fill_checksums(&mut candidates).await;
        }

        let oracle = DeletionOracle::new(store, trash, self.bridges.metadata.as_ref());
        let classifier = ActionClassifier::new(&self.config, auto_backup);
        let plan = SyncPlan::build(candidates, &oracle, &classifier).await;

        info!(
            deletes = plan.deletes.len(),
            uploads = plan.uploads.len(),
            downloads = plan.downloads.len(),
            unchanged = plan.unchanged,
            "Planned album sync"
        );

        let mut outcome = SyncOutcome::new();
        let mut executor = PlanExecutor::new(
            store,
            self.bridges.file_system.as_ref(),
            self.bridges.metadata.as_ref(),
            self.bridges.recycler.as_ref(),
            progress,
            &self.config,
            &self.local_dir,
            &title,
        );
        let phase = executor
            .execute(plan, &mut self.album, &mut outcome)
            .await?;

        info!(
            %phase,
            downloaded = outcome.downloaded,
            uploaded = outcome.uploaded,
            failed = outcome.failed,
            "Album sync finished"
        );
        Ok(outcome)
    }

    /// Checksum local files that have a remote counterpart with a known checksum
    async fn fill_checksums(&self, candidates: &mut [Candidate]) {
        for candidate in candidates.iter_mut() {
            if let Candidate::Both { local, remote } = candidate {
                if remote.checksum.is_some() && local.checksum.is_none() {
                    local.checksum = self.bridges.metadata.checksum(local).await;
                }
            }
        }
    }
}

impl fmt::Display for AlbumSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = self
            .local_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.local_dir.display().to_string());
        write!(f, "{} ({})", dir, self.album.title.as_deref().unwrap_or("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{NoMetadata, RecordingSink, StubFs, StubRecycler};
    use bridge_traits::VolumeSpace;
    use chrono::TimeZone;

    fn sync(album: Album) -> AlbumSync {
        let bridges = SyncBridges::new(
            Arc::new(StubFs::with_space(VolumeSpace::new(50, 100))),
            Arc::new(NoMetadata),
            Arc::new(StubRecycler::default()),
            Arc::new(RecordingSink::default()),
        );
        let config = SyncConfig::builder().photo_root("/photos").build().unwrap();
        AlbumSync::new(album, "/photos/Holiday", bridges, Arc::new(config))
    }

    #[test]
    fn test_album_accessors() {
        let local = sync(Album::local("Holiday"));
        assert!(!local.has_remote_album());
        assert_eq!(local.album_title().unwrap(), "Holiday");
        assert_eq!(local.to_string(), "Holiday (Holiday)");

        let untitled = sync(Album {
            id: Some("1".to_string()),
            title: None,
            updated: None,
        });
        assert!(untitled.has_remote_album());
        assert!(matches!(
            untitled.album_title(),
            Err(SyncError::MissingField { .. })
        ));
        assert_eq!(untitled.to_string(), "Holiday (-)");
    }

    #[tokio::test]
    async fn test_change_date_falls_back_to_remote() {
        let updated = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
        let sync = sync(Album::remote("1", "Holiday", updated));

        assert_eq!(sync.local_change_date().await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_change_date_sentinel_for_local_only_album() {
        let sync = sync(Album::local("Holiday"));

        assert_eq!(
            sync.local_change_date().await.unwrap(),
            DateTime::<Utc>::UNIX_EPOCH
        );
    }
}
