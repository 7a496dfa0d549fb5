//! Collaborator stubs shared by the unit tests

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::{
    Album, FileSystemAccess, LocalFile, LocalMetadata, LocalTags, PhotoIdentity, ProgressSink,
    Recycler, RemoteItem, RemoteStore, VolumeSpace,
};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Remote store that accepts everything and records each call
#[derive(Default)]
pub struct StubStore {
    calls: Mutex<Vec<String>>,
}

impl StubStore {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RemoteStore for StubStore {
    async fn list_items(&self, _album: &Album) -> Result<Vec<RemoteItem>> {
        Ok(Vec::new())
    }

    async fn ensure_album(&self, album: &Album) -> Result<Album> {
        self.record("ensure_album".to_string());
        let title = album.title.clone().unwrap_or_default();
        Ok(Album::remote("created", title, Utc::now()))
    }

    async fn upload(
        &self,
        file: &LocalFile,
        _existing: Option<&RemoteItem>,
        _album: &Album,
        _checksum: Option<&str>,
    ) -> Result<bool> {
        self.record(format!("upload:{}", file.name));
        Ok(true)
    }

    async fn download(&self, _dest: &Path, item: &RemoteItem) -> Result<bool> {
        self.record(format!("download:{}", item.title));
        Ok(true)
    }

    async fn set_album_capture_date(&self, _local_dir: &Path, _album: &Album) -> Result<()> {
        self.record("capture_date".to_string());
        Ok(())
    }
}

/// File system with a fixed volume and no files
pub struct StubFs {
    space: VolumeSpace,
}

impl StubFs {
    pub fn with_space(space: VolumeSpace) -> Self {
        Self { space }
    }
}

#[async_trait]
impl FileSystemAccess for StubFs {
    async fn list_files(&self, _dir: &Path) -> Result<Vec<LocalFile>> {
        Ok(Vec::new())
    }

    async fn volume_space(&self, _path: &Path) -> Result<VolumeSpace> {
        Ok(self.space)
    }

    async fn set_modified(&self, _path: &Path, _modified: DateTime<Utc>) -> Result<()> {
        Ok(())
    }
}

/// Metadata reader that knows nothing about any file
pub struct NoMetadata;

#[async_trait]
impl LocalMetadata for NoMetadata {
    async fn read_tags(&self, _file: &LocalFile) -> Option<LocalTags> {
        None
    }

    async fn checksum(&self, _file: &LocalFile) -> Option<String> {
        None
    }

    async fn fingerprint(&self, file: &LocalFile) -> Result<PhotoIdentity> {
        Ok(PhotoIdentity::of_local(file))
    }
}

#[derive(Default)]
pub struct StubRecycler {
    calls: Mutex<Vec<String>>,
}

impl StubRecycler {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Recycler for StubRecycler {
    async fn recycle(&self, local: Option<&LocalFile>, remote: Option<&RemoteItem>) -> Result<()> {
        let name = remote
            .map(|r| r.title.clone())
            .or_else(|| local.map(|l| l.name.clone()))
            .unwrap_or_default();
        self.calls.lock().unwrap().push(name);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    cancelled: AtomicBool,
    statuses: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn cancel_now(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn report(&self, _message: &str) {}

    fn add_outcome(&self, _downloaded: u64, _uploaded: u64, _failed: u64) {}

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn set_status(&self, message: &str) {
        self.statuses.lock().unwrap().push(message.to_string());
    }
}
