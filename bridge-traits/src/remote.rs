//! Remote Album Abstractions
//!
//! Records describing a cloud album and its items, and the [`RemoteStore`]
//! trait a photo service client implements.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::storage::LocalFile;

/// Title prefixes the photo service uses for albums it fills automatically
/// from device uploads.
pub const AUTO_BACKUP_TITLES: &[&str] = &["Auto Backup", "Instant Upload"];

/// A remote photo collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// Stable remote identifier; `None` until the album exists remotely
    pub id: Option<String>,
    /// Display title
    pub title: Option<String>,
    /// Last time the remote album changed
    pub updated: Option<DateTime<Utc>>,
}

impl Album {
    /// An album that only exists locally so far
    pub fn local(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: Some(title.into()),
            updated: None,
        }
    }

    pub fn remote(
        id: impl Into<String>,
        title: impl Into<String>,
        updated: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            title: Some(title.into()),
            updated: Some(updated),
        }
    }

    pub fn exists_remotely(&self) -> bool {
        self.id.is_some()
    }

    /// Whether the title matches one of the auto-backup album patterns
    pub fn has_auto_backup_title(&self) -> bool {
        self.title.as_deref().is_some_and(|title| {
            AUTO_BACKUP_TITLES
                .iter()
                .any(|prefix| title.starts_with(prefix))
        })
    }
}

/// Coarse media type of a remote item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Photo,
    Video,
}

/// A photo or video held in a remote album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItem {
    /// Stable remote identifier
    pub id: String,
    /// Display name; matched case-insensitively against local file names
    pub title: String,
    /// Last time the item changed remotely
    pub updated: DateTime<Utc>,
    /// Size in bytes, when the service reports it
    pub size: Option<u64>,
    /// Hex content digest, when the service reports it
    ///
    /// Compared against [`LocalMetadata::checksum`](crate::metadata::LocalMetadata::checksum),
    /// so both must use the same algorithm.
    pub checksum: Option<String>,
    /// Free-text keywords attached to the item
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Media type the service reported
    #[serde(default)]
    pub media: MediaKind,
    /// Number of media-content parts; videos carry more than one
    pub content_parts: usize,
}

impl RemoteItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, updated: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            updated,
            size: None,
            checksum: None,
            tags: BTreeSet::new(),
            media: MediaKind::Photo,
            content_parts: 1,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn as_video(mut self, content_parts: usize) -> Self {
        self.media = MediaKind::Video;
        self.content_parts = content_parts;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Reported as a video, or carrying more than one content part
    pub fn is_video(&self) -> bool {
        self.media == MediaKind::Video || self.content_parts > 1
    }
}

/// Identity used to recognise the same photo on both sides of a sync
///
/// Built from the lowercased file name and the byte size, which both the
/// remote listing and a local `stat` can supply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhotoIdentity {
    pub name: String,
    pub size: Option<u64>,
}

impl PhotoIdentity {
    pub fn new(name: &str, size: Option<u64>) -> Self {
        Self {
            name: name.to_lowercase(),
            size,
        }
    }

    pub fn of_remote(item: &RemoteItem) -> Self {
        Self::new(&item.title, item.size)
    }

    pub fn of_local(file: &LocalFile) -> Self {
        Self::new(&file.name, Some(file.size))
    }
}

impl fmt::Display for PhotoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.size {
            Some(size) => write!(f, "{}:{}", self.name, size),
            None => write!(f, "{}:?", self.name),
        }
    }
}

/// Remote photo service client
///
/// Implementations own authentication, paging, retries, and timeouts. Every
/// method is a single blocking round trip from the caller's point of view.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::remote::{Album, RemoteStore};
///
/// async fn count_items(store: &dyn RemoteStore, album: &Album) -> Result<usize> {
///     Ok(store.list_items(album).await?.len())
/// }
/// ```
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// List every item in `album`
    async fn list_items(&self, album: &Album) -> Result<Vec<RemoteItem>>;

    /// Return the remote album, creating it first if it does not exist yet
    ///
    /// Calling this on an album that already exists returns it unchanged.
    async fn ensure_album(&self, album: &Album) -> Result<Album>;

    /// Upload `file` into `album`, replacing `existing` when given
    ///
    /// `checksum` is the hex digest produced by the host's
    /// [`LocalMetadata::checksum`](crate::metadata::LocalMetadata::checksum),
    /// passed through unchanged. The desktop reader yields SHA-256. A store
    /// whose service verifies a different digest (MD5, for instance) must be
    /// paired with a `LocalMetadata` that computes that digest.
    ///
    /// Returns `Ok(false)` when the service rejected the upload.
    async fn upload(
        &self,
        file: &LocalFile,
        existing: Option<&RemoteItem>,
        album: &Album,
        checksum: Option<&str>,
    ) -> Result<bool>;

    /// Download `item` to `dest`
    ///
    /// Returns `Ok(false)` when nothing was written.
    async fn download(&self, dest: &Path, item: &RemoteItem) -> Result<bool>;

    /// Push the album date forward from the newest capture time found in `local_dir`
    async fn set_album_capture_date(&self, local_dir: &Path, album: &Album) -> Result<()>;

    /// Whether `album` is filled automatically by device backups
    fn is_auto_backup_album(&self, album: &Album) -> bool {
        album.has_auto_backup_title()
    }

    /// Identifier used to order duplicate items
    fn item_identifier(&self, item: &RemoteItem) -> String {
        item.id.clone()
    }

    /// Identity used for trash lookups
    fn item_identity(&self, item: &RemoteItem) -> PhotoIdentity {
        PhotoIdentity::of_remote(item)
    }
}
