//! Local Storage Abstractions
//!
//! Provides the platform-agnostic view of an album's local directory: the
//! files it holds, the volume it lives on, and its modification timestamp.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A regular file inside an album directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFile {
    /// Absolute path of the file
    pub path: PathBuf,
    /// File name as found on disk (case preserved)
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: DateTime<Utc>,
    /// Content checksum, when one has been computed
    pub checksum: Option<String>,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>, size: u64, modified: DateTime<Utc>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path,
            name,
            size,
            modified,
            checksum: None,
        }
    }

    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }
}

/// Free and total capacity of the volume holding a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeSpace {
    pub free_bytes: u64,
    pub total_bytes: u64,
}

impl VolumeSpace {
    pub fn new(free_bytes: u64, total_bytes: u64) -> Self {
        Self {
            free_bytes,
            total_bytes,
        }
    }

    /// Free space as a percentage of total space.
    ///
    /// A volume reporting zero total bytes is treated as full.
    pub fn free_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        (self.free_bytes as f64 / self.total_bytes as f64) * 100.0
    }
}

/// File system access trait
///
/// Abstracts the handful of local operations the album reconciliation needs:
/// - Desktop: direct filesystem access (`bridge-desktop::TokioFileSystem`)
/// - Tests: in-memory fakes
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// async fn count_photos(fs: &dyn FileSystemAccess, dir: &Path) -> Result<usize> {
///     Ok(fs.list_files(dir).await?.len())
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// List the regular, non-hidden files directly inside `dir`
    ///
    /// The listing is not recursive. A directory that does not exist yields
    /// an empty list rather than an error.
    async fn list_files(&self, dir: &Path) -> Result<Vec<LocalFile>>;

    /// Report free and total space of the volume holding `path`
    async fn volume_space(&self, path: &Path) -> Result<VolumeSpace>;

    /// Set the modification time of a file or directory
    async fn set_modified(&self, path: &Path, modified: DateTime<Utc>) -> Result<()>;

    /// Latest modification time over the files listed in `dir`
    ///
    /// Returns `None` for an empty or missing directory.
    async fn latest_modified(&self, dir: &Path) -> Result<Option<DateTime<Utc>>> {
        let files = self.list_files(dir).await?;
        Ok(files.iter().map(|f| f.modified).max())
    }
}
