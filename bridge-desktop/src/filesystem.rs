//! File System Access Implementation using Tokio

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::{FileSystemAccess, LocalFile, VolumeSpace},
};
use chrono::{DateTime, Utc};
use filetime::FileTime;
use std::fs::Metadata;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::debug;

/// Tokio-based file system implementation
///
/// Provides async access to album directories using:
/// - `tokio::fs` for listings and metadata
/// - `fs2` for volume capacity
/// - `filetime` for modification timestamps
#[derive(Debug, Clone, Default)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    pub fn new() -> Self {
        Self
    }

    /// Convert std::io::Error to BridgeError
    fn map_io_error(e: std::io::Error) -> BridgeError {
        BridgeError::Io(e)
    }

    fn map_join_error(e: tokio::task::JoinError) -> BridgeError {
        BridgeError::OperationFailed(format!("Blocking file system task failed: {}", e))
    }
}

#[cfg(windows)]
fn is_hidden(name: &str, metadata: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

    name.starts_with('.') || metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

#[cfg(not(windows))]
fn is_hidden(name: &str, _metadata: &Metadata) -> bool {
    name.starts_with('.')
}

#[async_trait]
impl FileSystemAccess for TokioFileSystem {
    async fn list_files(&self, dir: &Path) -> Result<Vec<LocalFile>> {
        let mut read_dir = match fs::read_dir(dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = ?dir, "Album directory does not exist");
                return Ok(Vec::new());
            }
            Err(e) => return Err(Self::map_io_error(e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = read_dir.next_entry().await.map_err(Self::map_io_error)? {
            let path = entry.path();
            // Follows symlinks, so a link to a photo counts as a photo
            let metadata = match fs::metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(Self::map_io_error(e)),
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            if !metadata.is_file() || is_hidden(&name, &metadata) {
                continue;
            }

            let modified = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .map_err(Self::map_io_error)?;

            files.push(LocalFile::new(path, metadata.len(), modified));
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(path = ?dir, count = files.len(), "Listed album directory");
        Ok(files)
    }

    async fn volume_space(&self, path: &Path) -> Result<VolumeSpace> {
        let path: PathBuf = path.to_path_buf();
        let space = tokio::task::spawn_blocking(move || -> std::io::Result<VolumeSpace> {
            let free = fs2::available_space(&path)?;
            let total = fs2::total_space(&path)?;
            Ok(VolumeSpace::new(free, total))
        })
        .await
        .map_err(Self::map_join_error)?
        .map_err(Self::map_io_error)?;

        debug!(
            free = space.free_bytes,
            total = space.total_bytes,
            "Queried volume space"
        );
        Ok(space)
    }

    async fn set_modified(&self, path: &Path, modified: DateTime<Utc>) -> Result<()> {
        let target = path.to_path_buf();
        let mtime = FileTime::from_system_time(SystemTime::from(modified));

        tokio::task::spawn_blocking(move || filetime::set_file_mtime(&target, mtime))
            .await
            .map_err(Self::map_join_error)?
            .map_err(Self::map_io_error)?;

        debug!(path = ?path, %modified, "Set modification time");
        Ok(())
    }
}
