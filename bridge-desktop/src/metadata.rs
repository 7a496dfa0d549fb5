//! Local metadata reader backed by file contents

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    metadata::{LocalMetadata, LocalTags},
    remote::PhotoIdentity,
    storage::LocalFile,
};
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::debug;

const READ_CHUNK_BYTES: usize = 64 * 1024;

/// Desktop `LocalMetadata` implementation
///
/// Checksums are SHA-256 over the whole file, hex encoded. Pair it only with
/// a `RemoteStore` that verifies SHA-256 uploads. Fingerprints use
/// the on-disk size at the time of the call. No sidecar format is read, so
/// [`read_tags`](LocalMetadata::read_tags) always reports "no information".
#[derive(Debug, Clone, Default)]
pub struct FileMetadataReader;

impl FileMetadataReader {
    pub fn new() -> Self {
        Self
    }

    async fn hash_file(file: &LocalFile) -> std::io::Result<String> {
        let mut handle = fs::File::open(&file.path).await?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; READ_CHUNK_BYTES];

        loop {
            let read = handle.read(&mut buffer).await?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[async_trait]
impl LocalMetadata for FileMetadataReader {
    async fn read_tags(&self, _file: &LocalFile) -> Option<LocalTags> {
        None
    }

    async fn checksum(&self, file: &LocalFile) -> Option<String> {
        match Self::hash_file(file).await {
            Ok(checksum) => Some(checksum),
            Err(e) => {
                debug!(file = %file.name, error = %e, "Unable to checksum file");
                None
            }
        }
    }

    async fn fingerprint(&self, file: &LocalFile) -> Result<PhotoIdentity> {
        let metadata = fs::metadata(&file.path).await.map_err(BridgeError::Io)?;
        if !metadata.is_file() {
            return Err(BridgeError::OperationFailed(format!(
                "{} is not a regular file",
                file.path.display()
            )));
        }
        Ok(PhotoIdentity::new(&file.name, Some(metadata.len())))
    }
}
