//! Local Metadata Abstractions
//!
//! Per-file information that lives beside or inside a photo rather than in
//! the directory listing: sidecar tags, content checksums, and fingerprints.

use async_trait::async_trait;

use crate::error::Result;
use crate::remote::PhotoIdentity;
use crate::storage::LocalFile;

/// Tags read from a file's metadata sidecar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalTags {
    /// The user flagged this file for deletion
    pub delete: bool,
    /// Any other keywords found
    pub keywords: Vec<String>,
}

/// Local metadata reader
///
/// Reads are best-effort: missing or corrupt metadata is "no information",
/// never an error, for [`read_tags`](LocalMetadata::read_tags) and
/// [`checksum`](LocalMetadata::checksum).
#[async_trait]
pub trait LocalMetadata: Send + Sync {
    /// Read sidecar tags for `file`, or `None` when there are none
    async fn read_tags(&self, file: &LocalFile) -> Option<LocalTags>;

    /// Compute the content checksum of `file` as a lowercase hex digest
    ///
    /// The digest is handed to [`RemoteStore::upload`](crate::remote::RemoteStore::upload)
    /// as-is and compared with [`RemoteItem::checksum`](crate::remote::RemoteItem::checksum),
    /// so an implementation must use whatever algorithm the paired store expects.
    async fn checksum(&self, file: &LocalFile) -> Option<String>;

    /// Derive the identity used to look `file` up in the trash
    ///
    /// May fail (unreadable file, vanished file); callers decide whether the
    /// failure matters.
    async fn fingerprint(&self, file: &LocalFile) -> Result<PhotoIdentity>;
}
