//! Trash / Recycle Abstractions

use async_trait::async_trait;

use crate::error::Result;
use crate::remote::{PhotoIdentity, RemoteItem};
use crate::storage::LocalFile;

/// Membership oracle for the trash/recycle collection
///
/// Consulted so that content already deleted elsewhere is not uploaded or
/// downloaded again.
pub trait TrashOracle: Send + Sync {
    fn is_in_trash(&self, identity: &PhotoIdentity) -> bool;
}

/// Moves deleted items into the recycle collection
#[async_trait]
pub trait Recycler: Send + Sync {
    /// Recycle whichever sides of the item are present
    async fn recycle(&self, local: Option<&LocalFile>, remote: Option<&RemoteItem>) -> Result<()>;
}
