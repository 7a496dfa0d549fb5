//! # Deletion Oracle
//!
//! Decides whether a candidate was deleted on either side. Consulted before
//! classification; a deleted candidate is recycled and never transferred.
//!
//! Signals are checked in a fixed order and the first hit wins:
//!
//! 1. remote item tagged [`DELETE_TAG`]
//! 2. remote item found in the trash
//! 3. local-only file whose sidecar carries the delete flag
//! 4. local-only file whose fingerprint is found in the trash
//!
//! Fingerprint failures in step 4 count as "not deleted".

use bridge_traits::{LocalMetadata, RemoteStore, TrashOracle};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::candidate::Candidate;

/// Keyword marking a remote item for deletion
pub const DELETE_TAG: &str = "delete";

/// Which signal marked a candidate as deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionReason {
    RemoteTag,
    RemoteTrashed,
    LocalTag,
    LocalTrashed,
}

impl DeletionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionReason::RemoteTag => "remote_tag",
            DeletionReason::RemoteTrashed => "remote_trashed",
            DeletionReason::LocalTag => "local_tag",
            DeletionReason::LocalTrashed => "local_trashed",
        }
    }
}

impl fmt::Display for DeletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub struct DeletionOracle<'a> {
    store: &'a dyn RemoteStore,
    trash: &'a dyn TrashOracle,
    metadata: &'a dyn LocalMetadata,
}

impl<'a> DeletionOracle<'a> {
    pub fn new(
        store: &'a dyn RemoteStore,
        trash: &'a dyn TrashOracle,
        metadata: &'a dyn LocalMetadata,
    ) -> Self {
        Self {
            store,
            trash,
            metadata,
        }
    }

    /// Returns the first deletion signal found for `candidate`, if any
    pub async fn check(&self, candidate: &Candidate) -> Option<DeletionReason> {
        let reason = match candidate.remote() {
            Some(remote) => {
                if remote.has_tag(DELETE_TAG) {
                    Some(DeletionReason::RemoteTag)
                } else if self.trash.is_in_trash(&self.store.item_identity(remote)) {
                    Some(DeletionReason::RemoteTrashed)
                } else {
                    None
                }
            }
            None => match candidate.local() {
                Some(local) => {
                    let flagged = self
                        .metadata
                        .read_tags(local)
                        .await
                        .is_some_and(|tags| tags.delete);

                    if flagged {
                        Some(DeletionReason::LocalTag)
                    } else {
                        // Best effort: an unreadable file is simply not known to be trashed
                        match self.metadata.fingerprint(local).await.ok() {
                            Some(identity) if self.trash.is_in_trash(&identity) => {
                                Some(DeletionReason::LocalTrashed)
                            }
                            _ => None,
                        }
                    }
                }
                None => None,
            },
        };

        if let Some(reason) = reason {
            debug!(name = %candidate.name(), %reason, "Candidate marked deleted");
        }
        reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubStore;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{BridgeError, LocalFile, LocalTags, PhotoIdentity, RemoteItem};
    use chrono::{TimeZone, Utc};
    use mockall::mock;
    use mockall::predicate::*;

    mock! {
        Trash {}

        impl TrashOracle for Trash {
            fn is_in_trash(&self, identity: &PhotoIdentity) -> bool;
        }
    }

    mock! {
        Metadata {}

        #[async_trait]
        impl LocalMetadata for Metadata {
            async fn read_tags(&self, file: &LocalFile) -> Option<LocalTags>;
            async fn checksum(&self, file: &LocalFile) -> Option<String>;
            async fn fingerprint(&self, file: &LocalFile) -> BridgeResult<PhotoIdentity>;
        }
    }

    fn local(name: &str) -> LocalFile {
        LocalFile::new(format!("/photos/a/{}", name), 5, Utc.timestamp_opt(10, 0).unwrap())
    }

    fn remote(name: &str) -> RemoteItem {
        RemoteItem::new("1", name, Utc.timestamp_opt(10, 0).unwrap()).with_size(5)
    }

    #[tokio::test]
    async fn test_remote_tag_wins_without_consulting_anything_else() {
        let mut trash = MockTrash::new();
        trash.expect_is_in_trash().never();
        let mut metadata = MockMetadata::new();
        metadata.expect_read_tags().never();

        let store = StubStore::default();
        let oracle = DeletionOracle::new(&store, &trash, &metadata);
        let candidate = Candidate::Both {
            local: local("a.jpg"),
            remote: remote("a.jpg").with_tag(DELETE_TAG),
        };

        assert_eq!(oracle.check(&candidate).await, Some(DeletionReason::RemoteTag));
    }

    #[tokio::test]
    async fn test_remote_in_trash() {
        let mut trash = MockTrash::new();
        trash
            .expect_is_in_trash()
            .with(eq(PhotoIdentity::new("a.jpg", Some(5))))
            .times(1)
            .return_const(true);
        let metadata = MockMetadata::new();

        let store = StubStore::default();
        let oracle = DeletionOracle::new(&store, &trash, &metadata);

        assert_eq!(
            oracle.check(&Candidate::RemoteOnly(remote("A.jpg"))).await,
            Some(DeletionReason::RemoteTrashed)
        );
    }

    #[tokio::test]
    async fn test_local_signals_ignored_when_remote_present() {
        let mut trash = MockTrash::new();
        trash.expect_is_in_trash().return_const(false);
        let mut metadata = MockMetadata::new();
        metadata.expect_read_tags().never();
        metadata.expect_fingerprint().never();

        let store = StubStore::default();
        let oracle = DeletionOracle::new(&store, &trash, &metadata);
        let candidate = Candidate::Both {
            local: local("a.jpg"),
            remote: remote("a.jpg"),
        };

        assert_eq!(oracle.check(&candidate).await, None);
    }

    #[tokio::test]
    async fn test_local_delete_flag() {
        let mut trash = MockTrash::new();
        trash.expect_is_in_trash().never();
        let mut metadata = MockMetadata::new();
        metadata.expect_read_tags().returning(|_| {
            Some(LocalTags {
                delete: true,
                keywords: Vec::new(),
            })
        });

        let store = StubStore::default();
        let oracle = DeletionOracle::new(&store, &trash, &metadata);

        assert_eq!(
            oracle.check(&Candidate::LocalOnly(local("a.jpg"))).await,
            Some(DeletionReason::LocalTag)
        );
    }

    #[tokio::test]
    async fn test_local_fingerprint_in_trash() {
        let mut trash = MockTrash::new();
        trash.expect_is_in_trash().return_const(true);
        let mut metadata = MockMetadata::new();
        metadata.expect_read_tags().returning(|_| None);
        metadata
            .expect_fingerprint()
            .returning(|file| Ok(PhotoIdentity::of_local(file)));

        let store = StubStore::default();
        let oracle = DeletionOracle::new(&store, &trash, &metadata);

        assert_eq!(
            oracle.check(&Candidate::LocalOnly(local("a.jpg"))).await,
            Some(DeletionReason::LocalTrashed)
        );
    }

    #[tokio::test]
    async fn test_fingerprint_failure_means_not_deleted() {
        let mut trash = MockTrash::new();
        trash.expect_is_in_trash().never();
        let mut metadata = MockMetadata::new();
        metadata.expect_read_tags().returning(|_| None);
        metadata
            .expect_fingerprint()
            .returning(|_| Err(BridgeError::OperationFailed("unreadable".to_string())));

        let store = StubStore::default();
        let oracle = DeletionOracle::new(&store, &trash, &metadata);

        assert_eq!(oracle.check(&Candidate::LocalOnly(local("a.jpg"))).await, None);
    }
}
