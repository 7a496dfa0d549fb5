//! Partitioning of classified candidates into ordered work queues

use tracing::debug;

use crate::candidate::{Candidate, SyncAction};
use crate::classifier::ActionClassifier;
use crate::deletion::DeletionOracle;

/// Work queues for one pass, each in candidate order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub deletes: Vec<Candidate>,
    pub uploads: Vec<Candidate>,
    pub downloads: Vec<Candidate>,
    /// Candidates classified as no-op
    pub unchanged: usize,
}

impl SyncPlan {
    /// Run every candidate through the deletion oracle, then the classifier.
    ///
    /// Deleted candidates never reach the classifier.
    pub async fn build(
        candidates: Vec<Candidate>,
        oracle: &DeletionOracle<'_>,
        classifier: &ActionClassifier,
    ) -> Self {
        let mut plan = Self::default();

        for candidate in candidates {
            let action = match oracle.check(&candidate).await {
                Some(_) => SyncAction::Delete,
                None => classifier.classify(&candidate),
            };
            debug!(name = %candidate.name(), %action, "Classified candidate");
            plan.push(action, candidate);
        }

        plan
    }

    pub fn push(&mut self, action: SyncAction, candidate: Candidate) {
        match action {
            SyncAction::Delete => self.deletes.push(candidate),
            SyncAction::Upload => self.uploads.push(candidate),
            SyncAction::Download => self.downloads.push(candidate),
            SyncAction::NoOp => self.unchanged += 1,
        }
    }

    /// Whether there is nothing to execute
    pub fn is_empty(&self) -> bool {
        self.deletes.is_empty() && self.uploads.is_empty() && self.downloads.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deletes.len() + self.uploads.len() + self.downloads.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deletion::DELETE_TAG;
    use crate::test_support::{NoMetadata, StubStore};
    use crate::trash::TrashIndex;
    use bridge_traits::{LocalFile, PhotoIdentity, RemoteItem};
    use chrono::{TimeZone, Utc};
    use core_runtime::config::SyncConfig;

    fn at(secs: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[tokio::test]
    async fn test_every_candidate_lands_in_exactly_one_queue() {
        let store = StubStore::default();
        let mut trash = TrashIndex::new();
        trash.insert(PhotoIdentity::new("trashed.jpg", None));
        let metadata = NoMetadata;
        let oracle = DeletionOracle::new(&store, &trash, &metadata);
        let config = SyncConfig::builder().photo_root("/p").build().unwrap();
        let classifier = ActionClassifier::new(&config, false);

        let candidates = vec![
            Candidate::LocalOnly(LocalFile::new("/p/up.jpg", 1, at(10))),
            Candidate::RemoteOnly(RemoteItem::new("1", "down.jpg", at(10))),
            Candidate::RemoteOnly(RemoteItem::new("2", "gone.jpg", at(10)).with_tag(DELETE_TAG)),
            Candidate::RemoteOnly(RemoteItem::new("3", "trashed.jpg", at(10))),
            Candidate::Both {
                local: LocalFile::new("/p/same.jpg", 1, at(10)),
                remote: RemoteItem::new("4", "same.jpg", at(10)),
            },
        ];

        let plan = SyncPlan::build(candidates, &oracle, &classifier).await;

        assert_eq!(plan.uploads.len(), 1);
        assert_eq!(plan.downloads.len(), 1);
        assert_eq!(plan.deletes.len(), 2);
        assert_eq!(plan.unchanged, 1);
        assert_eq!(plan.len(), 4);
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_empty_plan() {
        let mut plan = SyncPlan::default();
        plan.push(
            SyncAction::NoOp,
            Candidate::RemoteOnly(RemoteItem::new("1", "a.jpg", at(0))),
        );

        assert!(plan.is_empty());
        assert_eq!(plan.unchanged, 1);
    }
}
