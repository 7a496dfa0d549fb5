//! # Action Classifier
//!
//! Resolves a non-deleted candidate to upload, download, or no-op.
//!
//! One-sided candidates are unconditional. For pairs the checks run in order:
//!
//! 1. Matching checksums (when enabled and known on both sides): no-op.
//! 2. Local newer beyond the tolerance: upload, unless the album is an
//!    auto-backup album or `upload_changed` is off.
//! 3. Remote newer beyond the tolerance: download, unless `download_changed`
//!    is off.
//! 4. Anything else is a tie: no-op.

use bridge_traits::{LocalFile, RemoteItem};
use chrono::Duration;
use core_runtime::config::SyncConfig;

use crate::candidate::{Candidate, SyncAction};

#[derive(Debug, Clone)]
pub struct ActionClassifier {
    tolerance: Duration,
    compare_checksums: bool,
    upload_changed: bool,
    download_changed: bool,
    auto_backup: bool,
}

impl ActionClassifier {
    pub fn new(config: &SyncConfig, auto_backup: bool) -> Self {
        Self {
            tolerance: Duration::seconds(config.timestamp_tolerance_secs),
            compare_checksums: config.compare_checksums,
            upload_changed: config.upload_changed,
            download_changed: config.download_changed,
            auto_backup,
        }
    }

    pub fn classify(&self, candidate: &Candidate) -> SyncAction {
        match candidate {
            Candidate::LocalOnly(_) => SyncAction::Upload,
            Candidate::RemoteOnly(_) => SyncAction::Download,
            Candidate::Both { local, remote } => self.compare(local, remote),
        }
    }

    fn compare(&self, local: &LocalFile, remote: &RemoteItem) -> SyncAction {
        if self.compare_checksums {
            if let (Some(ours), Some(theirs)) = (&local.checksum, &remote.checksum) {
                if ours.eq_ignore_ascii_case(theirs) {
                    return SyncAction::NoOp;
                }
            }
        }

        let drift = local.modified - remote.updated;

        if drift > self.tolerance {
            // Auto-backup items are the originals; never overwrite them
            if self.auto_backup || !self.upload_changed {
                return SyncAction::NoOp;
            }
            return SyncAction::Upload;
        }

        if -drift > self.tolerance {
            if !self.download_changed {
                return SyncAction::NoOp;
            }
            return SyncAction::Download;
        }

        SyncAction::NoOp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn pair(local_secs: i64, remote_secs: i64) -> Candidate {
        Candidate::Both {
            local: LocalFile::new("/p/a.jpg", 10, at(local_secs)),
            remote: RemoteItem::new("1", "a.jpg", at(remote_secs)),
        }
    }

    fn classifier(auto_backup: bool) -> ActionClassifier {
        let config = SyncConfig::builder().photo_root("/p").build().unwrap();
        ActionClassifier::new(&config, auto_backup)
    }

    #[test]
    fn test_one_sided_candidates() {
        let c = classifier(false);

        assert_eq!(
            c.classify(&Candidate::LocalOnly(LocalFile::new("/p/a.jpg", 1, at(0)))),
            SyncAction::Upload
        );
        assert_eq!(
            c.classify(&Candidate::RemoteOnly(RemoteItem::new("1", "a.jpg", at(0)))),
            SyncAction::Download
        );
    }

    #[test]
    fn test_remote_newer_downloads() {
        assert_eq!(classifier(false).classify(&pair(100, 200)), SyncAction::Download);
    }

    #[test]
    fn test_local_newer_uploads() {
        assert_eq!(classifier(false).classify(&pair(200, 100)), SyncAction::Upload);
    }

    #[test]
    fn test_auto_backup_keeps_remote_copy() {
        assert_eq!(classifier(true).classify(&pair(200, 100)), SyncAction::NoOp);
        assert_eq!(classifier(true).classify(&pair(100, 200)), SyncAction::Download);
    }

    #[test]
    fn test_within_tolerance_is_a_tie() {
        let c = classifier(false);

        assert_eq!(c.classify(&pair(100, 102)), SyncAction::NoOp);
        assert_eq!(c.classify(&pair(102, 100)), SyncAction::NoOp);
        assert_eq!(c.classify(&pair(100, 103)), SyncAction::Download);
    }

    #[test]
    fn test_matching_checksums_short_circuit() {
        let candidate = Candidate::Both {
            local: LocalFile::new("/p/a.jpg", 10, at(500)).with_checksum("ABC"),
            remote: RemoteItem::new("1", "a.jpg", at(100)).with_checksum("abc"),
        };

        assert_eq!(classifier(false).classify(&candidate), SyncAction::NoOp);
    }

    #[test]
    fn test_changed_transfers_can_be_disabled() {
        let config = SyncConfig::builder()
            .photo_root("/p")
            .upload_changed(false)
            .download_changed(false)
            .build()
            .unwrap();
        let c = ActionClassifier::new(&config, false);

        assert_eq!(c.classify(&pair(200, 100)), SyncAction::NoOp);
        assert_eq!(c.classify(&pair(100, 200)), SyncAction::NoOp);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let c = classifier(false);
        let candidate = pair(100, 200);

        assert_eq!(c.classify(&candidate), c.classify(&candidate));
    }
}
