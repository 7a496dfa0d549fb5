//! # Reconciliation Units
//!
//! A [`Candidate`] pairs what exists locally with what exists remotely under
//! one file name. The three variants make the "neither side" state
//! unrepresentable.

use bridge_traits::{LocalFile, RemoteItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A local/remote pairing sharing a case-insensitive file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Only a local file exists: a pending upload
    LocalOnly(LocalFile),
    /// Only a remote item exists: a pending download
    RemoteOnly(RemoteItem),
    /// Both exist: resolved by comparing the two sides
    Both { local: LocalFile, remote: RemoteItem },
}

impl Candidate {
    /// Display name: the remote title when there is one, else the local name
    pub fn name(&self) -> &str {
        match self {
            Candidate::LocalOnly(local) => &local.name,
            Candidate::RemoteOnly(remote) | Candidate::Both { remote, .. } => &remote.title,
        }
    }

    pub fn local(&self) -> Option<&LocalFile> {
        match self {
            Candidate::LocalOnly(local) | Candidate::Both { local, .. } => Some(local),
            Candidate::RemoteOnly(_) => None,
        }
    }

    pub fn remote(&self) -> Option<&RemoteItem> {
        match self {
            Candidate::RemoteOnly(remote) | Candidate::Both { remote, .. } => Some(remote),
            Candidate::LocalOnly(_) => None,
        }
    }

    /// The later of the remote update time and the local modification time
    pub fn latest_timestamp(&self) -> DateTime<Utc> {
        match self {
            Candidate::LocalOnly(local) => local.modified,
            Candidate::RemoteOnly(remote) => remote.updated,
            Candidate::Both { local, remote } => local.modified.max(remote.updated),
        }
    }
}

/// What the executor should do with a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Upload,
    Download,
    Delete,
    NoOp,
}

impl SyncAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::Upload => "upload",
            SyncAction::Download => "download",
            SyncAction::Delete => "delete",
            SyncAction::NoOp => "noop",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
