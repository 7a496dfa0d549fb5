//! # Item Identity & Matching
//!
//! Joins a remote album listing with a local directory listing by
//! case-insensitive file name.
//!
//! ## Rules
//!
//! - Remote titles that are not a single plain file name (absolute paths,
//!   `..`, anything with a separator) are dropped. A title becomes a path
//!   under the album directory, so it must not be able to leave it.
//! - Names with an excluded extension (`.mov` by default) are dropped on both
//!   sides before anything else happens.
//! - Remote items sharing a join key form a duplicate group. The item whose
//!   [`RemoteStore::item_identifier`] sorts first survives; the rest are
//!   discarded and counted.
//! - With `exclude_videos` set, surviving videos (see [`RemoteItem::is_video`]) are dropped but
//!   their key stays reserved, so a same-named local file is not uploaded.
//! - Local files whose key is not in the remote group map become upload-only
//!   candidates and are ordered before every remote-derived candidate.

use bridge_traits::{LocalFile, RemoteItem, RemoteStore};
use core_runtime::config::SyncConfig;
use std::collections::BTreeMap;
use std::path::{Component, Path};
use tracing::{debug, info, warn};

use crate::candidate::Candidate;
use crate::error::{Result, SyncError};

/// Result of joining the two listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    /// Upload-only candidates first, then remote-derived candidates by key
    pub candidates: Vec<Candidate>,
    /// Remote items dropped because another item shared their name
    pub duplicates_discarded: usize,
    /// Surviving remote items dropped by the `exclude_videos` setting
    pub videos_excluded: usize,
    /// Remote items dropped because their title is not a plain file name
    pub unsafe_titles_skipped: usize,
    /// Size of the remote listing before any filtering
    pub remote_total: usize,
}

/// Whether `name` is exactly one normal path component
///
/// Rejects separators of either platform, `.` and `..`, and roots or drive
/// prefixes, so joining the name onto a directory stays inside it.
pub fn is_plain_file_name(name: &str) -> bool {
    if name.contains('/') || name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Build the candidate list for one album pass.
///
/// # Errors
///
/// Returns [`SyncError::MissingField`] when a remote item has no title, since
/// without one it cannot be joined to anything.
pub fn match_items(
    store: &dyn RemoteStore,
    remote: Vec<RemoteItem>,
    local: Vec<LocalFile>,
    config: &SyncConfig,
) -> Result<MatchReport> {
    let remote_total = remote.len();

    let mut unsafe_titles_skipped = 0;
    let mut groups: BTreeMap<String, Vec<RemoteItem>> = BTreeMap::new();
    for item in remote {
        if item.title.trim().is_empty() {
            return Err(SyncError::MissingField {
                entity: format!("Remote item {}", item.id),
                field: "title".to_string(),
            });
        }
        if !is_plain_file_name(&item.title) {
            warn!(id = %item.id, title = %item.title, "Skipping remote item whose title is not a plain file name");
            unsafe_titles_skipped += 1;
            continue;
        }
        if config.is_excluded_name(&item.title) {
            debug!(title = %item.title, "Skipping remote item with excluded extension");
            continue;
        }
        groups.entry(item.title.to_lowercase()).or_default().push(item);
    }

    let mut duplicates_discarded = 0;
    let mut videos_excluded = 0;
    // `None` marks a key held by an excluded video
    let mut survivors: BTreeMap<String, Option<RemoteItem>> = BTreeMap::new();

    for (key, group) in groups {
        duplicates_discarded += group.len() - 1;
        let survivor = group
            .into_iter()
            .min_by_key(|item| (store.item_identifier(item), item.id.clone()));

        let Some(survivor) = survivor else {
            continue;
        };

        if config.exclude_videos && survivor.is_video() {
            debug!(title = %survivor.title, parts = survivor.content_parts, "Excluding video");
            videos_excluded += 1;
            survivors.insert(key, None);
        } else {
            survivors.insert(key, Some(survivor));
        }
    }

    if duplicates_discarded > 0 {
        info!(
            "Ignoring {} duplicate items of {}",
            duplicates_discarded, remote_total
        );
    }

    let mut upload_only = Vec::new();
    let mut local_by_key: BTreeMap<String, Vec<LocalFile>> = BTreeMap::new();
    for file in local {
        if config.is_excluded_name(&file.name) {
            debug!(file = %file.name, "Skipping local file with excluded extension");
            continue;
        }
        let key = file.name.to_lowercase();
        if survivors.contains_key(&key) {
            local_by_key.entry(key).or_default().push(file);
        } else {
            upload_only.push(file);
        }
    }
    upload_only.sort_by(|a, b| a.name.cmp(&b.name));

    let mut candidates: Vec<Candidate> =
        upload_only.into_iter().map(Candidate::LocalOnly).collect();

    for (key, survivor) in survivors {
        let Some(remote) = survivor else {
            continue;
        };

        let local = local_by_key
            .remove(&key)
            .and_then(|files| pick_local(files, &remote.title));

        candidates.push(match local {
            Some(local) => Candidate::Both { local, remote },
            None => Candidate::RemoteOnly(remote),
        });
    }

    Ok(MatchReport {
        candidates,
        duplicates_discarded,
        videos_excluded,
        unsafe_titles_skipped,
        remote_total,
    })
}

/// On case-sensitive file systems several local files can share a key.
/// Prefer the exact spelling of the remote title, then the first by name.
fn pick_local(mut files: Vec<LocalFile>, title: &str) -> Option<LocalFile> {
    if let Some(index) = files.iter().position(|f| f.name == title) {
        return Some(files.swap_remove(index));
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    files.into_iter().next()
}
