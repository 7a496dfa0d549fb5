//! Cutoff filter applied between matching and classification

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::candidate::Candidate;

/// Keep only candidates whose latest timestamp is strictly after `cutoff`.
///
/// Pass [`DateTime::<Utc>::MIN_UTC`] to keep everything.
pub fn retain_newer_than(candidates: Vec<Candidate>, cutoff: DateTime<Utc>) -> Vec<Candidate> {
    let before = candidates.len();
    let kept: Vec<Candidate> = candidates
        .into_iter()
        .filter(|candidate| candidate.latest_timestamp() > cutoff)
        .collect();

    if kept.len() < before {
        debug!(
            dropped = before - kept.len(),
            %cutoff,
            "Dropped candidates not newer than cutoff"
        );
    }
    kept
}
