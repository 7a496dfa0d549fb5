//! # Sync Outcome & Session
//!
//! [`SyncOutcome`] holds the counters of one reconciliation pass. The
//! executor is its only writer and mutates it through `&mut`.
//!
//! [`SyncSession`] is a ready-made [`ProgressSink`] for hosts: it accumulates
//! outcomes across album passes, keeps the latest progress line and status,
//! and carries a [`CancellationToken`] for cooperative cancellation.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let session = Arc::new(SyncSession::new());
//! let bridges = SyncBridges::new(fs, metadata, recycler, session.clone());
//!
//! // From a UI thread:
//! session.cancel();
//!
//! let totals = session.snapshot();
//! println!("{} downloaded, {} uploaded", totals.downloaded, totals.uploaded);
//! ```

use bridge_traits::ProgressSink;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Counters and status for a sync pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub downloaded: u64,
    pub uploaded: u64,
    pub failed: u64,
    /// Set once cancellation was observed
    pub cancelled: bool,
    /// Latest status message, e.g. why downloads were skipped
    pub status: Option<String>,
}

impl SyncOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_downloaded(&mut self) {
        self.downloaded += 1;
    }

    pub fn record_uploaded(&mut self) {
        self.uploaded += 1;
    }

    pub fn record_failed(&mut self) {
        self.failed += 1;
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Items that were transferred successfully
    pub fn transferred(&self) -> u64 {
        self.downloaded + self.uploaded
    }

    /// Fold another pass into this one
    pub fn merge(&mut self, other: &SyncOutcome) {
        self.downloaded += other.downloaded;
        self.uploaded += other.uploaded;
        self.failed += other.failed;
        self.cancelled |= other.cancelled;
        if other.status.is_some() {
            self.status = other.status.clone();
        }
    }
}

/// Unique identifier for a sync session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncSessionId(Uuid);

impl SyncSessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SyncSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SyncSessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host-side progress sink backed by a cancellation token
#[derive(Debug)]
pub struct SyncSession {
    id: SyncSessionId,
    token: CancellationToken,
    totals: Mutex<SyncOutcome>,
    last_message: Mutex<Option<String>>,
}

impl SyncSession {
    pub fn new() -> Self {
        Self::with_token(CancellationToken::new())
    }

    /// Share a token with the rest of the host, e.g. a parent token for all albums
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            id: SyncSessionId::new(),
            token,
            totals: Mutex::new(SyncOutcome::new()),
            last_message: Mutex::new(None),
        }
    }

    pub fn id(&self) -> SyncSessionId {
        self.id
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Ask running passes to stop at their next checkpoint
    pub fn cancel(&self) {
        debug!(session = %self.id, "Cancellation requested");
        self.token.cancel();
    }

    /// Totals accumulated so far
    pub fn snapshot(&self) -> SyncOutcome {
        let mut totals = lock(&self.totals).clone();
        totals.cancelled |= self.token.is_cancelled();
        totals
    }

    pub fn last_message(&self) -> Option<String> {
        lock(&self.last_message).clone()
    }
}

impl Default for SyncSession {
    fn default() -> Self {
        Self::new()
    }
}

// A panic while holding the lock leaves plain counters behind; keep using them.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ProgressSink for SyncSession {
    fn report(&self, message: &str) {
        debug!(session = %self.id, "{}", message);
        *lock(&self.last_message) = Some(message.to_string());
    }

    fn add_outcome(&self, downloaded: u64, uploaded: u64, failed: u64) {
        let mut totals = lock(&self.totals);
        totals.downloaded += downloaded;
        totals.uploaded += uploaded;
        totals.failed += failed;
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    fn set_status(&self, message: &str) {
        lock(&self.totals).set_status(message);
    }
}
