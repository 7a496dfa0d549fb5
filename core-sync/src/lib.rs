//! # Album Reconciliation Core
//!
//! Reconciles one local photo directory with one remote album.
//!
//! ## Overview
//!
//! A pass takes a snapshot of both sides and then:
//! - Joins remote items and local files by case-insensitive name, keeping one
//!   remote item per duplicate name
//! - Drops candidates not changed since a caller-supplied cutoff
//! - Detects deletions from remote tags, local tags, and the trash album
//! - Classifies the rest as upload, download, or no-op
//! - Executes deletes, then uploads, then downloads under a disk-space gate
//!   and cooperative cancellation
//!
//! ## Components
//!
//! - **Candidates** (`candidate`): local/remote pairings and the actions on them
//! - **Matching** (`matching`): duplicate resolution and the name join
//! - **Date Filter** (`date_filter`): cutoff on the latest timestamp
//! - **Deletion Oracle** (`deletion`): ordered deletion signals
//! - **Trash Index** (`trash`): ready-made trash membership lookup
//! - **Classifier** (`classifier`): upload / download / no-op policy
//! - **Plan & Executor** (`plan`, `executor`): ordered queues and the phase machine
//! - **Outcome & Session** (`outcome`): counters and a host-side progress sink
//! - **Album Sync** (`album_sync`): the per-album entry point

pub mod album_sync;
pub mod candidate;
pub mod classifier;
pub mod date_filter;
pub mod deletion;
pub mod error;
pub mod executor;
pub mod matching;
pub mod outcome;
pub mod plan;
pub mod trash;

#[cfg(test)]
mod test_support;

pub use album_sync::{AlbumSync, SyncBridges};
pub use candidate::{Candidate, SyncAction};
pub use classifier::ActionClassifier;
pub use date_filter::retain_newer_than;
pub use deletion::{DeletionOracle, DeletionReason, DELETE_TAG};
pub use error::{Result, SyncError};
pub use executor::{ExecutorPhase, PlanExecutor};
pub use matching::{is_plain_file_name, match_items, MatchReport};
pub use outcome::{SyncOutcome, SyncSession, SyncSessionId};
pub use plan::SyncPlan;
pub use trash::TrashIndex;
