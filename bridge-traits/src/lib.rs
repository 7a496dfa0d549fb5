//! # Host Bridge Traits
//!
//! Collaborator contracts between the album reconciliation core and the
//! outside world.
//!
//! ## Overview
//!
//! The reconciliation core (`core-sync`) never talks to the network, the
//! filesystem, or a UI directly. Every capability it needs is expressed as a
//! trait in this crate, together with the plain data records that cross the
//! boundary.
//!
//! ## Traits
//!
//! ### Remote side
//! - [`RemoteStore`](remote::RemoteStore) - List album items, realise albums, transfer single items
//! - [`TrashOracle`](trash::TrashOracle) - Membership check against the trash/recycle collection
//! - [`Recycler`](trash::Recycler) - Move a deleted item into the recycle collection
//!
//! ### Local side
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Directory listing, volume space, timestamps
//! - [`LocalMetadata`](metadata::LocalMetadata) - Best-effort per-file tags, checksums, fingerprints
//!
//! ### Host integration
//! - [`ProgressSink`](progress::ProgressSink) - Progress messages, outcome counters, cancellation
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Adapters
//! should convert their native errors into it and keep the message actionable
//! (include the path or item id involved).
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a host can share one adapter
//! between several album passes.

pub mod error;
pub mod metadata;
pub mod progress;
pub mod remote;
pub mod storage;
pub mod trash;

pub use error::BridgeError;

// Re-export commonly used types
pub use metadata::{LocalMetadata, LocalTags};
pub use progress::ProgressSink;
pub use remote::{Album, MediaKind, PhotoIdentity, RemoteItem, RemoteStore};
pub use storage::{FileSystemAccess, LocalFile, VolumeSpace};
pub use trash::{Recycler, TrashOracle};
