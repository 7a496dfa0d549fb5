//! Workspace placeholder crate.
//!
//! Re-exports the album reconciliation core and, with the `desktop` feature,
//! the tokio-backed local adapters, so a host can depend on one crate instead
//! of wiring each workspace member.

pub use core_runtime;
pub use core_sync;

#[cfg(feature = "desktop")]
pub use bridge_desktop;
