//! # Desktop Bridge Implementations
//!
//! Default implementations of the local-side bridge traits for desktop
//! platforms (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `FileSystemAccess` using `tokio::fs`, `fs2` for volume capacity, and
//!   `filetime` for setting directory timestamps
//! - `LocalMetadata` computing SHA-256 checksums with `sha2`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{FileMetadataReader, TokioFileSystem};
//! use std::sync::Arc;
//!
//! let fs = Arc::new(TokioFileSystem::new());
//! let metadata = Arc::new(FileMetadataReader::new());
//! ```

mod filesystem;
mod metadata;

pub use filesystem::TokioFileSystem;
pub use metadata::FileMetadataReader;
