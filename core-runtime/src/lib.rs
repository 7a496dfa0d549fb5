//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the album sync core:
//! - Logging and tracing bootstrap
//! - Sync configuration with fail-fast validation
//!
//! ## Overview
//!
//! This crate holds the ambient pieces every other crate relies on. It
//! establishes the logging conventions and the settings the reconciliation
//! policy reads.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{SyncConfig, SyncConfigBuilder};
pub use error::{Error, Result};
