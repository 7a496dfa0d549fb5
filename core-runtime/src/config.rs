//! # Sync Configuration Module
//!
//! Provides the settings that drive album reconciliation.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `SyncConfig`
//! instance. It enforces fail-fast validation so a pass never starts with a
//! nonsensical policy (for example a free-space threshold above 100%).
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::SyncConfig;
//!
//! let config = SyncConfig::builder()
//!     .photo_root("/home/me/Pictures")
//!     .exclude_videos(true)
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Persistence
//!
//! `SyncConfig` is serde-serialisable; [`SyncConfig::load`] and
//! [`SyncConfig::save`] read and write it as JSON and validate on load.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_TIMESTAMP_TOLERANCE_SECS: i64 = 2;
const DEFAULT_MIN_FREE_SPACE_PERCENT: f64 = 2.0;

/// Settings for album reconciliation.
///
/// Use [`SyncConfigBuilder`] to construct instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Root folder holding one directory per album. Its volume is the one
    /// probed before downloads.
    pub photo_root: PathBuf,

    /// Skip remote items that carry more than one media-content part
    pub exclude_videos: bool,

    /// Upload when both sides exist and the local copy is newer
    pub upload_changed: bool,

    /// Download when both sides exist and the remote copy is newer
    pub download_changed: bool,

    /// Timestamp differences at or below this many seconds count as equal
    pub timestamp_tolerance_secs: i64,

    /// Treat equal checksums as unchanged regardless of timestamps
    pub compare_checksums: bool,

    /// Downloads stop when free space drops to this percentage or below
    pub min_free_space_percent: f64,

    /// File extensions (without the dot, lowercase) never synced in either direction
    pub excluded_extensions: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            photo_root: PathBuf::new(),
            exclude_videos: false,
            upload_changed: true,
            download_changed: true,
            timestamp_tolerance_secs: DEFAULT_TIMESTAMP_TOLERANCE_SECS,
            compare_checksums: true,
            min_free_space_percent: DEFAULT_MIN_FREE_SPACE_PERCENT,
            excluded_extensions: vec!["mov".to_string()],
        }
    }
}

impl SyncConfig {
    /// Creates a new builder for constructing a `SyncConfig`.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Photo root is not empty
    /// - Timestamp tolerance is not negative
    /// - Free-space threshold lies strictly between 0 and 100
    /// - Excluded extensions are bare, non-empty extensions
    pub fn validate(&self) -> Result<()> {
        if self.photo_root.as_os_str().is_empty() {
            return Err(Error::Config("Photo root cannot be empty".to_string()));
        }

        if self.timestamp_tolerance_secs < 0 {
            return Err(Error::Config(
                "Timestamp tolerance cannot be negative".to_string(),
            ));
        }

        if !(self.min_free_space_percent > 0.0 && self.min_free_space_percent < 100.0) {
            return Err(Error::Config(format!(
                "Minimum free space must be between 0 and 100 percent, got {}",
                self.min_free_space_percent
            )));
        }

        if let Some(bad) = self
            .excluded_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(Error::Config(format!(
                "Excluded extension '{}' must be a bare extension such as 'mov'",
                bad
            )));
        }

        Ok(())
    }

    /// Whether `name` carries one of the excluded extensions
    pub fn is_excluded_name(&self, name: &str) -> bool {
        let Some((_, ext)) = name.rsplit_once('.') else {
            return false;
        };
        self.excluded_extensions
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(ext))
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config: SyncConfig = serde_json::from_str(&raw).map_err(|e| {
            Error::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Internal(format!("Failed to serialise config: {}", e)))?;
        std::fs::write(path, raw).map_err(|e| {
            Error::Config(format!("Failed to write config {}: {}", path.display(), e))
        })
    }
}

/// Builder for constructing [`SyncConfig`] instances.
///
/// Unset options keep the [`SyncConfig::default`] values; only the photo
/// root is required.
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    photo_root: Option<PathBuf>,
    exclude_videos: Option<bool>,
    upload_changed: Option<bool>,
    download_changed: Option<bool>,
    timestamp_tolerance_secs: Option<i64>,
    compare_checksums: Option<bool>,
    min_free_space_percent: Option<f64>,
    excluded_extensions: Option<Vec<String>>,
}

impl SyncConfigBuilder {
    /// Sets the photo root folder (required).
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::SyncConfig;
    ///
    /// let builder = SyncConfig::builder().photo_root("/home/me/Pictures");
    /// ```
    pub fn photo_root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.photo_root = Some(path.into());
        self
    }

    pub fn exclude_videos(mut self, exclude: bool) -> Self {
        self.exclude_videos = Some(exclude);
        self
    }

    pub fn upload_changed(mut self, enabled: bool) -> Self {
        self.upload_changed = Some(enabled);
        self
    }

    pub fn download_changed(mut self, enabled: bool) -> Self {
        self.download_changed = Some(enabled);
        self
    }

    pub fn timestamp_tolerance_secs(mut self, secs: i64) -> Self {
        self.timestamp_tolerance_secs = Some(secs);
        self
    }

    pub fn compare_checksums(mut self, enabled: bool) -> Self {
        self.compare_checksums = Some(enabled);
        self
    }

    /// Sets the free-space admission threshold, in percent.
    ///
    /// Default: 2%
    pub fn min_free_space_percent(mut self, percent: f64) -> Self {
        self.min_free_space_percent = Some(percent);
        self
    }

    /// Replaces the excluded extension list. Extensions are stored lowercase.
    pub fn excluded_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_extensions = Some(
            extensions
                .into_iter()
                .map(|ext| ext.into().to_lowercase())
                .collect(),
        );
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the photo root is missing or any value
    /// fails [`SyncConfig::validate`].
    pub fn build(self) -> Result<SyncConfig> {
        let defaults = SyncConfig::default();

        let photo_root = self.photo_root.ok_or_else(|| {
            Error::Config(
                "Photo root is required. Call .photo_root(\"/path/to/photos\") on the builder."
                    .to_string(),
            )
        })?;

        let config = SyncConfig {
            photo_root,
            exclude_videos: self.exclude_videos.unwrap_or(defaults.exclude_videos),
            upload_changed: self.upload_changed.unwrap_or(defaults.upload_changed),
            download_changed: self.download_changed.unwrap_or(defaults.download_changed),
            timestamp_tolerance_secs: self
                .timestamp_tolerance_secs
                .unwrap_or(defaults.timestamp_tolerance_secs),
            compare_checksums: self.compare_checksums.unwrap_or(defaults.compare_checksums),
            min_free_space_percent: self
                .min_free_space_percent
                .unwrap_or(defaults.min_free_space_percent),
            excluded_extensions: self
                .excluded_extensions
                .unwrap_or(defaults.excluded_extensions),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_photo_root() {
        let result = SyncConfig::builder().build();

        assert!(result.is_err());
        match result.unwrap_err() {
            Error::Config(msg) => assert!(msg.contains("Photo root is required")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_defaults() {
        let config = SyncConfig::builder()
            .photo_root("/photos")
            .build()
            .unwrap();

        assert_eq!(config.photo_root, PathBuf::from("/photos"));
        assert!(!config.exclude_videos);
        assert!(config.upload_changed);
        assert!(config.download_changed);
        assert_eq!(config.timestamp_tolerance_secs, 2);
        assert_eq!(config.min_free_space_percent, 2.0);
        assert_eq!(config.excluded_extensions, vec!["mov".to_string()]);
    }

    #[test]
    fn test_validate_rejects_bad_free_space() {
        for percent in [0.0, -1.0, 100.0, 150.0] {
            let result = SyncConfig::builder()
                .photo_root("/photos")
                .min_free_space_percent(percent)
                .build();
            assert!(result.is_err(), "percent {} should be rejected", percent);
        }
    }

    #[test]
    fn test_validate_rejects_negative_tolerance() {
        let result = SyncConfig::builder()
            .photo_root("/photos")
            .timestamp_tolerance_secs(-5)
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_dotted_extension() {
        let result = SyncConfig::builder()
            .photo_root("/photos")
            .excluded_extensions([".mov"])
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_is_excluded_name() {
        let config = SyncConfig::builder()
            .photo_root("/photos")
            .excluded_extensions(["MOV", "avi"])
            .build()
            .unwrap();

        assert!(config.is_excluded_name("clip.mov"));
        assert!(config.is_excluded_name("CLIP.MOV"));
        assert!(config.is_excluded_name("old.avi"));
        assert!(!config.is_excluded_name("photo.jpg"));
        assert!(!config.is_excluded_name("mov"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.json");

        let config = SyncConfig::builder()
            .photo_root("/photos")
            .exclude_videos(true)
            .min_free_space_percent(5.0)
            .build()
            .unwrap();

        config.save(&path).unwrap();
        let loaded = SyncConfig::load(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.json");
        std::fs::write(&path, r#"{"photo_root": ""}"#).unwrap();

        assert!(SyncConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_fills_missing_fields_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.json");
        std::fs::write(&path, r#"{"photo_root": "/photos", "exclude_videos": true}"#).unwrap();

        let config = SyncConfig::load(&path).unwrap();
        assert!(config.exclude_videos);
        assert!(config.download_changed);
        assert_eq!(config.excluded_extensions, vec!["mov".to_string()]);
    }
}
