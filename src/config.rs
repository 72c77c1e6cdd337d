//! Configuration for sealkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, StoreError};

/// Name of the bucket used when none is configured
pub const DEFAULT_BUCKET: &str = "default";

/// File name placed in the user's home directory when no path is configured
pub const DEFAULT_FILENAME: &str = ".default.store";

/// Main configuration for a sealkv store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Location of the database file.
    ///
    /// Parent directories are created on open. An empty path means
    /// [`default_path`], resolved when the store is opened.
    pub path: PathBuf,

    // -------------------------------------------------------------------------
    // Keyspace Configuration
    // -------------------------------------------------------------------------
    /// Bucket that key operations address until another is selected.
    /// An empty name is replaced by [`DEFAULT_BUCKET`].
    pub bucket: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Config for a file at `path` with the default bucket
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Replace empty fields with their defaults
    ///
    /// # Errors
    ///
    /// Returns `Open` when the path is empty and there is no home directory.
    pub(crate) fn resolve(self) -> Result<Self> {
        self.resolve_with_home(dirs::home_dir())
    }

    fn resolve_with_home(mut self, home: Option<PathBuf>) -> Result<Self> {
        if self.path.as_os_str().is_empty() {
            self.path = path_in_home(home)?;
        }
        if self.bucket.is_empty() {
            self.bucket = DEFAULT_BUCKET.to_string();
        }
        Ok(self)
    }
}

/// Default database location: `~/.default.store`
///
/// # Errors
///
/// Returns `Open` when the current user has no home directory.
pub fn default_path() -> Result<PathBuf> {
    path_in_home(dirs::home_dir())
}

fn path_in_home(home: Option<PathBuf>) -> Result<PathBuf> {
    match home {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(dir.join(DEFAULT_FILENAME)),
        _ => Err(StoreError::Open(
            "no home directory for the default store path".to_string(),
        )),
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the initially active bucket
    pub fn bucket(mut self, name: impl Into<String>) -> Self {
        self.config.bucket = name.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
