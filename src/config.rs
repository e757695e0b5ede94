//! Configuration for BucketKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{BucketKvError, Result};
use crate::hasher::MAX_GLOBAL_DEPTH;

/// Main configuration for a BucketKV store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Backing file holding the bucket pages.
    /// Layout:
    ///   page 0, page 1, ... (4096 bytes each, one bucket per page)
    pub path: PathBuf,

    // -------------------------------------------------------------------------
    // Directory Configuration
    // -------------------------------------------------------------------------
    /// Highest global depth the directory may grow to (1..=8)
    pub max_global_depth: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./bucketkv.data"),
            max_global_depth: MAX_GLOBAL_DEPTH,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the config for values the store cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.max_global_depth == 0 || self.max_global_depth > MAX_GLOBAL_DEPTH {
            return Err(BucketKvError::Config(format!(
                "max_global_depth must be in 1..={}, got {}",
                MAX_GLOBAL_DEPTH, self.max_global_depth
            )));
        }
        if self.path.as_os_str().is_empty() {
            return Err(BucketKvError::Config("path must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the maximum global depth of the directory
    pub fn max_global_depth(mut self, depth: u8) -> Self {
        self.config.max_global_depth = depth;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
