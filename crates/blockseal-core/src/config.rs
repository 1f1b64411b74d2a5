//! Runtime configuration.
//!
//! Read from TOML; every field has a default so a partial file is fine:
//!
//! ```toml
//! [committer]
//! batch_size = 16
//!
//! [ingest]
//! channel_capacity = 256
//! ```
//!
//! Zero values are rejected by [`BlocksealConfig::validate`]; callers treat
//! that as fatal.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;
use thiserror::Error;

/// Headers per committed tree when nothing else is configured.
pub const DEFAULT_BATCH_SIZE: usize = 8;

/// Bound of the header channel between a source and the ingest task.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Invalid configuration value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `committer.batch_size` must be at least 1.
    #[error("batch_size must be greater than zero")]
    ZeroBatchSize,

    /// `ingest.channel_capacity` must be at least 1.
    #[error("channel_capacity must be greater than zero")]
    ZeroChannelCapacity,
}

/// Top-level configuration file.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BlocksealConfig {
    /// Batch commit settings.
    pub committer: CommitterConfig,
    /// Header ingestion settings.
    pub ingest: IngestConfig,
}

/// Batch commit settings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CommitterConfig {
    /// Headers per tree.
    pub batch_size: usize,
}

/// Header ingestion settings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Capacity of the bounded header channel.
    pub channel_capacity: usize,
}

impl Default for CommitterConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl CommitterConfig {
    /// Config with an explicit batch size (unchecked until used).
    #[must_use]
    pub const fn with_batch_size(batch_size: usize) -> Self {
        Self { batch_size }
    }

    /// Checked batch size.
    pub fn batch_size(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.batch_size).ok_or(ConfigError::ZeroBatchSize)
    }
}

impl IngestConfig {
    /// Checked channel capacity.
    pub fn channel_capacity(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.channel_capacity).ok_or(ConfigError::ZeroChannelCapacity)
    }
}

impl BlocksealConfig {
    /// Reject zero-valued sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.committer.batch_size()?;
        self.ingest.channel_capacity()?;
        Ok(())
    }

    /// Parse from a TOML string (not validated).
    pub fn from_toml_str(src: &str) -> Result<Self> {
        toml::from_str(src).context("parse blockseal config toml")
    }

    /// Read a TOML file (not validated).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&src).with_context(|| format!("in {}", path.display()))
    }
}
