//! Configuration storage port interface

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for the persisted configuration file.
///
/// A missing file is not an error: `load` yields an all-`None` config
/// that merges cleanly under env and CLI overrides.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read the stored configuration, or an empty one if none exists
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Persist the given configuration, creating parent directories
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Location of the backing file
    fn path(&self) -> PathBuf;

    /// Whether the backing file exists
    fn exists(&self) -> bool;

    /// Create the file with default values; fails if it already exists
    async fn init(&self) -> Result<(), ConfigError>;
}
