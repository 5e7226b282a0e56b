//! Configuration handling for Daylist
//!
//! Configuration is read from `config.toml` in the platform config directory
//! (e.g. `~/.config/daylist/config.toml`). Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Could not determine a data directory; pass --file or set data_file")]
    NoDataDir,
}

/// User configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the task list is stored (defaults to the platform data dir)
    pub data_file: Option<PathBuf>,

    /// How long validation messages stay on screen
    pub message_ttl_ms: u64,

    /// Length of the removal highlight before a confirmed delete runs
    /// (0 deletes immediately)
    pub removal_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            message_ttl_ms: 3000,
            removal_delay_ms: 250,
        }
    }
}

impl Config {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("dev", "daylist", "daylist")
    }

    /// Returns the config directory
    pub fn config_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns the default config file location
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns the default task file location
    pub fn default_data_file() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join("tasks.json"))
    }

    /// Returns the directory for log files
    pub fn log_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_local_dir().join("logs"))
    }

    /// Loads configuration from `path`, or from the default location
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => return Ok(Self::default()),
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to load config: {}", path.display()))
    }

    /// Parses configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Resolves the task file: explicit override, then config, then default
    pub fn resolve_data_file(&self, explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.data_file.clone())
            .or_else(Self::default_data_file)
            .ok_or(ConfigError::NoDataDir)
    }

    pub fn message_ttl(&self) -> Duration {
        Duration::from_millis(self.message_ttl_ms)
    }

    pub fn removal_delay(&self) -> Duration {
        Duration::from_millis(self.removal_delay_ms)
    }
}
