//! Config manager for loading and saving settings.
//!
//! Writes are atomic: the new document goes to a sibling temp file
//! which is then renamed over the target.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::settings::Settings;

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Manages application configuration.
pub struct ConfigManager {
    /// Path to the config file.
    config_path: PathBuf,
    /// Current settings loaded in memory.
    settings: Settings,
}

impl ConfigManager {
    /// Create a manager with default settings in memory.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    /// Load settings from disk, falling back to defaults when the file
    /// does not exist yet.
    pub fn load_or_default(config_path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let config_path = config_path.into();
        let settings = if config_path.exists() {
            let text = fs::read_to_string(&config_path)?;
            toml::from_str(&text)?
        } else {
            Settings::default()
        };
        Ok(Self {
            config_path,
            settings,
        })
    }

    /// Current in-memory settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable access to the in-memory settings.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Path of the backing config file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Persist the in-memory settings atomically.
    pub fn save(&self) -> ConfigResult<()> {
        let text = toml::to_string_pretty(&self.settings)?;

        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.config_path.with_extension("toml.tmp");
        fs::write(&tmp_path, text)?;
        fs::rename(&tmp_path, &self.config_path)?;
        Ok(())
    }
}
