//! Configuration loading utilities
//!
//! Provides helper functions for loading configuration from various sources
//! with proper error handling and validation.

use crate::{Result, config::Settings};
use std::path::Path;
use tracing::{debug, warn};

/// Configuration loader with multiple source support
#[derive(Debug, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Create new configuration loader
    pub fn new() -> Self {
        Self
    }

    /// Get the config file path from FORMGATE_CONFIG environment variable or
    /// default location.
    ///
    /// Priority:
    /// 1. FORMGATE_CONFIG environment variable
    /// 2. ~/.config/formgate/config.toml (or platform equivalent)
    pub fn get_config_path() -> Option<std::path::PathBuf> {
        if let Ok(config_path) = std::env::var("FORMGATE_CONFIG") {
            let path = std::path::PathBuf::from(config_path);
            if path.exists() {
                debug!("Using config file from FORMGATE_CONFIG: {:?}", path);
                return Some(path);
            } else {
                warn!("FORMGATE_CONFIG points to non-existent file: {:?}", path);
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let default_path = config_dir.join("formgate").join("config.toml");
            if default_path.exists() {
                debug!("Using default config file: {:?}", default_path);
                return Some(default_path);
            }
        }

        debug!("No config file found");
        None
    }

    /// Load configuration with precedence order:
    /// 1. Explicit file argument (highest priority)
    /// 2. FORMGATE_CONFIG / default config file
    /// 3. Default values
    pub fn load(&self, config_file: Option<&Path>) -> Result<Settings> {
        let path = match config_file {
            Some(path) => Some(path.to_path_buf()),
            None => Self::get_config_path(),
        };

        let settings = match path {
            Some(path) => {
                debug!("Loading configuration from {:?}", path);
                let content = std::fs::read_to_string(&path)?;
                toml::from_str(&content)?
            }
            None => Settings::default(),
        };

        settings.validate()?;
        Ok(settings)
    }
}
