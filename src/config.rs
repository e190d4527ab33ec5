//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/tilescale/tilescale.toml`
//! 3. Explicit config: `--config <FILE>`
//! 4. Command line flags (applied by the CLI layer)

use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Unified configuration for tilescale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Content URIs ending with this suffix are treated as external tilesets
    pub reference_suffix: String,
    /// Write indented JSON instead of compact JSON
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reference_suffix: ".json".into(),
            pretty: false,
        }
    }
}

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub reference_suffix: Option<String>,
    pub pretty: Option<bool>,
}

/// Get the XDG config directory for tilescale.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tilescale").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("tilescale.toml"))
}

/// Load a TOML file into RawSettings for merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let config = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(true))
        .build()
        .map_err(|e| ApplicationError::Config {
            message: format!("read {}: {}", path.display(), e),
        })?;
    config.try_deserialize().map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            reference_suffix: overlay
                .reference_suffix
                .clone()
                .unwrap_or_else(|| self.reference_suffix.clone()),
            pretty: overlay.pretty.unwrap_or(self.pretty),
        }
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.reference_suffix.is_empty() {
            return Err(ApplicationError::Config {
                message: "reference_suffix must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Load settings: defaults, then the global config file if present,
    /// then `explicit` (which must exist).
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), explicit)
    }

    /// Load settings from the given layers.
    ///
    /// # Arguments
    /// * `global` - Optional global config file, skipped when missing
    /// * `explicit` - Optional config file named by the user, required to exist
    pub fn load_layers(global: Option<&Path>, explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(explicit_path) = explicit {
            current = current.merge_with(&load_raw_settings(explicit_path)?);
        }

        current.validate()?;
        Ok(current)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }
}
