//! Configuration management for Feeder.
//!
//! Configuration is read from `~/.config/feeder/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::images::default_table;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub images: ImageConfig,
}

/// Where the article document lives.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Defaults to `<data dir>/feeder/articles.json`.
    pub articles_path: Option<PathBuf>,
}

/// Bundled hero image lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Defaults to `<data dir>/feeder/images`.
    pub assets_dir: Option<PathBuf>,
    pub extension: String,
    /// Exact image address -> bundled asset name.
    pub table: BTreeMap<String, String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            assets_dir: None,
            extension: "jpg".to_string(),
            table: default_table(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/feeder/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("feeder").join("config.toml"))
    }

    pub fn articles_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.source.articles_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("articles.json")),
        }
    }

    pub fn assets_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.images.assets_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::data_dir()?.join("images")),
        }
    }

    fn data_dir() -> Result<PathBuf, ConfigError> {
        let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        Ok(data_dir.join("feeder"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        let mut content = String::from(
            r##"# Feeder Configuration

[source]
# Article document ({"articles": [...]}). Defaults to the platform data
# directory, e.g. ~/.local/share/feeder/articles.json
# articles_path = "/path/to/articles.json"

[images]
# Directory holding the bundled hero images. Defaults to the platform data
# directory, e.g. ~/.local/share/feeder/images
# assets_dir = "/path/to/images"

# File extension of the bundled images
extension = "jpg"

# Known hero image addresses and the bundled image each one maps to.
# Articles whose hero_image is not listed here are rejected on load.
[images.table]
"##,
        );

        for (address, name) in default_table() {
            content.push_str(&format!("\"{}\" = \"{}\"\n", address, name));
        }

        content
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
