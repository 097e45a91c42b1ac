//! Configuration management for the registry

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::preview::DEFAULT_MAX_PREVIEW_BYTES;
use crate::storage::DEFAULT_SLOT;

const APP_NAME: &str = "candidate-registry";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub preview: PreviewConfig,
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the slot file (default: platform data dir)
    pub data_dir: Option<PathBuf>,
    /// Slot name; the file is `<slot>.json`
    pub slot: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            slot: DEFAULT_SLOT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    /// Pictures larger than this get no preview
    pub max_bytes: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_PREVIEW_BYTES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TuiConfig {
    /// Input poll interval in milliseconds
    pub tick_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_ms: 100 }
    }
}

impl Config {
    /// Load configuration from default location or create default
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    /// Load configuration from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Get the configuration file path
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Directory holding the entries slot and logs
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage.data_dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".candidate-registry"))
    }

    /// Log file used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("registry.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.slot, "entries");
        assert_eq!(config.preview.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.tui.tick_ms, 100);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[storage]\nslot = \"candidates\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.storage.slot, "candidates");
        assert_eq!(config.storage.data_dir, None);
        assert_eq!(config.preview, PreviewConfig::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_roundtrip_and_data_dir_override() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.storage.data_dir = Some(temp.path().join("data"));
        config.preview.max_bytes = 1024;

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.data_dir(), temp.path().join("data"));
        assert_eq!(loaded.log_path(), temp.path().join("data").join("registry.log"));
    }

    #[test]
    fn test_invalid_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[preview]\nmax_bytes = \"lots\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
