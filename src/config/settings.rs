//! Configuration settings for the ontology merge engine.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ontology: OntologyConfig,
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ontology: OntologyConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        // Try standard config locations
        let config_paths = [
            // Current directory
            PathBuf::from("config.toml"),
            PathBuf::from("ontoforge.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("ontoforge/config.toml"))
                .unwrap_or_default(),
            // Home directory
            dirs::home_dir()
                .map(|p| p.join(".ontoforge/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.ontology.namespace.trim().is_empty() {
            return Err(ConfigError::MissingField("ontology.namespace".to_string()).into());
        }
        if self.storage.snapshot_file.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.snapshot_file must not be empty".to_string(),
            )
            .into());
        }
        Ok(())
    }

    /// Expand the data directory path.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let expanded = shellexpand::tilde(&self.storage.data_dir);
        Ok(PathBuf::from(expanded.as_ref()))
    }

    /// Full path of the snapshot file inside the data directory.
    pub fn snapshot_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(&self.storage.snapshot_file))
    }
}

/// Ontology identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OntologyConfig {
    /// Namespace recorded in every snapshot document.
    pub namespace: String,
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            namespace: "chemistry".to_string(),
        }
    }
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory, tilde-expandable.
    pub data_dir: String,
    /// Snapshot file name inside the data directory.
    pub snapshot_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.ontoforge/data".to_string(),
            snapshot_file: "ontology.json".to_string(),
        }
    }
}
