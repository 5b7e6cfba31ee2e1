//! Configuration Management
//!
//! Handles persistent provider configuration for maas-raid.

use crate::maas::auth;
use crate::maas::client::DEFAULT_API_VERSION;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// MAAS root URL, e.g. `http://maas:5240/MAAS`
    #[serde(default)]
    pub api_url: Option<String>,
    /// `consumer_key:token_key:token_secret`
    #[serde(default)]
    pub api_key: Option<String>,
    /// API version, `2.0` when unset
    #[serde(default)]
    pub api_version: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("maas-raid").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file, defaulting on any error
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        // Security: the file holds the API key
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Overlay explicitly given values
    pub fn merge(mut self, other: Config) -> Self {
        if other.api_url.is_some() {
            self.api_url = other.api_url;
        }
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.api_version.is_some() {
            self.api_version = other.api_version;
        }
        self
    }

    /// Get effective API URL (CLI > config > environment)
    pub fn effective_url(&self) -> Option<String> {
        self.api_url.clone().or_else(auth::get_default_url)
    }

    /// Get effective API key (CLI > config > environment)
    pub fn effective_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(auth::get_default_api_key)
    }

    /// Get effective API version (CLI > config > environment > 2.0)
    pub fn effective_api_version(&self) -> String {
        self.api_version
            .clone()
            .or_else(auth::get_default_api_version)
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            api_url: Some("http://maas:5240/MAAS".into()),
            api_key: Some("ck:tk:secret".into()),
            api_version: None,
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_load_missing_or_corrupt_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(Config::load_from(&path), Config::default());

        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_merge_prefers_given_values() {
        let base = Config {
            api_url: Some("http://a/MAAS".into()),
            api_key: Some("a:b:c".into()),
            api_version: None,
        };
        let merged = base.merge(Config {
            api_url: Some("http://b/MAAS".into()),
            ..Default::default()
        });
        assert_eq!(merged.api_url.as_deref(), Some("http://b/MAAS"));
        assert_eq!(merged.api_key.as_deref(), Some("a:b:c"));
    }

    #[test]
    fn test_explicit_version_wins() {
        let config = Config {
            api_version: Some("2.1".into()),
            ..Default::default()
        };
        assert_eq!(config.effective_api_version(), "2.1");
    }
}
