//! Configuration management for the CLI.

use std::env;
use std::path::PathBuf;

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding one JSON file per stored list
    pub data_dir: PathBuf,
    /// Key of the live palette list
    pub store_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = var("PALETTE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".palettes"));

        let store_key = var("PALETTE_STORE_KEY")
            .unwrap_or_else(|| palette_engine::config::SHARED_KEY.to_string());
        if store_key.trim().is_empty() {
            return Err(ConfigError::EmptyStoreKey);
        }

        Ok(Self {
            data_dir,
            store_key,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PALETTE_STORE_KEY must not be empty")]
    EmptyStoreKey,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".palettes"));
        assert_eq!(config.store_key, "PaletteStore.shared");
    }

    #[test]
    fn overrides() {
        let config = Config::from_vars(vars(&[
            ("PALETTE_DATA_DIR", "/tmp/p"),
            ("PALETTE_STORE_KEY", "Mine"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/p"));
        assert_eq!(config.store_key, "Mine");
    }

    #[test]
    fn unknown_variables_are_ignored() {
        let config = Config::from_vars(vars(&[("PALETTE_WATCH", "maybe")])).unwrap();
        assert_eq!(config, Config::from_vars(vars(&[])).unwrap());
    }

    #[test]
    fn rejects_empty_store_key() {
        assert!(matches!(
            Config::from_vars(vars(&[("PALETTE_STORE_KEY", "  ")])),
            Err(ConfigError::EmptyStoreKey)
        ));
    }
}
