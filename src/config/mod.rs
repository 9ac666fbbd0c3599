//! Configuration module
//!
//! Handles loading and saving launcher configuration.

mod schema;
mod store;

pub use schema::{Config, GeneralConfig, InstancesConfig, ScreenshotsConfig, VersionsConfig};
pub use store::SettingsStore;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Get the configuration directory path
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".crlauncher")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load configuration from disk
pub fn load() -> Result<Config> {
    load_from(&config_path())
}

/// Load configuration from `path`, writing defaults if it does not exist
pub fn load_from(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    } else {
        let config = Config::default();
        save_to(path, &config)?;
        Ok(config)
    }
}

/// Save configuration to disk
pub fn save(config: &Config) -> Result<()> {
    save_to(&config_path(), config)
}

/// Save configuration to `path`
pub fn save_to(path: &Path, config: &Config) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Configuration saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.general.theme = "light".to_string();
        config.screenshots.thumbnail_size = 64;
        save_to(&path, &config).unwrap();

        assert_eq!(load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "general = 5").unwrap();

        assert!(load_from(&path).is_err());
    }
}
