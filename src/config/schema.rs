//! Configuration schema
//!
//! Defines the structure of the configuration file.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub instances: InstancesConfig,

    #[serde(default)]
    pub versions: VersionsConfig,

    #[serde(default)]
    pub screenshots: ScreenshotsConfig,
}

/// General launcher settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// UI theme (dark/light)
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

/// Defaults applied to newly created instances
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstancesConfig {
    /// Keep new instances on the latest Cosmic Reach version
    #[serde(default)]
    pub update_to_latest: bool,
}

/// Version catalog settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionsConfig {
    /// Path to the versions catalog (empty = `versions.json` in the config dir)
    #[serde(default)]
    pub catalog: String,
}

/// Screenshot tab settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotsConfig {
    /// Longest edge of a thumbnail, in pixels
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,
}

impl Default for ScreenshotsConfig {
    fn default() -> Self {
        Self {
            thumbnail_size: default_thumbnail_size(),
        }
    }
}

// Default value functions for serde
fn default_theme() -> String {
    "dark".to_string()
}
fn default_thumbnail_size() -> u32 {
    192
}
