//! Instance management module
//!
//! Create and list Cosmic Reach instances. Each instance is a directory
//! holding `instance.toml` and the game directory `cosmic-reach/`.

use crate::util::sanitize_file_name;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const INSTANCE_FILE: &str = "instance.toml";
const COSMIC_DIR: &str = "cosmic-reach";

/// Instance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    /// Group shown in the instance list (empty = default group)
    #[serde(default)]
    pub group: String,
    /// Cosmic Reach version id
    pub version: String,
    /// Follow the latest version on launch
    #[serde(default)]
    pub auto_update: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("Instance with name '{0}' already exists")]
    AlreadyExists(String),

    #[error("Instance '{0}' not found")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write instance file: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid instance file: {0}")]
    Deserialize(#[from] toml::de::Error),
}

/// Instance creation as seen by the GUI
pub trait InstanceService: Send + Sync {
    fn create_instance(
        &self,
        name: &str,
        group: &str,
        version: &str,
        auto_update: bool,
    ) -> Result<Instance, InstanceError>;
}

/// Manages instances on disk
#[derive(Debug, Clone)]
pub struct InstanceManager {
    instances_dir: PathBuf,
}

impl InstanceManager {
    /// Manager for the default instances directory
    pub fn new() -> Self {
        Self::with_dir(crate::config::config_dir().join("instances"))
    }

    pub fn with_dir(instances_dir: impl Into<PathBuf>) -> Self {
        Self {
            instances_dir: instances_dir.into(),
        }
    }

    pub fn instances_dir(&self) -> &Path {
        &self.instances_dir
    }

    /// Directory holding an instance's files
    pub fn instance_dir(&self, name: &str) -> PathBuf {
        self.instances_dir.join(sanitize_file_name(name))
    }

    /// Game directory of an instance
    pub fn cosmic_dir(&self, name: &str) -> PathBuf {
        self.instance_dir(name).join(COSMIC_DIR)
    }

    /// Screenshots written by the game
    pub fn screenshots_dir(&self, name: &str) -> PathBuf {
        self.cosmic_dir(name).join("screenshots")
    }

    /// Create a new instance
    pub fn create(
        &self,
        name: &str,
        group: &str,
        version: &str,
        auto_update: bool,
    ) -> Result<Instance, InstanceError> {
        let name = name.trim();
        let dir = self.instance_dir(name);

        if dir.exists() {
            return Err(InstanceError::AlreadyExists(name.to_string()));
        }

        std::fs::create_dir_all(dir.join(COSMIC_DIR))?;

        let instance = Instance {
            name: name.to_string(),
            group: group.to_string(),
            version: version.to_string(),
            auto_update,
            created_at: Utc::now(),
        };

        if let Err(e) = Self::write(&dir, &instance) {
            // Leave no half-created instance behind
            let _ = std::fs::remove_dir_all(&dir);
            return Err(e);
        }

        tracing::info!("Created instance '{}' ({})", instance.name, instance.version);
        Ok(instance)
    }

    fn write(dir: &Path, instance: &Instance) -> Result<(), InstanceError> {
        let content = toml::to_string_pretty(instance)?;
        std::fs::write(dir.join(INSTANCE_FILE), content)?;
        Ok(())
    }

    /// Load a single instance by name
    pub fn load(&self, name: &str) -> Result<Instance, InstanceError> {
        let path = self.instance_dir(name).join(INSTANCE_FILE);
        if !path.exists() {
            return Err(InstanceError::NotFound(name.to_string()));
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }

    /// List all instances, sorted by name. Unreadable entries are skipped.
    pub fn list(&self) -> Result<Vec<Instance>, InstanceError> {
        let mut instances = Vec::new();

        if !self.instances_dir.exists() {
            return Ok(instances);
        }

        for entry in std::fs::read_dir(&self.instances_dir)? {
            let path = entry?.path();
            let config_path = path.join(INSTANCE_FILE);
            if !config_path.is_file() {
                continue;
            }

            let parsed = std::fs::read_to_string(&config_path)
                .map_err(InstanceError::from)
                .and_then(|content| Ok(toml::from_str::<Instance>(&content)?));

            match parsed {
                Ok(instance) => instances.push(instance),
                Err(e) => tracing::warn!("Skipping {:?}: {}", path, e),
            }
        }

        instances.sort_by_key(|i| i.name.to_lowercase());
        Ok(instances)
    }
}

impl Default for InstanceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceService for InstanceManager {
    fn create_instance(
        &self,
        name: &str,
        group: &str,
        version: &str,
        auto_update: bool,
    ) -> Result<Instance, InstanceError> {
        self.create(name, group, version, auto_update)
    }
}
