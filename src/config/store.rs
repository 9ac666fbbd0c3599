//! Shared settings store
//!
//! Process-wide handle to the live configuration. Cloning the store shares
//! the same config; mutations are written back to the config file.

use super::Config;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone)]
pub struct SettingsStore {
    inner: Arc<RwLock<Config>>,
    /// Where mutations are persisted. `None` keeps the store in memory only.
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// Create a store backed by the config file at `path`
    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path: Some(path),
        }
    }

    /// Create a store that is never written to disk
    pub fn in_memory(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path: None,
        }
    }

    /// Load the user's config file into a store
    pub fn load() -> anyhow::Result<Self> {
        let path = super::config_path();
        let config = super::load_from(&path)?;
        Ok(Self::new(config, path))
    }

    fn read(&self) -> RwLockReadGuard<'_, Config> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Config> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current configuration
    pub fn snapshot(&self) -> Config {
        self.read().clone()
    }

    /// Whether new instances follow the latest version
    pub fn update_to_latest(&self) -> bool {
        self.read().instances.update_to_latest
    }

    /// Set the "update to latest" flag and persist it
    pub fn set_update_to_latest(&self, value: bool) {
        self.update(|config| config.instances.update_to_latest = value);
    }

    /// Thumbnail edge length for the screenshots tab
    pub fn thumbnail_size(&self) -> u32 {
        self.read().screenshots.thumbnail_size.max(16)
    }

    pub fn dark_theme(&self) -> bool {
        self.read().general.theme != "light"
    }

    /// Resolved path of the versions catalog
    pub fn catalog_path(&self) -> PathBuf {
        let configured = self.read().versions.catalog.clone();
        if configured.is_empty() {
            super::config_dir().join("versions.json")
        } else {
            PathBuf::from(configured)
        }
    }

    /// Apply a change and write the config back. Save failures are logged.
    pub fn update(&self, change: impl FnOnce(&mut Config)) {
        let snapshot = {
            let mut config = self.write();
            change(&mut config);
            config.clone()
        };

        if let Some(path) = &self.path {
            if let Err(e) = super::save_to(path, &snapshot) {
                tracing::error!("Failed to save settings: {:#}", e);
            }
        }
    }
}
