//! Version management module
//!
//! Cosmic Reach versions, read from a local JSON catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

/// A row of the versions table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRow {
    pub id: String,
    #[serde(rename = "type")]
    pub release_type: ReleaseType,
    #[serde(rename = "releaseTime")]
    pub release_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseType {
    Release,
    PreAlpha,
    Experiment,
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseType::Release => write!(f, "Release"),
            ReleaseType::PreAlpha => write!(f, "Pre-Alpha"),
            ReleaseType::Experiment => write!(f, "Experiment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("Versions catalog not found at {0}")]
    CatalogMissing(PathBuf),

    #[error("Failed to read versions catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid versions catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Supplies the rows of the versions table
pub trait VersionSource: Send + Sync {
    /// Load all known versions. `force_refresh` bypasses any cache.
    fn load(&self, force_refresh: bool) -> Result<Vec<VersionRow>, VersionError>;
}

/// Reads `versions.json`, caching the parsed rows
pub struct CatalogVersionSource {
    path: PathBuf,
    cache: Mutex<Option<Vec<VersionRow>>>,
}

impl CatalogVersionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    fn read_catalog(&self) -> Result<Vec<VersionRow>, VersionError> {
        if !self.path.exists() {
            return Err(VersionError::CatalogMissing(self.path.clone()));
        }
        let content = std::fs::read_to_string(&self.path)?;
        let rows: Vec<VersionRow> = serde_json::from_str(&content)?;
        tracing::debug!("Loaded {} versions from {:?}", rows.len(), self.path);
        Ok(rows)
    }
}

impl VersionSource for CatalogVersionSource {
    fn load(&self, force_refresh: bool) -> Result<Vec<VersionRow>, VersionError> {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if !force_refresh {
            if let Some(rows) = cache.as_ref() {
                return Ok(rows.clone());
            }
        }

        let rows = self.read_catalog()?;
        *cache = Some(rows.clone());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {"id": "0.3.2", "type": "pre_alpha", "releaseTime": "2024-11-02T18:00:00Z"},
        {"id": "0.3.2-exp", "type": "experiment", "releaseTime": "2024-11-05T18:00:00Z"}
    ]"#;

    #[test]
    fn test_parse_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("versions.json");
        std::fs::write(&path, CATALOG).unwrap();

        let rows = CatalogVersionSource::new(&path).load(false).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].release_type, ReleaseType::PreAlpha);
        assert_eq!(rows[1].release_type.to_string(), "Experiment");
    }

    #[test]
    fn test_cache_and_forced_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("versions.json");
        std::fs::write(&path, CATALOG).unwrap();
        let source = CatalogVersionSource::new(&path);
        assert_eq!(source.load(false).unwrap().len(), 2);

        std::fs::write(&path, "[]").unwrap();
        assert_eq!(source.load(false).unwrap().len(), 2);
        assert!(source.load(true).unwrap().is_empty());
    }

    #[test]
    fn test_missing_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let source = CatalogVersionSource::new(dir.path().join("versions.json"));
        assert!(matches!(source.load(false), Err(VersionError::CatalogMissing(_))));
    }
}
