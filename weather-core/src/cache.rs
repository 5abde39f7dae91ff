//! Single-slot persistence of the last successfully fetched report.

use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    fmt::Debug,
    fs,
    io::{ErrorKind, Write},
    path::PathBuf,
};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::WeatherReport;

/// Key of the slot holding the serialized report.
pub const CACHE_KEY: &str = "weather_response_data";

/// String key-value storage supplied by the host.
///
/// A `write` must be atomic with respect to `read`: a reader sees either the
/// previous value or the new one.
pub trait SlotStore: Send + Sync + Debug {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SlotStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read cache file: {}", path.display()))
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create cache directory: {}", self.dir.display())
        })?;

        let path = self.path_for(key);

        // Write beside the target, then rename over it.
        let mut tmp = NamedTempFile::new_in(&self.dir).with_context(|| {
            format!("Failed to create temporary file in {}", self.dir.display())
        })?;
        tmp.write_all(value.as_bytes())
            .context("Failed to write cache contents")?;
        tmp.as_file()
            .sync_all()
            .context("Failed to flush cache contents")?;
        tmp.persist(&path)
            .with_context(|| format!("Failed to replace cache file: {}", path.display()))?;

        Ok(())
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.slots.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Holds at most one [`WeatherReport`]. No expiry: the stored value stays
/// until the next successful `store`.
#[derive(Debug)]
pub struct WeatherCache {
    store: Box<dyn SlotStore>,
}

impl WeatherCache {
    pub fn new(store: Box<dyn SlotStore>) -> Self {
        Self { store }
    }

    /// Overwrites the slot with `report`.
    pub fn store(&self, report: &WeatherReport) -> Result<()> {
        let json = serde_json::to_string(report).context("Failed to serialize weather report")?;
        self.store.write(CACHE_KEY, &json)?;
        debug!(location = %report.location_name, "stored weather report");
        Ok(())
    }

    /// Last stored report. Unreadable or undecodable data counts as empty.
    pub fn load(&self) -> Option<WeatherReport> {
        let raw = match self.store.read(CACHE_KEY) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return None,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "failed to read weather cache");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = %e, "discarding undecodable weather cache");
                None
            }
        }
    }
}
