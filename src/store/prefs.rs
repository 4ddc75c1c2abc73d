//! File-backed key-value preference store.
//!
//! The book collection is persisted as a single blob under a versioned
//! key in a preference store: one JSON object file mapping string keys
//! to arbitrary JSON values. Writes replace the whole file through a
//! rename so a failed write never clobbers the previous contents.

use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use super::error::StoreError;

/// A small key-value preference file, the single place the book blob
/// is persisted.
#[derive(Debug)]
pub struct Prefs {
    path: PathBuf,
}

impl Prefs {
    /// Wrap a preference file path. The file does not have to exist yet;
    /// a missing file reads as an empty store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the value stored under `key`, or `None` if the file or the
    /// key is absent.
    pub fn value(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut map = self.read_map()?;
        Ok(map.remove(key))
    }

    /// Store `value` under `key`, keeping every other key intact.
    pub fn set_value(&self, key: &str, value: Value) -> Result<(), StoreError> {
        // A corrupt preference file is treated as absent data, same as on
        // read; the write replaces it with a well-formed one.
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "replacing unreadable preference file");
                Map::new()
            }
        };
        map.insert(key.to_string(), value);
        self.write_map(&map)
    }

    fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(StoreError::io(&self.path, err)),
        };
        serde_json::from_slice(&bytes).map_err(StoreError::Corrupt)
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(map).map_err(StoreError::Serialize)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        // Write to a sibling temp file, then rename over the old one, so
        // an interrupted write leaves the previous blob readable.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}
