//! Durable key-value persistence for user scripts.
//!
//! The store only ever talks to the [`KeyValueStorage`] trait. Two backends
//! ship with the crate: [`JsonFileStorage`] writes one JSON file per key
//! under the app data directory, and [`MemoryStorage`] keeps everything in
//! memory for tests and ephemeral sessions.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Key-value storage contract consumed by the script store.
///
/// Keys are short namespaced identifiers; values are serialized blobs.
/// A missing key reads as `None`, never as an error.
pub trait KeyValueStorage {
    /// Read the blob stored under `key`, if any.
    fn read(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous blob.
    fn write(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// File-backed storage: each key becomes `<dir>/<key>.json`.
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Create a storage rooted at `dir`. The directory is created lazily
    /// on first write.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Default storage directory under the platform config dir.
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("scriptboard"))
            .unwrap_or_else(|| PathBuf::from(".scriptboard"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn read(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
