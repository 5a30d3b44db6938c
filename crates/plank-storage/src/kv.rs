//! Key-value byte stores backing the persistence adapter.
//!
//! The board core only ever sees the [`KvStore`] trait: one key holding
//! one serialized document. [`DirKvStore`] maps keys to JSON files in a
//! data directory; [`MemoryKvStore`] keeps them in a map for tests and
//! ephemeral runs.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::error::Result;

/// A byte store addressed by string keys.
///
/// Absent keys read as `Ok(None)`, never as an error; errors are reserved
/// for the store itself misbehaving.
pub trait KvStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn write(&mut self, key: &str, value: &[u8]) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// File-per-key store rooted at a data directory (`<root>/<key>.json`).
#[derive(Debug, Clone)]
pub struct DirKvStore {
    root: PathBuf,
}

impl DirKvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this store writes into.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KvStore for DirKvStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.key_path(key);
        debug!("Reading key file: {}", path.display());
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.key_path(key);
        debug!("Writing key file: {}", path.display());
        std::fs::write(&path, value)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        debug!("Deleting key file: {}", path.display());
        // Absent file means nothing to delete.
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, the moral equivalent of browser local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
