//! Identity store implementations.
//!
//! `FileIdentityStore` keeps the identifier in a single file, the closest
//! native equivalent of a browser's localStorage entry under a fixed key.
//! `MemoryIdentityStore` backs tests without touching the filesystem.

use std::path::PathBuf;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{IdentityError, IdentityStore};

/// File-backed identity store holding one identifier in one file.
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    /// Creates a store persisting to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Result<Option<String>, IdentityError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(IdentityError::Storage(e)),
        }
    }

    fn store(&self, id: &str) -> Result<(), IdentityError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, id)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), IdentityError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(IdentityError::Storage(e)),
        }
    }
}

/// In-memory identity store for tests.
///
/// Counts persisted writes so tests can assert the lazy-generation path
/// writes exactly once.
pub struct MemoryIdentityStore {
    value: RwLock<Option<String>>,
    writes: AtomicUsize,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self {
            value: RwLock::new(None),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `store` calls observed.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for MemoryIdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Result<Option<String>, IdentityError> {
        Ok(self.value.read().unwrap().clone())
    }

    fn store(&self, id: &str) -> Result<(), IdentityError> {
        *self.value.write().unwrap() = Some(id.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<(), IdentityError> {
        *self.value.write().unwrap() = None;
        Ok(())
    }
}
