// Key-value stores backing the ledger snapshot
//
// Values are UTF-8 text (JSON or decimal strings) under flat string keys,
// mirroring the browser storage layout the UI used.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// Errors from storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Value under {key} is not valid UTF-8")]
    InvalidUtf8 { key: String },

    #[error("Flush failed: {0}")]
    FlushFailed(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

/// Durable textual store
pub trait KvStore: Send + Sync {
    /// Read a value
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write every entry, all or nothing
    fn put_batch(&self, entries: &[(&str, String)]) -> Result<(), StoreError>;

    /// Remove keys, ignoring ones that are absent
    fn delete_keys(&self, keys: &[&str]) -> Result<(), StoreError>;

    /// Make prior writes durable
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ============================================================================
// SLED STORE
// ============================================================================

/// Persistent store on sled
///
/// Batches are applied atomically, so a crash never leaves half a snapshot.
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        Ok(Self { db })
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Number of keys in the database
    pub fn len(&self) -> usize {
        self.db.len()
    }
}

impl KvStore for SledStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| StoreError::InvalidUtf8 {
                    key: key.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn put_batch(&self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        let mut batch = sled::Batch::default();
        for (key, value) in entries {
            batch.insert(key.as_bytes(), value.as_bytes());
        }
        self.db.apply_batch(batch)?;
        Ok(())
    }

    fn delete_keys(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut batch = sled::Batch::default();
        for key in keys {
            batch.remove(key.as_bytes());
        }
        self.db.apply_batch(batch)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        Ok(())
    }
}

// ============================================================================
// MEMORY STORE
// ============================================================================

/// Volatile store for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // a poisoned map is still a consistent map
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl KvStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn put_batch(&self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        let mut map = self.lock();
        for (key, value) in entries {
            map.insert(key.to_string(), value.clone());
        }
        Ok(())
    }

    fn delete_keys(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut map = self.lock();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

impl<T: KvStore + ?Sized> KvStore for std::sync::Arc<T> {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_raw(key)
    }

    fn put_batch(&self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        (**self).put_batch(entries)
    }

    fn delete_keys(&self, keys: &[&str]) -> Result<(), StoreError> {
        (**self).delete_keys(keys)
    }

    fn flush(&self) -> Result<(), StoreError> {
        (**self).flush()
    }
}
