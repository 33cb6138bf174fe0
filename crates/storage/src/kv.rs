//! Key-value store for persisted records
//!
//! This module provides the durable, namespaced key-value store backing every
//! persisted record. It is built on sled, which buffers writes in memory and
//! flushes them to disk in the background.

use sled::Db;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::persistence::RecordStore;

/// Separator between key scopes (`generation-cache:funny`)
pub const SCOPE_SEPARATOR: &str = ":";

/// Key-value store error types
#[derive(Debug, Error)]
pub enum KvError {
    /// Sled database error
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Invalid key
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Backend refused the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for key-value operations
pub type Result<T> = std::result::Result<T, KvError>;

/// Key-value store configuration
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Database directory
    pub path: PathBuf,
    /// Cache capacity in bytes
    pub cache_capacity: u64,
    /// Enable compression
    pub use_compression: bool,
    /// Flush interval in milliseconds (None for flushing only on demand)
    pub flush_every_ms: Option<u64>,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("pickup_lines_kv.db"),
            cache_capacity: 8 * 1024 * 1024, // 8MB
            use_compression: true,
            flush_every_ms: Some(500),
        }
    }
}

impl KvConfig {
    /// Create a new configuration with a custom path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Set cache capacity in bytes
    pub fn cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    /// Enable or disable compression
    pub fn use_compression(mut self, enabled: bool) -> Self {
        self.use_compression = enabled;
        self
    }

    /// Set flush interval in milliseconds
    pub fn flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.flush_every_ms = ms;
        self
    }
}

/// Build a scoped key such as `generation-cache:funny`
pub fn scoped_key(scopes: &[&str]) -> String {
    scopes.join(SCOPE_SEPARATOR)
}

/// Durable key-value store
///
/// Cloning is cheap and yields a handle onto the same database.
#[derive(Clone)]
pub struct KvStore {
    db: Arc<Db>,
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore").field("len", &self.db.len()).finish()
    }
}

impl KvStore {
    /// Open (or create) a store with configuration
    pub fn open(config: &KvConfig) -> Result<Self> {
        let db = sled::Config::new()
            .path(&config.path)
            .cache_capacity(config.cache_capacity)
            .use_compression(config.use_compression)
            .flush_every_ms(config.flush_every_ms)
            .open()?;

        tracing::debug!(path = %config.path.display(), "Opened key-value store");
        Ok(Self { db: Arc::new(db) })
    }

    /// Create a temporary store that is deleted on drop (for testing)
    pub fn in_memory() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Get raw bytes by key
    pub fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(checked(key)?.as_bytes())?.map(|bytes| bytes.to_vec()))
    }

    /// Set raw bytes by key
    pub fn set_raw(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.db.insert(checked(key)?.as_bytes(), bytes)?;
        Ok(())
    }

    /// Remove a value by key
    pub fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.db.remove(checked(key)?.as_bytes())?.is_some())
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Get the number of keys in the store
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }
}

impl RecordStore for KvStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.get_raw(key)
    }

    fn write(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.set_raw(key, bytes)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        self.remove(key)
    }
}

fn checked(key: &str) -> Result<&str> {
    if key.is_empty() {
        return Err(KvError::InvalidKey("key must not be empty".to_string()));
    }
    Ok(key)
}
