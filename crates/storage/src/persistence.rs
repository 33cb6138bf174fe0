//! Record persistence
//!
//! This module provides the byte-level [`RecordStore`] seam, the versioned
//! and checksummed envelope every record is written in, and
//! [`PersistedRecord`], a typed handle onto one key that degrades to defaults
//! when the stored bytes are missing or corrupt.

use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

use crate::kv::{self, KvError};

/// Current envelope schema version
pub const RECORD_VERSION: u32 = 1;

/// Persistence error types
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Underlying store failed
    #[error("Store error: {0}")]
    Store(#[from] KvError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Corruption detected
    #[error("Corruption detected: {0}")]
    Corruption(String),

    /// Record written by a newer schema
    #[error("Version mismatch: expected at most {expected}, found {found}")]
    VersionMismatch {
        /// Highest version this build understands
        expected: u32,
        /// Version found in the record
        found: u32,
    },
}

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Byte-level durable storage for named records
pub trait RecordStore: Send + Sync {
    /// Read the bytes stored under `key`
    fn read(&self, key: &str) -> kv::Result<Option<Vec<u8>>>;

    /// Replace the bytes stored under `key`
    fn write(&self, key: &str, bytes: Vec<u8>) -> kv::Result<()>;

    /// Remove `key`, returning whether it existed
    fn delete(&self, key: &str) -> kv::Result<bool>;
}

/// Non-durable record store held in memory
///
/// Useful for previews and tests; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl RecordStore for MemoryRecordStore {
    fn read(&self, key: &str) -> kv::Result<Option<Vec<u8>>> {
        Ok(self.records.read().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: Vec<u8>) -> kv::Result<()> {
        self.records.write().insert(key.to_string(), bytes);
        Ok(())
    }

    fn delete(&self, key: &str) -> kv::Result<bool> {
        Ok(self.records.write().remove(key).is_some())
    }
}

// =============================================================================
// Envelope
// =============================================================================

/// Versioned record container
///
/// The payload is kept as the exact JSON text that was checksummed, so
/// verification never depends on map ordering during re-serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Envelope {
    /// Schema version
    version: u32,
    /// MD5 of `data`
    checksum: String,
    /// Serialized record
    data: String,
}

fn checksum(data: &str) -> String {
    format!("{:x}", md5::compute(data.as_bytes()))
}

/// Serialize a record into its envelope bytes
pub fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    let data = serde_json::to_string(record)?;
    let envelope = Envelope { version: RECORD_VERSION, checksum: checksum(&data), data };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Verify and deserialize envelope bytes
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;

    if envelope.version > RECORD_VERSION {
        return Err(PersistenceError::VersionMismatch {
            expected: RECORD_VERSION,
            found: envelope.version,
        });
    }

    let computed = checksum(&envelope.data);
    if computed != envelope.checksum {
        return Err(PersistenceError::Corruption(format!(
            "Checksum mismatch: expected {}, got {}",
            envelope.checksum, computed
        )));
    }

    Ok(serde_json::from_str(&envelope.data)?)
}

// =============================================================================
// Typed record handle
// =============================================================================

/// Typed handle onto one persisted record
pub struct PersistedRecord<T> {
    store: Arc<dyn RecordStore>,
    key: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for PersistedRecord<T> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), key: self.key.clone(), _record: PhantomData }
    }
}

impl<T> std::fmt::Debug for PersistedRecord<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedRecord").field("key", &self.key).finish()
    }
}

impl<T> PersistedRecord<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Create a handle for `key` in `store`
    pub fn new(store: Arc<dyn RecordStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into(), _record: PhantomData }
    }

    /// Key this record is stored under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the record, `None` if it was never written
    pub fn load(&self) -> Result<Option<T>> {
        match self.store.read(&self.key)? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Load the record, falling back to defaults on absence or corruption
    pub fn load_or_default(&self) -> T {
        match self.load() {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::debug!(key = %self.key, "No persisted record, starting empty");
                T::default()
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Discarding unreadable record");
                T::default()
            }
        }
    }

    /// Persist the full record
    pub fn save(&self, record: &T) -> Result<()> {
        let bytes = encode(record)?;
        self.store.write(&self.key, bytes)?;
        Ok(())
    }

    /// Remove the record from storage
    pub fn remove(&self) -> Result<bool> {
        Ok(self.store.delete(&self.key)?)
    }
}
