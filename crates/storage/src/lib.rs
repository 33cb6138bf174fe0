//! Storage layer for Pickup Lines
//!
//! This crate provides the namespaced key-value store that backs every
//! persisted record, the versioned record envelope, and the schemas of the
//! records themselves.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app_state;
pub mod kv;
pub mod persistence;

pub use app_state::{
    generation_cache_key, GeneratedLine, GenerationCacheRecord, OnboardingRecord, PickupRecord,
    GENERATION_CACHE_SCOPE, ONBOARDING_STORE_KEY, PICKUP_STORE_KEY,
};
pub use kv::{KvConfig, KvError, KvStore};
pub use persistence::{
    MemoryRecordStore, PersistedRecord, PersistenceError, RecordStore, RECORD_VERSION,
};
