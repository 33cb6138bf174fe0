//! Per-category memory of recent generations
//!
//! Each category keeps a short, most-recent-first list of generated texts in
//! its own persisted record (`generation-cache:<category>`). The list only
//! steers prompts away from repeats; losing it is harmless, so read and write
//! failures are logged and otherwise ignored.

use std::sync::Arc;

use storage::{generation_cache_key, GenerationCacheRecord, PersistedRecord, RecordStore};

/// Texts remembered per category
pub const MAX_RECENT_GENERATIONS: usize = 10;

/// Recent texts quoted in a prompt
pub const PROMPT_EXAMPLE_COUNT: usize = 3;

/// Persisted recent-generation lists, one per category
#[derive(Clone)]
pub struct GenerationHistory {
    store: Arc<dyn RecordStore>,
}

impl std::fmt::Debug for GenerationHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationHistory").finish_non_exhaustive()
    }
}

impl GenerationHistory {
    /// Create a history backed by `store`
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn record(&self, category: &str) -> PersistedRecord<GenerationCacheRecord> {
        PersistedRecord::new(Arc::clone(&self.store), generation_cache_key(category))
    }

    /// Recent texts for `category`, most recent first
    pub fn recent(&self, category: &str) -> Vec<String> {
        self.record(category).load_or_default().texts
    }

    /// Texts to quote as examples in the next prompt for `category`
    pub fn prompt_examples(&self, category: &str) -> Vec<String> {
        let mut texts = self.recent(category);
        texts.truncate(PROMPT_EXAMPLE_COUNT);
        texts
    }

    /// Remember a generated text: prepend, de-duplicate, truncate
    pub fn remember(&self, category: &str, text: &str) {
        let record = self.record(category);
        let mut cache = record.load_or_default();

        cache.texts.retain(|existing| existing != text);
        cache.texts.insert(0, text.to_string());
        cache.texts.truncate(MAX_RECENT_GENERATIONS);

        if let Err(e) = record.save(&cache) {
            tracing::error!(key = %record.key(), error = %e, "Failed to persist generation cache");
        }
    }

    /// Forget every remembered text for `category`
    pub fn clear(&self, category: &str) {
        let record = self.record(category);
        if let Err(e) = record.remove() {
            tracing::error!(key = %record.key(), error = %e, "Failed to clear generation cache");
        }
    }
}
