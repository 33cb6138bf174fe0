//! Application configuration

use std::path::{Path, PathBuf};

use app_ui::SwipeConfig;
use generation::GenerationConfig;
use storage::KvConfig;

/// Directory name of the key-value store inside the data directory
pub const STORE_DIR_NAME: &str = "pickup-store.db";

/// Configuration for [`crate::PickupApp`]
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding durable state
    pub data_dir: PathBuf,
    /// Key-value store settings
    pub kv: KvConfig,
    /// Generation client settings
    pub generation: GenerationConfig,
    /// Swipe deck settings
    pub swipe: SwipeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

impl AppConfig {
    /// Create a configuration storing state under `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            kv: KvConfig::new(data_dir.join(STORE_DIR_NAME)),
            data_dir,
            generation: GenerationConfig::default(),
            swipe: SwipeConfig::default(),
        }
    }

    /// Data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Set key-value store settings
    pub fn with_kv(mut self, kv: KvConfig) -> Self {
        self.kv = kv;
        self
    }

    /// Set generation settings
    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Set swipe settings
    pub fn with_swipe(mut self, swipe: SwipeConfig) -> Self {
        self.swipe = swipe;
        self
    }
}
