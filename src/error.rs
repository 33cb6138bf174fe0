//! Application errors

use thiserror::Error;

use app_core::CatalogError;
use app_ui::SwipeError;
use generation::GenerationError;
use storage::KvError;

/// Errors surfaced by [`crate::PickupApp`]
#[derive(Debug, Error)]
pub enum AppError {
    /// Durable storage could not be opened or flushed
    #[error("Storage error: {0}")]
    Storage(#[from] KvError),

    /// Catalog failed to load
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Line generation failed
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// A swipe deck could not be built
    #[error("Swipe error: {0}")]
    Swipe(#[from] SwipeError),
}

/// Result type for application operations
pub type Result<T> = std::result::Result<T, AppError>;
