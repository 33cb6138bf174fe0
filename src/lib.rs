//! Pickup Lines
//!
//! Client-side core of the pickup lines app: a static catalog, user state
//! with durable persistence, a swipe deck state machine and a generation
//! client, composed behind [`PickupApp`].
//!
//! # Example
//!
//! ```rust
//! use pickup_lines::{AppConfig, PickupApp};
//!
//! let app = PickupApp::in_memory(AppConfig::default()).unwrap();
//! let first = app.catalog().items()[0].id.clone();
//!
//! app.user().add_favorite(&first);
//! assert_eq!(app.favorite_lines()[0].id(), first);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod error;
pub mod telemetry;

pub use app::{PickupApp, PickupLine};
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use telemetry::{init_test_tracing, init_tracing};
