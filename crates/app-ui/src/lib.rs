//! User interface logic for Pickup Lines
//!
//! This crate provides the interaction layer below the screens: the swipe
//! deck state machine and the pure drag transform it drives. Rendering is
//! left to the host; everything here is deterministic and timer-driven.
//!
//! # Modules
//!
//! - [`swipe`] - Swipe deck controller, configuration and view recording
//! - [`transform`] - Rotation, scale and opacity derived from a drag offset
//!
//! # Example
//!
//! ```rust
//! use app_ui::transform::{CardTransform, Offset, MAX_ROTATION_DEG};
//!
//! let transform = CardTransform::for_drag(Offset::new(195.0, 0.0), 390.0, MAX_ROTATION_DEG);
//! assert_eq!(transform.rotation_deg, 15.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod swipe;
pub mod transform;

pub use swipe::{
    SwipeConfig, SwipeController, SwipeDirection, SwipeError, SwipeItem, SwipePhase,
    ViewRecorder,
};
pub use transform::{CardTransform, Offset};
