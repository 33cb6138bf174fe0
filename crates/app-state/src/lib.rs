//! Application state management for Pickup Lines
//!
//! This crate provides the user-owned state containers: the user state store
//! (favorites, viewing history, ratings, saved generated lines) and the
//! onboarding flag. Both persist through the storage crate and fall back to
//! empty defaults when nothing usable is stored.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod onboarding;
pub mod pickup;

pub use onboarding::OnboardingStore;
pub use pickup::{
    is_generated_id, StoreEvent, UserStateStore, UserStats, MAX_RECENTLY_VIEWED,
};
