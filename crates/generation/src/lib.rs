//! Line generation for Pickup Lines
//!
//! This crate provides the generation client: a live mode calling a
//! chat-completions service over HTTP, and a fallback mode answering from a
//! built-in set of lines after a simulated delay. Live generations are
//! remembered per category so later prompts can steer away from repeats.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod history;

pub use client::{GenerationClient, LineGenerator};
pub use config::{GenerationConfig, GenerationMode};
pub use error::{GenerationError, Result};
pub use history::{GenerationHistory, MAX_RECENT_GENERATIONS, PROMPT_EXAMPLE_COUNT};
