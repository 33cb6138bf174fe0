//! Platform abstractions for Pickup Lines
//!
//! This crate isolates everything that depends on the host environment:
//! wall-clock time, randomness and timed callbacks. Each concern is a small
//! trait with a production implementation and a deterministic one for tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod random;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use random::{RandomSource, SeededRandom, SequenceRandom, ThreadRandom};
pub use scheduler::{ManualScheduler, Scheduler, TimerToken, TokioScheduler};
