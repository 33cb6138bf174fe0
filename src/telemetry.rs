//! Tracing initialisation
//!
//! The core crates only emit `tracing` events; installing a subscriber is
//! up to the host. These helpers install a formatted subscriber filtered by
//! `RUST_LOG`, defaulting to `info`.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber
///
/// Returns false when a subscriber was already installed; the existing one
/// is kept.
pub fn init_tracing() -> bool {
    fmt().with_env_filter(env_filter()).with_target(false).try_init().is_ok()
}

/// Install a subscriber that writes through the test harness
///
/// Safe to call from every test.
pub fn init_test_tracing() {
    let _ = fmt().with_env_filter(env_filter()).with_test_writer().try_init();
}
