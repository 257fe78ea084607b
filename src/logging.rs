//! Log output setup
//!
//! Everything goes to stderr so that reports printed on stdout can be piped.

use std::io;

use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber.
///
/// The level comes from `RUST_LOG`, e.g. `RUST_LOG=rodcut=debug` to see model sizes.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

/// Subscriber for tests: verbose, captured by the test harness, safe to call repeatedly.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
