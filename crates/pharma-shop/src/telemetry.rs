//! # Telemetry
//!
//! Tracing subscriber setup for binaries and tests embedding the storefront.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// ## Filtering
/// Honors `RUST_LOG` when set, defaults to `info`. Safe to call more than
/// once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
