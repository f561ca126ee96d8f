//! `schoolbill-observability` — process-wide logging setup.
//!
//! The reconciliation crates emit `tracing` events; whichever binary embeds
//! them calls [`init`] once at startup. Filtering is configured through the
//! `RUST_LOG` environment variable.

use tracing_subscriber::EnvFilter;

/// Initialize JSON logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops), which keeps
/// test binaries that share a process from fighting over the subscriber.
pub fn init() {
    init_with_default("info");
}

/// Initialize logging with an explicit fallback filter for when `RUST_LOG`
/// is unset.
pub fn init_with_default(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
