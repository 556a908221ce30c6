//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr through `tracing`; stdout carries only the
//! statistics report.

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "synthrun=info";

/// Build the filter from `RUST_LOG`, falling back to the default.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the stderr subscriber. Later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
