//! Bootstrap utilities for the ringlet binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with the RINGLET_LOG environment variable.
///
/// Defaults to "warn" if RINGLET_LOG is not set. Logs go to stderr so that
/// stdout carries only prompts and records.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("RINGLET_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
