//! Logging setup
//!
//! Events go to stderr so the report on stdout stays machine-readable.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "info";

/// Pick the filter: an explicit level wins over `RUST_LOG`, which wins over
/// the `info` default
pub fn env_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}

/// Install the global subscriber
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_logging(level: Option<&str>) {
    let installed = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();

    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
