//! Logging utilities
//!
//! Configures the tracing subscriber. `RUST_LOG` takes precedence over the
//! verbosity flag when set.

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber; call once from main
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("layer_runner={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
