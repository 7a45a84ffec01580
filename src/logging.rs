//! Tracing subscriber setup for the binary.
//!
//! Logs go to stderr so stdout carries only the report.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "planet_granules=info,sidecar_metadata=info";

/// Filter used with `-v`.
pub const VERBOSE_FILTER: &str = "planet_granules=debug,sidecar_metadata=debug";

/// Select the filter: `-v` wins over `RUST_LOG`, which wins over the default.
pub fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
