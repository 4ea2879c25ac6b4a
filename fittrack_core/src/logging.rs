//! Tracing setup for the `fittrack` binary.
//!
//! Everything goes to stderr; stdout is reserved for command output,
//! including `--json`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level used when neither `RUST_LOG` nor `--verbose` says otherwise
pub const DEFAULT_LEVEL: &str = "warn";

const VERBOSE_LEVEL: &str = "info";

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `verbose`.
pub fn init(verbose: bool) {
    init_with_level(fallback_level(verbose))
}

fn fallback_level(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_LEVEL
    } else {
        DEFAULT_LEVEL
    }
}

/// Install the global subscriber with an explicit fallback level
pub fn init_with_level(fallback: &str) {
    tracing_subscriber::registry()
        .with(filter_or(fallback))
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn filter_or(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
