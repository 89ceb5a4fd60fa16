//! Tracing setup for the Lambda binaries.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "dragons=info,dragons_lambda=info";

/// Install a JSON tracing subscriber.
///
/// CloudWatch timestamps every line, so events carry no time of their own.
/// Can be controlled via the `RUST_LOG` environment variable.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .json()
        .with_current_span(false)
        .with_target(false)
        .without_time()
        .init();
}
