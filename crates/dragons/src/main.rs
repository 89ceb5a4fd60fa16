//! Dragons CLI binary.

use anyhow::Result;
use dragons::cli::{Cli, DEFAULT_LOG_FILTER};
use tracing_subscriber::EnvFilter;

/// Main entry point for the dragons CLI.
///
/// Uses tokio's current_thread runtime; every command is a short sequence of
/// awaited network calls.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    // Example: RUST_LOG=dragons=debug dragons list --family Red
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("Starting dragons CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Dragons CLI completed successfully");
    Ok(())
}
