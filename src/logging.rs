//! Logging configuration using tracing
//!
//! Diagnostics go to stderr so stdout carries only the log itself.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a given `-v` count
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initialize the tracing subscriber
///
/// Filtering comes from `RUST_LOG` when set, otherwise from the `-v` count
/// (`warn` by default).
///
/// # Example RUST_LOG values
/// - `RUST_LOG=info` - Show fetch outcomes and run totals
/// - `RUST_LOG=ggl=debug` - Per-repository open/resolve/walk details
///
/// # Errors
/// Returns an error if the subscriber has already been initialized
pub fn init(verbosity: u8) -> crate::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| crate::GglError::Other(format!("Failed to initialize tracing: {}", e)))?;

    Ok(())
}
