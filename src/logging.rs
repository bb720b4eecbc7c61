//! Logging configuration using tracing
//!
//! Structured progress lines go to stderr so stdout stays free for the run summary.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber
///
/// Sets up structured logging with:
/// - Filtering via RUST_LOG environment variable (defaults to "info" so per-issue
///   progress is visible in automation logs)
/// - Compact formatted output to stderr
///
/// # Example RUST_LOG values
/// - `RUST_LOG=debug` - Show state transitions as well
/// - `RUST_LOG=gh_jira_bridge=trace,reqwest=warn` - Different levels per crate
///
/// # Errors
/// Returns an error if the subscriber has already been initialized
pub fn init() -> crate::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| crate::BridgeError::Other(format!("Failed to initialize tracing: {}", e)))?;

    Ok(())
}
