//! Tracing setup for the ballotctl CLI
//!
//! Usage:
//!   ballotctl --debug ...                # Debug logging
//!   RUST_LOG=ballotctl_core=trace ...    # Fine-grained log control
//!
//! Logs go to stderr so stdout stays clean for `list`/`watch` output.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets debug level if RUST_LOG is not set)
    pub debug: bool,
    /// Suppress console logs (the TUI owns the screen)
    pub quiet: bool,
}

fn filter(config: &TracingConfig) -> EnvFilter {
    // The TUI owns the terminal; RUST_LOG must not bring logs back
    if config.quiet {
        return EnvFilter::new("off");
    }
    let default_level = if config.debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize console tracing
pub fn init(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(config))
        .with_target(config.debug) // Show targets in debug mode
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
