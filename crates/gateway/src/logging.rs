//! Tracing subscriber setup.
//!
//! Logs always go to stderr: in stdio mode stdout carries the MCP protocol.

use crate::error::{GatewayError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG`, when set, overrides `level`.
///
/// # Errors
///
/// Returns a startup error if `level` is not a valid filter directive or a global subscriber is
/// already installed.
pub fn init(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| GatewayError::Startup(format!("invalid log level '{level}': {e}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| GatewayError::Startup(format!("install tracing subscriber: {e}")))
}
