//! Error types for the gateway.

use mcp_gateway_http_tools::HttpToolsError;
use thiserror::Error;

/// Startup and transport-level errors.
///
/// Per-call failures are [`crate::dispatch::DispatchError`] and never surface here.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors (config file, tool definitions, process flags)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Startup errors (listener bind, HTTP client construction)
    #[error("Startup error: {0}")]
    Startup(String),

    /// Transport errors (stdio pipe or HTTP server failure)
    #[error("Transport error: {0}")]
    Transport(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<HttpToolsError> for GatewayError {
    fn from(value: HttpToolsError) -> Self {
        Self::Config(value.to_string())
    }
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
