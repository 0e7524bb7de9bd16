//! Error types for `mcp-gateway-http-tools`.

use thiserror::Error;

/// Main error type for the HTTP tool layer.
#[derive(Error, Debug)]
pub enum HttpToolsError {
    /// Configuration errors (invalid tool definitions, duplicate names, bad methods).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The forwarded request completed with a non-2xx status.
    #[error("Upstream returned HTTP {status} {reason}")]
    UpstreamStatus { status: u16, reason: String },

    /// The forwarded request could not be sent or its body could not be read.
    #[error("HTTP transport error: {0}")]
    Transport(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for HTTP tool operations.
pub type Result<T> = std::result::Result<T, HttpToolsError>;

impl From<reqwest::Error> for HttpToolsError {
    fn from(value: reqwest::Error) -> Self {
        // Resolved URLs may carry config secrets (API keys in the query string).
        Self::Transport(value.without_url().to_string())
    }
}
