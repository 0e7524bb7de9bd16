//! Local duplex transport: one MCP session over a byte pipe for the life of the process.

use crate::error::{GatewayError, Result};
use crate::handler::GatewayHandler;
use rmcp::ServiceExt as _;
use tokio::io::{AsyncRead, AsyncWrite};

/// Serve a single client over the process's stdin/stdout.
///
/// # Errors
///
/// Returns a transport error if the session cannot be initialized or the service task fails.
pub async fn serve_stdio(handler: GatewayHandler) -> Result<()> {
    serve_duplex(handler, tokio::io::stdin(), tokio::io::stdout()).await
}

/// Serve a single client over any reader/writer pair (newline-delimited JSON-RPC).
///
/// Returns once the peer closes the pipe.
///
/// # Errors
///
/// Returns a transport error if the session cannot be initialized or the service task fails.
pub async fn serve_duplex<R, W>(handler: GatewayHandler, reader: R, writer: W) -> Result<()>
where
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    let service = handler
        .serve((reader, writer))
        .await
        .map_err(|e| GatewayError::Transport(format!("initialize: {e}")))?;
    tracing::info!("stdio session initialized");

    let reason = service
        .waiting()
        .await
        .map_err(|e| GatewayError::Transport(e.to_string()))?;
    tracing::info!(?reason, "stdio session ended");
    Ok(())
}
