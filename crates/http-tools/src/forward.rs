//! Outbound HTTP client for resolved tool requests.

use crate::content::ToolContent;
use crate::error::{HttpToolsError, Result};
use reqwest::{Client, Method};

/// Sent as `User-Agent` on every forwarded request.
pub const USER_AGENT: &str = concat!("mcp-gateway/", env!("CARGO_PKG_VERSION"));

/// Issues exactly one request per tool call and turns the body into text content.
///
/// Redirects follow reqwest's default policy (up to 10 hops).
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: Client,
}

impl HttpForwarder {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. TLS backend initialization).
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Send `method url` and return the response body as a single text item.
    ///
    /// # Errors
    ///
    /// - [`HttpToolsError::UpstreamStatus`] if the final response is not 2xx
    /// - [`HttpToolsError::Transport`] if the URL is invalid, the request cannot be sent, or the
    ///   body cannot be read
    pub async fn forward(&self, method: Method, url: &str) -> Result<Vec<ToolContent>> {
        let response = self.client.request(method.clone(), url).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::debug!(%method, status = status.as_u16(), "upstream returned error status");
            return Err(HttpToolsError::UpstreamStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        Ok(vec![ToolContent::text(body)])
    }
}
