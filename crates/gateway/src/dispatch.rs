//! Tool call dispatch: lookup → template check → resolve → forward.
//!
//! [`Dispatcher`] is the process-wide context shared by every transport and session. It is built
//! once at startup and only read afterwards, so concurrent calls need no locking.

use mcp_gateway_http_tools::config::{GatewayConfig, ServerConfig};
use mcp_gateway_http_tools::content::ToolContent;
use mcp_gateway_http_tools::forward::HttpForwarder;
use mcp_gateway_http_tools::registry::ToolRegistry;
use mcp_gateway_http_tools::{HttpToolsError, template};
use rmcp::model::{JsonObject, Tool};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

const DEFAULT_SERVER_NAME: &str = "mcp-gateway";

/// Argument name → value. Ordered so substitution is deterministic.
pub type Arguments = BTreeMap<String, String>;

/// One `tools/call` invocation.
#[derive(Debug, Clone, Default)]
pub struct ToolCallRequest {
    pub name: String,
    pub arguments: Arguments,
}

impl ToolCallRequest {
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Build a request from the JSON `arguments` object of a `tools/call`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidArgument`] if any argument value is not a string.
    pub fn from_json(
        name: impl Into<String>,
        arguments: Option<&JsonObject>,
    ) -> Result<Self, DispatchError> {
        let name = name.into();
        let mut out = Arguments::new();
        for (key, value) in arguments.into_iter().flatten() {
            let Value::String(s) = value else {
                return Err(DispatchError::InvalidArgument {
                    tool: name,
                    arg: key.clone(),
                });
            };
            out.insert(key.clone(), s.clone());
        }
        Ok(Self::new(name, out))
    }
}

/// Per-call failures. These are returned to the calling session and never abort the process.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool {0} does not have a requestTemplate")]
    MissingTemplate(String),

    #[error("Argument '{arg}' of tool {tool} must be a string")]
    InvalidArgument { tool: String, arg: String },

    #[error("Tool {tool}: upstream returned HTTP {status} {reason}")]
    UpstreamHttp {
        tool: String,
        status: u16,
        reason: String,
    },

    #[error("Tool {tool}: upstream request failed: {message}")]
    UpstreamUnreachable { tool: String, message: String },
}

impl DispatchError {
    /// Stable machine-readable kind, used in structured protocol errors and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "unknown_tool",
            Self::MissingTemplate(_) => "missing_template",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::UpstreamHttp { .. } => "upstream_http",
            Self::UpstreamUnreachable { .. } => "upstream_unreachable",
        }
    }

    #[must_use]
    pub fn tool(&self) -> &str {
        match self {
            Self::UnknownTool(tool) | Self::MissingTemplate(tool) => tool,
            Self::InvalidArgument { tool, .. }
            | Self::UpstreamHttp { tool, .. }
            | Self::UpstreamUnreachable { tool, .. } => tool,
        }
    }

    fn upstream(tool: &str, err: HttpToolsError) -> Self {
        match err {
            HttpToolsError::UpstreamStatus { status, reason } => Self::UpstreamHttp {
                tool: tool.to_string(),
                status,
                reason,
            },
            other => Self::UpstreamUnreachable {
                tool: tool.to_string(),
                message: other.to_string(),
            },
        }
    }
}

pub struct Dispatcher {
    server_name: String,
    registry: ToolRegistry,
    server_config: ServerConfig,
    forwarder: HttpForwarder,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        server_name: impl Into<String>,
        registry: ToolRegistry,
        server_config: ServerConfig,
        forwarder: HttpForwarder,
    ) -> Self {
        Self {
            server_name: server_name.into(),
            registry,
            server_config,
            forwarder,
        }
    }

    /// Build the dispatcher from a parsed configuration file.
    ///
    /// # Errors
    ///
    /// Returns a config error if the tool definitions are invalid, or a startup error if the HTTP
    /// client cannot be built.
    pub fn from_config(config: GatewayConfig) -> crate::error::Result<Self> {
        let GatewayConfig { server, tools } = config;
        let registry = ToolRegistry::build(tools)?;
        let forwarder = HttpForwarder::new()
            .map_err(|e| crate::error::GatewayError::Startup(e.to_string()))?;

        Ok(Self::new(
            server
                .name
                .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
            registry,
            server.config,
            forwarder,
        ))
    }

    #[must_use]
    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Descriptors for `tools/list`.
    #[must_use]
    pub fn list_tools(&self) -> &[Tool] {
        self.registry.descriptors()
    }

    /// Execute one tool call.
    ///
    /// # Errors
    ///
    /// Fails at the first step that cannot proceed: unknown tool, tool without a request
    /// template, non-2xx upstream response, or upstream transport failure.
    pub async fn call_tool(
        &self,
        request: &ToolCallRequest,
    ) -> Result<Vec<ToolContent>, DispatchError> {
        let tool = self
            .registry
            .get(&request.name)
            .ok_or_else(|| DispatchError::UnknownTool(request.name.clone()))?;

        let route = tool
            .route
            .as_ref()
            .ok_or_else(|| DispatchError::MissingTemplate(request.name.clone()))?;

        let url = template::resolve(&route.url_pattern, &request.arguments, &self.server_config);

        tracing::debug!(
            tool = %request.name,
            method = %route.method,
            args = request.arguments.len(),
            "forwarding tool call"
        );

        self.forwarder
            .forward(route.method.clone(), &url)
            .await
            .map_err(|e| DispatchError::upstream(&request.name, e))
    }
}
