//! rmcp `ServerHandler` over the shared [`Dispatcher`].
//!
//! Every transport serves a clone of [`GatewayHandler`]; this is the only place where MCP requests
//! are translated into dispatch calls.

use crate::dispatch::{DispatchError, Dispatcher, ToolCallRequest};
use rmcp::ServerHandler;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ErrorCode, ErrorData, Implementation,
    ListToolsResult, PaginatedRequestParams, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct GatewayHandler {
    dispatcher: Arc<Dispatcher>,
}

impl GatewayHandler {
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl ServerHandler for GatewayHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.dispatcher.server_name().to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(
            self.dispatcher.list_tools().to_vec(),
        ))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let call =
            ToolCallRequest::from_json(request.name.to_string(), request.arguments.as_ref())
                .map_err(to_error_data)?;

        match self.dispatcher.call_tool(&call).await {
            Ok(content) => Ok(CallToolResult::success(
                content.into_iter().map(Content::from).collect(),
            )),
            Err(e) => {
                tracing::warn!(tool = %call.name, kind = e.kind(), error = %e, "tool call failed");
                Err(to_error_data(e))
            }
        }
    }
}

/// Map a dispatch failure onto a JSON-RPC error with a structured `data` payload.
#[must_use]
pub fn to_error_data(err: DispatchError) -> ErrorData {
    let code = match &err {
        DispatchError::UnknownTool(_) | DispatchError::InvalidArgument { .. } => {
            ErrorCode::INVALID_PARAMS
        }
        DispatchError::MissingTemplate(_) => ErrorCode::INVALID_REQUEST,
        DispatchError::UpstreamHttp { .. } | DispatchError::UpstreamUnreachable { .. } => {
            ErrorCode::INTERNAL_ERROR
        }
    };

    let mut data = json!({ "kind": err.kind(), "tool": err.tool() });
    if let DispatchError::UpstreamHttp { status, .. } = &err {
        data["status"] = json!(status);
    }

    ErrorData::new(code, err.to_string(), Some(data))
}
