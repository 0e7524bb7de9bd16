//! MCP gateway: serve config-declared HTTP tools over stdio or HTTP+SSE.
//!
//! - [`dispatch`]: tool call execution against the registry and the HTTP forwarder
//! - [`handler`]: the rmcp `ServerHandler` shared by all transports
//! - [`transport`]: stdio and SSE bindings

pub mod cli;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod logging;
pub mod transport;

pub use dispatch::{DispatchError, Dispatcher, ToolCallRequest};
pub use error::{GatewayError, Result};
pub use handler::GatewayHandler;
