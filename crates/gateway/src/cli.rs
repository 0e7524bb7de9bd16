//! Process configuration (flags with environment fallbacks).

use crate::transport::sse::DEFAULT_MESSAGE_PATH;
use clap::{Parser, ValueEnum};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportMode {
    /// One client over stdin/stdout.
    Stdio,
    /// Many clients over HTTP: `GET /sse` + POST to the message path.
    Sse,
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "mcp-gateway",
    version,
    about = "Expose config-declared HTTP requests as MCP tools"
)]
pub struct Args {
    /// Tool configuration file (YAML).
    #[arg(long, env = "MCP_GATEWAY_CONFIG", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Port to listen on for SSE.
    #[arg(long, default_value_t = 3001)]
    pub port: u16,

    /// Address to listen on for SSE.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    #[arg(long, value_enum, default_value_t = TransportMode::Sse)]
    pub transport: TransportMode,

    /// Path that accepts client → server messages in SSE mode.
    #[arg(long, env = "MESSAGE_PATH", default_value = DEFAULT_MESSAGE_PATH)]
    pub message_path: String,

    /// Long-lived access token for the backend. Reserved for tool templates; not used today.
    #[arg(
        long,
        env = "HOME_ASSISTANT_API_KEY",
        default_value = "",
        hide_env_values = true
    )]
    pub api_key: String,

    /// Base URL of the backend. Reserved for tool templates; not used today.
    #[arg(
        long = "baseurl",
        env = "HOME_ASSISTANT_BASE_URL",
        default_value = "http://localhost:8123"
    )]
    pub base_url: String,

    /// Log filter (`RUST_LOG` takes precedence when set).
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
