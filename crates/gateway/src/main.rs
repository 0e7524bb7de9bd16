use anyhow::Context as _;
use clap::Parser as _;
use mcp_gateway::cli::{Args, TransportMode};
use mcp_gateway::transport::{sse::SseTransport, stdio};
use mcp_gateway::{Dispatcher, GatewayHandler, logging};
use mcp_gateway_http_tools::config::GatewayConfig;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level, args.log_json)?;

    let config = GatewayConfig::load(&args.config)
        .with_context(|| format!("load config {}", args.config.display()))?;
    let dispatcher = Dispatcher::from_config(config).context("build tool registry")?;

    tracing::info!(
        server = dispatcher.server_name(),
        tools = dispatcher.list_tools().len(),
        transport = ?args.transport,
        "mcp-gateway starting"
    );
    tracing::debug!(
        base_url = %args.base_url,
        api_key_set = !args.api_key.is_empty(),
        "backend pass-through settings"
    );

    let handler = GatewayHandler::new(Arc::new(dispatcher));

    match args.transport {
        TransportMode::Stdio => stdio::serve_stdio(handler).await?,
        TransportMode::Sse => {
            let transport = SseTransport::new(handler, &args.message_path)?;
            let bind = args.bind_addr();
            let listener = TcpListener::bind(bind)
                .await
                .with_context(|| format!("bind {bind}"))?;
            transport.serve(listener, shutdown_signal()).await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
