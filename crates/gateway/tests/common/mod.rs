#![allow(dead_code)]

pub mod sse;
pub mod stdio;

use anyhow::Context as _;
use axum::Router;
use axum::http::{StatusCode, Uri};
use axum::routing::get;
use mcp_gateway::transport::sse::{SessionTable, SseTransport};
use mcp_gateway::{Dispatcher, GatewayHandler};
use mcp_gateway_http_tools::config::GatewayConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Delay of the upstream `/slow` route.
pub const SLOW_DELAY: Duration = Duration::from_millis(500);

/// In-process server that stops when the handle is dropped.
pub struct Running {
    pub base: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Running {
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Upstream HTTP API the tools point at.
///
/// - `/echo/{*rest}` returns the request path and query
/// - `/missing` returns 404
/// - `/slow` answers after [`SLOW_DELAY`]
pub async fn start_upstream() -> anyhow::Result<Running> {
    let app = Router::new()
        .route(
            "/echo/{*rest}",
            get(|uri: Uri| async move { uri.to_string() }),
        )
        .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(SLOW_DELAY).await;
                "slow done"
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    Ok(Running {
        base: format!("http://{addr}"),
        shutdown: Some(tx),
    })
}

pub fn config_yaml(upstream_base: &str) -> String {
    format!(
        r#"
server:
  name: test-gateway
  config:
    baseUrl: {upstream_base}
    token: t-1
tools:
  - name: echo
    description: Echo the request path
    args:
      - name: id
        description: Path segment
    requestTemplate:
      method: GET
      url: "{{{{.config.baseUrl}}}}/echo/{{{{.args.id}}}}?token={{{{.config.token}}}}"
  - name: missing
    requestTemplate:
      method: GET
      url: "{{{{.config.baseUrl}}}}/missing"
  - name: slow
    requestTemplate:
      method: GET
      url: "{{{{.config.baseUrl}}}}/slow"
  - name: docs_only
    description: Listed but not callable
"#
    )
}

pub fn gateway_config(upstream_base: &str) -> anyhow::Result<GatewayConfig> {
    Ok(GatewayConfig::from_yaml_str(&config_yaml(upstream_base))?)
}

pub fn handler(upstream_base: &str) -> anyhow::Result<GatewayHandler> {
    let dispatcher = Dispatcher::from_config(gateway_config(upstream_base)?)?;
    Ok(GatewayHandler::new(Arc::new(dispatcher)))
}

/// Handler built the way the binary builds it: config file on disk → load → dispatcher.
pub fn handler_from_file(upstream_base: &str) -> anyhow::Result<GatewayHandler> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, config_yaml(upstream_base)).context("write config")?;

    let config = GatewayConfig::load(&path).context("load config")?;
    let dispatcher = Dispatcher::from_config(config)?;
    Ok(GatewayHandler::new(Arc::new(dispatcher)))
}

/// SSE gateway on an ephemeral port, plus its session table.
pub async fn start_sse_gateway(
    upstream_base: &str,
) -> anyhow::Result<(Running, Arc<SessionTable>)> {
    serve_sse(handler(upstream_base)?).await
}

pub async fn serve_sse(handler: GatewayHandler) -> anyhow::Result<(Running, Arc<SessionTable>)> {
    let transport = SseTransport::new(handler, "/messages/")?;
    let sessions = transport.sessions();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = transport
            .serve(listener, async move {
                let _ = rx.await;
            })
            .await;
    });

    Ok((
        Running {
            base: format!("http://{addr}"),
            shutdown: Some(tx),
        },
        sessions,
    ))
}
