use anyhow::Context as _;
use mcp_gateway::GatewayHandler;
use mcp_gateway::transport::stdio::serve_duplex;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::io::{
    AsyncBufReadExt as _, AsyncWriteExt as _, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf,
};
use tokio::task::JoinHandle;

/// Client end of an in-memory stdio session.
pub struct StdioClient {
    writer: WriteHalf<DuplexStream>,
    lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
}

impl StdioClient {
    /// Serve `handler` over an in-memory pipe and return the client end plus the server task.
    pub fn start(handler: GatewayHandler) -> (Self, JoinHandle<mcp_gateway::Result<()>>) {
        let (client_side, server_side) = tokio::io::duplex(64 * 1024);
        let (server_read, server_write) = tokio::io::split(server_side);
        let server = tokio::spawn(serve_duplex(handler, server_read, server_write));

        let (client_read, client_write) = tokio::io::split(client_side);
        let client = Self {
            writer: client_write,
            lines: BufReader::new(client_read).lines(),
        };
        (client, server)
    }

    pub async fn send(&mut self, msg: &Value) -> anyhow::Result<()> {
        let mut line = serde_json::to_vec(msg)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn recv(&mut self) -> anyhow::Result<Value> {
        let line = tokio::time::timeout(Duration::from_secs(10), self.lines.next_line())
            .await
            .context("timed out waiting for a response line")??
            .context("server closed stdout")?;
        serde_json::from_str(&line).context("parse response line")
    }

    pub async fn request(&mut self, id: i64, method: &str, params: Value) -> anyhow::Result<Value> {
        self.send(&json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }))
            .await?;
        loop {
            let msg = self.recv().await?;
            if msg.get("id") == Some(&json!(id)) {
                return Ok(msg);
            }
        }
    }

    /// `initialize` + `notifications/initialized`; returns the initialize response.
    pub async fn initialize(&mut self) -> anyhow::Result<Value> {
        let init = self
            .request(
                0,
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "stdio-test", "version": "0" }
                }),
            )
            .await?;
        self.send(&json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
            .await?;
        Ok(init)
    }
}
