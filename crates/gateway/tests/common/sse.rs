use anyhow::Context as _;
use futures::StreamExt as _;
use futures::stream::BoxStream;
use serde_json::{Value, json};
use std::time::Duration;

const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// One MCP client session over `GET /sse` + POST to the announced endpoint.
pub struct SseSession {
    client: reqwest::Client,
    endpoint: String,
    events: BoxStream<'static, anyhow::Result<sse_stream::Sse>>,
}

impl SseSession {
    /// Open the event stream and read the `endpoint` event, without initializing.
    pub async fn open_raw(base: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::new();
        let resp = client
            .get(format!("{base}/sse"))
            .send()
            .await
            .context("GET /sse")?
            .error_for_status()
            .context("GET /sse status")?;

        let mut events = sse_stream::SseStream::from_byte_stream(resp.bytes_stream())
            .map(|evt| evt.map_err(|e| anyhow::anyhow!("read SSE event: {e}")))
            .boxed();

        let endpoint = loop {
            let evt = tokio::time::timeout(READ_TIMEOUT, events.next())
                .await
                .context("timed out waiting for endpoint event")?
                .context("event stream ended before endpoint event")??;
            if evt.event.as_deref() == Some("endpoint") {
                break evt.data.unwrap_or_default();
            }
        };

        Ok(Self {
            client,
            endpoint: format!("{base}{endpoint}"),
            events,
        })
    }

    /// Open the event stream and complete the MCP handshake.
    pub async fn open(base: &str) -> anyhow::Result<Self> {
        let mut session = Self::open_raw(base).await?;
        let init = session
            .request(
                0,
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "mcp-gateway-integration-tests", "version": "0" }
                }),
            )
            .await
            .context("initialize")?;
        anyhow::ensure!(init.get("result").is_some(), "initialize failed: {init}");

        session
            .notify("notifications/initialized")
            .await
            .context("notifications/initialized")?;
        Ok(session)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn post(&self, body: &Value) -> anyhow::Result<reqwest::StatusCode> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(body)
            .send()
            .await
            .context("POST message")?;
        Ok(resp.status())
    }

    pub async fn notify(&self, method: &str) -> anyhow::Result<()> {
        let status = self
            .post(&json!({ "jsonrpc": "2.0", "method": method }))
            .await?;
        anyhow::ensure!(status == reqwest::StatusCode::ACCEPTED, "unexpected status {status}");
        Ok(())
    }

    /// POST a request and wait for the response with the same id on the event stream.
    pub async fn request(&mut self, id: i64, method: &str, params: Value) -> anyhow::Result<Value> {
        let status = self
            .post(&json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }))
            .await?;
        anyhow::ensure!(status == reqwest::StatusCode::ACCEPTED, "unexpected status {status}");

        loop {
            let msg = self.next_message().await?;
            if msg.get("id") == Some(&json!(id)) {
                return Ok(msg);
            }
        }
    }

    pub async fn call_tool(&mut self, id: i64, name: &str, arguments: Value) -> anyhow::Result<Value> {
        self.request(id, "tools/call", json!({ "name": name, "arguments": arguments }))
            .await
    }

    /// Next `message` event parsed as JSON.
    pub async fn next_message(&mut self) -> anyhow::Result<Value> {
        loop {
            let evt = tokio::time::timeout(READ_TIMEOUT, self.events.next())
                .await
                .context("timed out waiting for message event")?
                .context("event stream ended")??;
            if evt.event.as_deref() != Some("message") {
                continue;
            }
            let payload = evt.data.unwrap_or_default();
            if payload.trim().is_empty() {
                continue;
            }
            return serde_json::from_str(&payload).context("parse SSE data as JSON");
        }
    }

    /// Wait for the server to end the event stream.
    pub async fn closed(mut self) -> anyhow::Result<()> {
        loop {
            match tokio::time::timeout(READ_TIMEOUT, self.events.next())
                .await
                .context("timed out waiting for stream end")?
            {
                None | Some(Err(_)) => return Ok(()),
                Some(Ok(_)) => {}
            }
        }
    }
}

/// Text of the first content item of a successful `tools/call` response.
pub fn first_text(response: &Value) -> Option<&str> {
    response
        .pointer("/result/content/0/text")
        .and_then(Value::as_str)
}
