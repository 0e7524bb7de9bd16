//! HTTP+SSE transport.
//!
//! Each client opens `GET /sse` and keeps it open; that event stream carries every server → client
//! message for the session. Client → server messages are POSTed to the message path with the
//! `session_id` announced in the stream's first (`endpoint`) event, and are routed to that
//! session's rmcp service only.
//!
//! Per session:
//! - one bounded channel client → service (sender kept in the [`SessionTable`])
//! - one bounded channel service → event stream
//! - one spawned rmcp service task serving a clone of [`GatewayHandler`]
//!
//! Dropping the event stream (client disconnect) unregisters the session, which ends the service
//! loop. Calls already in flight may still finish; their results go nowhere.

use crate::error::{GatewayError, Result};
use crate::handler::GatewayHandler;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use futures::channel::mpsc;
use futures::{SinkExt as _, Stream, StreamExt as _};
use parking_lot::RwLock;
use rmcp::ServiceExt as _;
use rmcp::model::{ClientJsonRpcMessage, ServerJsonRpcMessage};
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

pub const SSE_PATH: &str = "/sse";
pub const HEALTH_PATH: &str = "/health";
pub const DEFAULT_MESSAGE_PATH: &str = "/messages/";

const SESSION_CHANNEL_CAPACITY: usize = 64;

/// Live sessions: session id → sender into that session's rmcp service.
#[derive(Debug, Default)]
pub struct SessionTable {
    inner: RwLock<HashMap<Uuid, mpsc::Sender<ClientJsonRpcMessage>>>,
}

impl SessionTable {
    fn insert(&self, id: Uuid, tx: mpsc::Sender<ClientJsonRpcMessage>) {
        self.inner.write().insert(id, tx);
    }

    fn get(&self, id: &Uuid) -> Option<mpsc::Sender<ClientJsonRpcMessage>> {
        self.inner.read().get(id).cloned()
    }

    fn remove(&self, id: &Uuid) -> bool {
        self.inner.write().remove(id).is_some()
    }

    /// Drop every session sender, which ends all service loops.
    pub fn close_all(&self) {
        let drained: Vec<Uuid> = self.inner.write().drain().map(|(id, _)| id).collect();
        if !drained.is_empty() {
            tracing::info!(sessions = drained.len(), "closed all SSE sessions");
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

/// Removes the session from the table when the event stream is dropped.
struct SessionGuard {
    id: Uuid,
    sessions: Arc<SessionTable>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.sessions.remove(&self.id) {
            tracing::info!(mcp_session_id = %self.id.simple(), "SSE stream closed");
        }
    }
}

#[derive(Clone)]
struct SseState {
    handler: GatewayHandler,
    sessions: Arc<SessionTable>,
    message_path: Arc<str>,
}

pub struct SseTransport {
    state: SseState,
}

impl SseTransport {
    /// # Errors
    ///
    /// Returns a config error if `message_path` is not usable as a route.
    pub fn new(handler: GatewayHandler, message_path: &str) -> Result<Self> {
        let message_path = normalize_message_path(message_path)?;
        Ok(Self {
            state: SseState {
                handler,
                sessions: Arc::new(SessionTable::default()),
                message_path: Arc::from(message_path),
            },
        })
    }

    #[must_use]
    pub fn message_path(&self) -> &str {
        &self.state.message_path
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<SessionTable> {
        Arc::clone(&self.state.sessions)
    }

    #[must_use]
    pub fn router(&self) -> Router {
        let path = self.state.message_path.to_string();
        let mut router = Router::new()
            .route(SSE_PATH, get(open_session))
            .route(HEALTH_PATH, get(health))
            .route(&path, post(post_message));

        // Accept `/messages` as well as `/messages/`.
        if let Some(bare) = path.strip_suffix('/')
            && !bare.is_empty()
        {
            router = router.route(bare, post(post_message));
        }

        router.with_state(self.state.clone())
    }

    /// Serve until `shutdown` resolves, then close every session so open event streams end.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP server fails.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let sessions = self.sessions();
        let local = listener.local_addr()?;
        tracing::info!(
            addr = %local,
            sse = SSE_PATH,
            messages = %self.state.message_path,
            "SSE transport listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                shutdown.await;
                sessions.close_all();
            })
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))
    }
}

/// Normalize the configured message path into an axum route.
///
/// # Errors
///
/// Returns a config error if the path collides with the SSE or health routes, is the root, or
/// contains characters that axum would treat as route syntax.
pub fn normalize_message_path(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_MESSAGE_PATH.to_string());
    }

    let path = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };

    if path.contains(['?', '#', '{', '}', '*', ':']) {
        return Err(GatewayError::Config(format!(
            "Invalid message path '{path}': must be a plain path"
        )));
    }

    let bare = path.trim_end_matches('/');
    if bare.is_empty() || bare == SSE_PATH || bare == HEALTH_PATH {
        return Err(GatewayError::Config(format!(
            "Invalid message path '{path}': conflicts with a built-in route"
        )));
    }

    Ok(path)
}

async fn health() -> &'static str {
    "ok"
}

async fn open_session(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let id = Uuid::new_v4();
    let (to_client_tx, to_client_rx) =
        mpsc::channel::<ServerJsonRpcMessage>(SESSION_CHANNEL_CAPACITY);
    let (from_client_tx, from_client_rx) =
        mpsc::channel::<ClientJsonRpcMessage>(SESSION_CHANNEL_CAPACITY);

    state.sessions.insert(id, from_client_tx);
    tracing::info!(mcp_session_id = %id.simple(), "SSE session opened");

    tokio::spawn(run_session(
        id,
        state.handler.clone(),
        to_client_tx,
        from_client_rx,
        Arc::clone(&state.sessions),
    ));

    let endpoint = format!("{}?session_id={}", state.message_path, id.simple());
    let guard = SessionGuard {
        id,
        sessions: Arc::clone(&state.sessions),
    };

    let messages = to_client_rx.filter_map(move |msg| {
        // Owning the guard ties session registration to the stream's lifetime.
        let _session = &guard;
        futures::future::ready(message_event(id, &msg))
    });

    let stream = futures::stream::once(futures::future::ready(
        Event::default().event("endpoint").data(endpoint),
    ))
    .chain(messages)
    .map(Ok);

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn message_event(id: Uuid, msg: &ServerJsonRpcMessage) -> Option<Event> {
    match serde_json::to_string(msg) {
        Ok(data) => Some(Event::default().event("message").data(data)),
        Err(e) => {
            tracing::warn!(mcp_session_id = %id.simple(), error = %e, "failed to encode message");
            None
        }
    }
}

async fn run_session(
    id: Uuid,
    handler: GatewayHandler,
    to_client: mpsc::Sender<ServerJsonRpcMessage>,
    from_client: mpsc::Receiver<ClientJsonRpcMessage>,
    sessions: Arc<SessionTable>,
) {
    match handler.serve((to_client, from_client)).await {
        Ok(service) => match service.waiting().await {
            Ok(reason) => {
                tracing::info!(mcp_session_id = %id.simple(), ?reason, "MCP session ended");
            }
            Err(e) => {
                tracing::warn!(mcp_session_id = %id.simple(), error = %e, "MCP session task failed");
            }
        },
        Err(e) => {
            tracing::warn!(
                mcp_session_id = %id.simple(),
                error = %e,
                "MCP session failed to initialize"
            );
        }
    }
    sessions.remove(&id);
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    #[serde(default)]
    session_id: Option<String>,
}

async fn post_message(
    State(state): State<SseState>,
    Query(query): Query<SessionQuery>,
    body: Bytes,
) -> Response {
    let Some(raw_id) = query.session_id else {
        return (StatusCode::BAD_REQUEST, "session_id is required").into_response();
    };
    let Ok(id) = Uuid::parse_str(&raw_id) else {
        return (StatusCode::BAD_REQUEST, "Invalid session ID").into_response();
    };
    let Some(mut tx) = state.sessions.get(&id) else {
        return (StatusCode::NOT_FOUND, "Could not find session").into_response();
    };

    let message: ClientJsonRpcMessage = match serde_json::from_slice(&body) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(mcp_session_id = %id.simple(), error = %e, "rejecting malformed message");
            return (StatusCode::BAD_REQUEST, "Could not parse message").into_response();
        }
    };

    if tx.send(message).await.is_err() {
        state.sessions.remove(&id);
        return (StatusCode::GONE, "Session closed").into_response();
    }

    (StatusCode::ACCEPTED, "Accepted").into_response()
}
