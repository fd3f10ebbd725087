//! WebSocket transport: one game session per connection.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use futures_util::{SinkExt, StreamExt};
use tokio::time::{Instant, interval_at};
use wumpus_protocol::{ErrorCode, ErrorInfo, ServerMessage};

use crate::config::ServerConfig;
use crate::session::{ConnectionId, SessionRegistry};

#[derive(Clone, Debug)]
pub struct AppState {
    sessions: Arc<Mutex<SessionRegistry>>,
    next_id: Arc<AtomicU64>,
    heartbeat: Duration,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(SessionRegistry::new(config.seed))),
            next_id: Arc::new(AtomicU64::new(1)),
            heartbeat: config.heartbeat,
        }
    }

    fn next_connection(&self) -> ConnectionId {
        ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Runs `f` under the registry lock. Handlers never panic while holding
    /// it, but a poisoned lock still guards a consistent map.
    pub fn with_sessions<R>(&self, f: impl FnOnce(&mut SessionRegistry) -> R) -> R {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut sessions)
    }
}

pub fn router(config: &ServerConfig) -> Router {
    routes(&config.path, AppState::new(config))
}

/// Same as [`router`] but over a caller-owned state, so the registry can be
/// inspected while connections are served.
pub fn routes(path: &str, state: AppState) -> Router {
    Router::new()
        .route(path, get(ws_handler))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| serve_connection(socket, state))
}

/// What the connection loop does with one incoming frame.
#[derive(Debug, PartialEq)]
enum Inbound {
    Reply(ServerMessage),
    Pong,
    Ignore,
    Close,
}

fn inbound(state: &AppState, id: ConnectionId, frame: Message) -> Inbound {
    match frame {
        Message::Text(text) => {
            Inbound::Reply(state.with_sessions(|sessions| sessions.handle_text(id, text.as_str())))
        }
        Message::Binary(_) => Inbound::Reply(ServerMessage::error(ErrorInfo::new(
            ErrorCode::InvalidMessage,
            "Binary frames are not supported",
        ))),
        Message::Pong(_) => Inbound::Pong,
        // pings are answered by the socket itself
        Message::Ping(_) => Inbound::Ignore,
        Message::Close(_) => Inbound::Close,
    }
}

/// Tracks whether the last ping was answered.
#[derive(Debug, Default)]
struct Heartbeat {
    awaiting_pong: bool,
}

impl Heartbeat {
    /// Called on every interval tick; `false` means the previous ping went
    /// unanswered and the connection should be dropped.
    fn tick(&mut self) -> bool {
        if self.awaiting_pong {
            return false;
        }
        self.awaiting_pong = true;
        true
    }

    fn pong(&mut self) {
        self.awaiting_pong = false;
    }
}

/// Text of a reply frame. A reply that cannot be encoded is replaced by a
/// `GAME_ERROR`, so every request still gets an answer.
fn encode_reply<E: fmt::Display>(id: ConnectionId, encoded: Result<String, E>) -> Option<String> {
    match encoded {
        Ok(json) => Some(json),
        Err(err) => {
            log::error!("connection {id} reply could not be encoded: {err}");
            ServerMessage::error(ErrorInfo::new(
                ErrorCode::GameError,
                "Reply could not be encoded",
            ))
            .to_json()
            .ok()
        }
    }
}

async fn serve_connection(socket: WebSocket, state: AppState) {
    let id = state.next_connection();
    log::info!("connection {id} opened");

    let (mut sender, mut receiver) = socket.split();
    let mut interval = interval_at(Instant::now() + state.heartbeat, state.heartbeat);
    let mut heartbeat = Heartbeat::default();

    loop {
        let reply = tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(frame)) => match inbound(&state, id, frame) {
                    Inbound::Reply(reply) => reply,
                    Inbound::Pong => {
                        heartbeat.pong();
                        continue;
                    }
                    Inbound::Ignore => continue,
                    Inbound::Close => break,
                },
                None => break,
                Some(Err(err)) => {
                    log::warn!("connection {id} failed: {err}");
                    break;
                }
            },
            _ = interval.tick() => {
                if !heartbeat.tick() {
                    log::info!("connection {id} missed a heartbeat, closing");
                    break;
                }
                if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
                continue;
            }
        };

        let Some(json) = encode_reply(id, reply.to_json()) else {
            continue;
        };
        if sender.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }

    let had_game = state.with_sessions(|sessions| sessions.disconnect(id));
    log::info!("connection {id} closed (had game: {had_game})");
}
