//! WebSocket upgrade handler and per-connection event loop.
//!
//! Connection lifecycle:
//! 1. Upgrade to WebSocket and assign a fresh connection id
//! 2. Register the outbound channel with the connection manager
//! 3. Forward outbound events / process inbound events until disconnect
//! 4. Run disconnect handling and deregister

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};

use crate::application::{LifecycleController, MessageRouter};
use crate::domain::{ClientEvent, ConnectionId};

use super::ConnectionManager;

/// Shared state for WebSocket handling.
#[derive(Clone)]
pub struct AppState {
    pub connections: Arc<ConnectionManager>,
    pub lifecycle: Arc<LifecycleController>,
    pub router: Arc<MessageRouter>,
}

/// Creates the axum router for the chat endpoints.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

/// Handles WebSocket upgrade requests.
///
/// Route: `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Runs for the lifetime of one connection.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let connection = ConnectionId::new();
    let mut outbound = state.connections.register(connection).await;
    tracing::debug!(%connection, "client connected");

    // Forward engine events to the socket.
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(error) => {
                    tracing::error!(%error, "failed to serialize server event");
                    continue;
                }
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    // Process inbound client events.
    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => dispatch(event, connection, &recv_state).await,
                    Err(error) => {
                        tracing::debug!(%connection, %error, "ignoring malformed client event");
                    }
                },
                Ok(Message::Close(_)) => {
                    tracing::debug!(%connection, "client sent close frame");
                    break;
                }
                // Binary frames are not part of the protocol; protocol-level
                // ping/pong is handled by axum.
                Ok(_) => {}
                Err(error) => {
                    tracing::debug!(%connection, %error, "receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.lifecycle.disconnect(connection).await;
    state.connections.unregister(connection).await;
    tracing::debug!(%connection, "client disconnected");
}

/// Routes one client event into the engine.
async fn dispatch(event: ClientEvent, connection: ConnectionId, state: &AppState) {
    match event {
        ClientEvent::CreateRoom {
            username,
            user_language,
            partner_language,
        } => {
            state
                .lifecycle
                .create_room(connection, username, user_language, partner_language)
                .await;
        }
        ClientEvent::GetRoomInfo { room_id } => {
            state.lifecycle.room_info(connection, &room_id).await;
        }
        ClientEvent::JoinRoom {
            room_id,
            username,
            language,
        } => {
            state
                .lifecycle
                .join_room(connection, &room_id, username, language)
                .await;
        }
        ClientEvent::SendMessage { room_id, message } => {
            // Translation is the dominant latency source. Spawning keeps a
            // pending provider round-trip from blocking this connection's
            // event loop; two quick messages may dispatch out of order.
            let router = Arc::clone(&state.router);
            tokio::spawn(async move {
                router.route(&room_id, connection, &message).await;
            });
        }
        ClientEvent::EndChat { room_id } => {
            state.lifecycle.end_chat(connection, &room_id).await;
        }
    }
}
