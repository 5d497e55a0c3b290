//! WebSocket connection handlers.
//!
//! Every connection is authenticated before the protocol upgrade, then runs
//! a receive loop and a push loop until either side closes. Malformed or
//! unverifiable events are logged and dropped without tearing down the
//! connection.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ClassId, ConnectionId, Username},
    infrastructure::dto::websocket::{ClientEvent, DrawPayload, ServerEvent, SessionPayload},
    ui::state::AppState,
};

use serde::Deserialize;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // 認証ゲート: 検証できないコネクションはアップグレード前に 401 で拒否する
    let token = match query.token {
        Some(token) => token,
        None => {
            tracing::warn!("Connection rejected: no credential presented");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let claims = match state.auth.verify(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!("Connection rejected: {}", e);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    // Assign a server-side connection ID (never taken from the client)
    let connection_id = ConnectionId::generate();

    // Create a channel for this connection to receive pushed events
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_client(connection_id.clone(), tx)
        .await;

    tracing::info!(
        "Connection '{}' authenticated (subject: '{}')",
        connection_id.as_str(),
        claims.sub
    );

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id, rx)))
}

/// Spawns a task that receives events from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound flow: events addressed to this
/// connection (via its rx channel) are written to the WebSocket one text
/// frame per event.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the event to this connection
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let connection_id_clone = connection_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive events from this connection
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    // Parse the incoming event envelope
                    let event = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!("Dropping unparseable event: {}", e);
                            continue;
                        }
                    };

                    dispatch_event(&state_clone, &connection_id_clone, event).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!(
                        "Connection '{}' requested close",
                        connection_id_clone.as_str()
                    );
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to receive events from other connections and send to this one
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    handle_disconnect(&state, &connection_id).await;
}

/// Dispatch a parsed client event to its usecase.
///
/// ブロードキャストされる JSON はこの層で組み立てる（ワイヤ表現の知識を
/// ユースケース層に持ち込まないため）。
async fn dispatch_event(state: &Arc<AppState>, connection_id: &ConnectionId, event: ClientEvent) {
    match event {
        ClientEvent::Register(payload) => {
            let (class_id, username) = match validate_session_payload(&payload) {
                Some(pair) => pair,
                None => return,
            };

            match state
                .register_user_usecase
                .execute(connection_id, &class_id, &username)
                .await
            {
                Ok(()) => {
                    // Private ack to the registering connection only
                    let ack_json = serde_json::to_string(&ServerEvent::RegisterSuccess).unwrap();
                    if let Err(e) = state.message_pusher.push_to(connection_id, &ack_json).await {
                        tracing::warn!("Failed to ack registration: {}", e);
                    }
                    tracing::info!(
                        "User '{}' registered in class '{}'",
                        username.as_str(),
                        class_id.as_str()
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to register user '{}': {}", username.as_str(), e);
                }
            }
        }
        ClientEvent::Reconnect(payload) => {
            let (class_id, username) = match validate_session_payload(&payload) {
                Some(pair) => pair,
                None => return,
            };

            let reconnect_json =
                serde_json::to_string(&ServerEvent::UserReconnect(payload)).unwrap();
            match state
                .reconnect_user_usecase
                .execute(connection_id, &class_id, &username, &reconnect_json)
                .await
            {
                Ok(()) => {
                    tracing::info!(
                        "User '{}' reconnected to class '{}'",
                        username.as_str(),
                        class_id.as_str()
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to reconnect user '{}': {}", username.as_str(), e);
                }
            }
        }
        ClientEvent::OpenDrawingCanvas(payload) => {
            let (class_id, username) = match validate_session_payload(&payload) {
                Some(pair) => pair,
                None => return,
            };

            let open_json =
                serde_json::to_string(&ServerEvent::NewUserStartDrawing(payload)).unwrap();
            if let Err(e) = state.open_canvas_usecase.execute(&class_id, &open_json).await {
                tracing::warn!(
                    "Failed to announce canvas open for '{}': {}",
                    username.as_str(),
                    e
                );
            }
        }
        ClientEvent::Draw(payload) => {
            let class_id = match ClassId::new(payload.class_id.clone()) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!("Dropping draw event: {}", e);
                    return;
                }
            };

            let stroke_json = serde_json::to_string(&payload.strokes).unwrap();
            let broadcast_json = serde_json::to_string(&ServerEvent::UpdateDrawCanvas(DrawPayload {
                class_id: payload.class_id,
                username: payload.username,
                strokes: payload.strokes,
            }))
            .unwrap();

            if let Err(e) = state
                .submit_stroke_usecase
                .execute(&class_id, &stroke_json, &broadcast_json)
                .await
            {
                tracing::warn!(
                    "Failed to submit stroke for class '{}': {}",
                    class_id.as_str(),
                    e
                );
            }
        }
    }
}

/// Tear down a closed connection: membership first, then the leave
/// broadcast, then the connection index.
async fn handle_disconnect(state: &Arc<AppState>, connection_id: &ConnectionId) {
    // Stop delivering to this connection before broadcasting the departure
    state.message_pusher.unregister_client(connection_id).await;

    match state.disconnect_session_usecase.execute(connection_id).await {
        Ok(Some(membership)) => {
            let leave_json = serde_json::to_string(&ServerEvent::UserLeave(SessionPayload {
                class_id: membership.class_id.as_str().to_string(),
                username: membership.username.as_str().to_string(),
            }))
            .unwrap();

            if let Err(e) = state
                .disconnect_session_usecase
                .broadcast_user_leave(&membership.class_id, &leave_json)
                .await
            {
                tracing::warn!("Failed to broadcast user leave: {}", e);
            }

            if let Err(e) = state
                .disconnect_session_usecase
                .remove_index(connection_id)
                .await
            {
                tracing::warn!(
                    "Failed to remove connection index '{}': {}",
                    connection_id.as_str(),
                    e
                );
            }

            tracing::info!(
                "User '{}' left class '{}' (connection '{}')",
                membership.username.as_str(),
                membership.class_id.as_str(),
                connection_id.as_str()
            );
        }
        Ok(None) => {
            // Connected but never registered; nothing to clean up
            tracing::debug!(
                "Connection '{}' closed without a session",
                connection_id.as_str()
            );
        }
        Err(e) => {
            tracing::warn!(
                "Failed to retire session for connection '{}': {}",
                connection_id.as_str(),
                e
            );
        }
    }
}

/// Convert a wire session payload into validated domain values.
///
/// Returns `None` (and logs) when either field fails validation; the caller
/// drops the event.
fn validate_session_payload(payload: &SessionPayload) -> Option<(ClassId, Username)> {
    let class_id_result = ClassId::new(payload.class_id.clone());
    let username_result = Username::new(payload.username.clone());

    match (class_id_result, username_result) {
        (Ok(class_id), Ok(username)) => Some((class_id, username)),
        (Err(e), _) => {
            tracing::warn!("Dropping event with invalid class id: {}", e);
            None
        }
        (_, Err(e)) => {
            tracing::warn!("Dropping event with invalid username: {}", e);
            None
        }
    }
}
