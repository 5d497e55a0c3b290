//! WebSocket wire protocol DTOs.
//!
//! Every event travels as one JSON text frame with an
//! `{"event": ..., "data": ...}` envelope; payload fields are camelCase.
//!
//! Client -> server: `register`, `reconnect`, `open_drawing_canvas`, `draw`.
//! Server -> client: `register_success` (unicast ack), `user_reconnect`,
//! `user_leave`, `new_user_start_drawing`, `update_draw_canvas` (room-wide).

use serde::{Deserialize, Serialize};

/// Events sent by a client over an authenticated connection
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// First join of a class; acknowledged privately with `register_success`
    Register(SessionPayload),
    /// Re-join after a transport drop; re-announced to the whole class
    Reconnect(SessionPayload),
    /// User opened a drawing surface; informational to the whole class
    OpenDrawingCanvas(SessionPayload),
    /// A drawing action to persist and replicate
    Draw(DrawPayload),
}

/// `{classId, username}` payload shared by the presence events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub class_id: String,
    pub username: String,
}

/// Payload of `draw` and of the `update_draw_canvas` broadcast.
///
/// The broadcast echoes the client payload, so `username` is carried only
/// when the client sent it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawPayload {
    pub class_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub strokes: Vec<serde_json::Value>,
}

/// Events pushed by the server
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Private ack for a successful `register`; carries no payload
    RegisterSuccess,
    UserReconnect(SessionPayload),
    UserLeave(SessionPayload),
    NewUserStartDrawing(SessionPayload),
    UpdateDrawCanvas(DrawPayload),
}
