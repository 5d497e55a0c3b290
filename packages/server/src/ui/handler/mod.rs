//! Request handlers for the WebSocket and HTTP endpoints.

pub mod http;
pub mod websocket;

pub use http::{get_class_strokes, get_class_users, health_check};
pub use websocket::websocket_handler;
