//! UI 層（WebSocket / HTTP 境界）
//!
//! ワイヤ DTO とドメインモデルの変換、コネクションの認証ゲート、
//! ルーティングとサーバ起動を担います。

pub mod auth;
mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
