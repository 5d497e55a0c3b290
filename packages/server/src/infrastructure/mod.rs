//! Infrastructure 層
//!
//! ドメイン層が定義する trait（`SessionStore`, `MessagePusher`）の具体的な実装と、
//! ワイヤ/HTTP 境界の DTO を提供します。

pub mod dto;
pub mod message_pusher;
pub mod store;
