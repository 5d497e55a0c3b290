//! DTO（データ転送オブジェクト）定義
//!
//! 各境界ごとの表現を定義します。ドメインモデルとの変換は UI 層で行います。
//!
//! - `websocket`: WebSocket ワイヤプロトコルのイベント
//! - `http`: スナップショット API のレスポンス

pub mod http;
pub mod websocket;
