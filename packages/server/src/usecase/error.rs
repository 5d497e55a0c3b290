//! UseCase 層のエラー定義
//!
//! ストア障害は進行中の操作にとって致命的で、リトライしない。
//! UI 層はこれらのエラーをログに記録し、イベントを破棄する
//! （クライアントへ明示的なエラーイベントは送らない）。

use thiserror::Error;

use crate::domain::{DomainError, StoreError};

/// 初回登録（register）のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 再接続（reconnect）のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconnectError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to broadcast user_reconnect: {0}")]
    Broadcast(String),
}

/// キャンバスオープン通知のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OpenCanvasError {
    #[error("failed to broadcast new_user_start_drawing: {0}")]
    Broadcast(String),
}

/// ストローク送信（draw）のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to broadcast update_draw_canvas: {0}")]
    Broadcast(String),
}

/// 切断処理のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisconnectError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// スナップショット読み出しのエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
