//! メッセージ送信（通知）の trait 定義
//!
//! クラス単位のブロードキャストグループと、コネクションへのメッセージ送信を
//! 抽象化します。具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! プロセス全体のソケット一覧は持たず、クラスごとの在室グループのみを管理する。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::{ClassId, ConnectionId};

/// クライアントへのメッセージ送信用チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// メッセージ送信のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessagePushError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// MessagePusher trait
///
/// - `register_client` / `unregister_client`: コネクションの sender の登録と破棄
/// - `join_room`: コネクションをクラスのブロードキャストグループへ移動
///   （コネクションは同時に1つのグループにのみ所属する）
/// - `push_to`: 単一コネクションへのユニキャスト
/// - `broadcast_to_room`: グループ全員への配信（送信者を含む、best-effort、
///   受信者ごとに at-most-once）
#[async_trait]
pub trait MessagePusher: Send + Sync {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    async fn unregister_client(&self, connection_id: &ConnectionId);

    async fn join_room(&self, class_id: &ClassId, connection_id: &ConnectionId);

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    async fn broadcast_to_room(
        &self,
        class_id: &ClassId,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
