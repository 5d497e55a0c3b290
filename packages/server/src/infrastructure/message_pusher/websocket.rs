//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を管理
//! - クラスごとのブロードキャストグループ管理（join_room）
//! - クライアントへのメッセージ送信（push_to, broadcast_to_room）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//!
//! グループはコネクション ID の集合として保持し、コネクションは同時に
//! 1つのグループにのみ所属します（join_room は移動として振る舞う）。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ClassId, ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のコネクションの WebSocket sender
    ///
    /// Key: connection_id (String)
    /// Value: PusherChannel
    clients: Mutex<HashMap<String, PusherChannel>>,
    /// クラスごとのブロードキャストグループ
    ///
    /// Key: class_id (String)
    /// Value: グループに所属するコネクション ID の集合
    rooms: Mutex<HashMap<String, HashSet<String>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// コネクションをすべてのグループから取り除く。空になったグループは破棄する
    async fn remove_from_rooms(&self, connection_id: &ConnectionId) {
        let mut rooms = self.rooms.lock().await;
        for members in rooms.values_mut() {
            members.remove(connection_id.as_str());
        }
        rooms.retain(|_, members| !members.is_empty());
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id.as_str().to_string(), sender);
        tracing::debug!(
            "Connection '{}' registered to MessagePusher",
            connection_id.as_str()
        );
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        self.remove_from_rooms(connection_id).await;
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id.as_str());
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id.as_str()
        );
    }

    async fn join_room(&self, class_id: &ClassId, connection_id: &ConnectionId) {
        // 所属は常に1グループのみ（再 join は移動として扱う）
        self.remove_from_rooms(connection_id).await;
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(class_id.as_str().to_string())
            .or_default()
            .insert(connection_id.as_str().to_string());
        tracing::debug!(
            "Connection '{}' joined broadcast group for class '{}'",
            connection_id.as_str(),
            class_id.as_str()
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        if let Some(sender) = clients.get(connection_id.as_str()) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to connection '{}'", connection_id.as_str());
            Ok(())
        } else {
            Err(MessagePushError::ConnectionNotFound(
                connection_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast_to_room(
        &self,
        class_id: &ClassId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let members: Vec<String> = {
            let rooms = self.rooms.lock().await;
            rooms
                .get(class_id.as_str())
                .map(|members| members.iter().cloned().collect())
                .unwrap_or_default()
        };

        let clients = self.clients.lock().await;
        for member in members {
            if let Some(sender) = clients.get(&member) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!("Failed to push message to connection '{}': {}", member, e);
                } else {
                    tracing::debug!("Broadcasted message to connection '{}'", member);
                }
            } else {
                tracing::warn!("Connection '{}' not found during broadcast, skipping", member);
            }
        }

        Ok(())
    }
}
