//! UseCase: 再接続処理
//!
//! 索引・メンバーシップの記帳は初回登録と同じだが、トランスポート断の後に
//! 使われるため、クラス全体（本人を含む）へ `user_reconnect` を再通知する。

use std::sync::Arc;

use crate::domain::{ClassId, ConnectionId, Membership, MessagePusher, SessionStore, Username, keys};

use super::error::ReconnectError;

/// 再接続のユースケース
pub struct ReconnectUserUseCase {
    /// SessionStore（共有エフェメラルストアの抽象化）
    store: Arc<dyn SessionStore>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ReconnectUserUseCase {
    /// 新しい ReconnectUserUseCase を作成
    pub fn new(store: Arc<dyn SessionStore>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            store,
            message_pusher,
        }
    }

    /// 再接続を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 再接続したコネクションの ID
    /// * `class_id` - 復帰するクラスの ID
    /// * `username` - 復帰するユーザー名
    /// * `json_message` - ブロードキャストする `user_reconnect` メッセージ（UI 層で生成）
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 再接続成功（通知済み）
    /// * `Err(ReconnectError)` - 再接続失敗（イベントは破棄される）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        class_id: &ClassId,
        username: &Username,
        json_message: &str,
    ) -> Result<(), ReconnectError> {
        let membership = Membership {
            class_id: class_id.clone(),
            username: username.clone(),
        };

        // 1. 記帳は register と同一（最後の書き込みが勝つ）
        self.store
            .put(&keys::socket_index(connection_id), &membership.to_index_json())
            .await?;
        self.store
            .put(&keys::membership(class_id, username), username.as_str())
            .await?;

        // 2. ブロードキャストグループへ復帰
        self.message_pusher.join_room(class_id, connection_id).await;

        // 3. クラス全体へ再接続を通知（本人を含む）
        self.message_pusher
            .broadcast_to_room(class_id, json_message)
            .await
            .map_err(|e| ReconnectError::Broadcast(e.to_string()))?;

        Ok(())
    }
}
