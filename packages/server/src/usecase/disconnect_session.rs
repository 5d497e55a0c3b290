//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() メソッド
//! - 切断処理（索引の引き当て、メンバーシップレコードの削除、索引の破棄）
//!
//! ### なぜこのテストが必要か
//! - ペイロードを持たないトランスポート切断を索引で解決できることを保証
//! - join していないコネクションの切断が完全な no-op であることを確認（冪等性）
//! - 「メンバーシップ削除 → 通知 → 索引削除」の順序を呼び出し側が制御できること
//!
//! ### どのような状況を想定しているか
//! - 正常系：join 済みコネクションの切断と通知
//! - エッジケース：join していないコネクションの切断（no-op）
//! - 異常系：索引レコードが壊れている場合

use std::sync::Arc;

use crate::domain::{ClassId, ConnectionId, Membership, MessagePusher, SessionStore, keys};

use super::error::DisconnectError;

/// 切断処理のユースケース
///
/// 明示的な leave メッセージは存在せず、退室はトランスポート切断からのみ
/// 推測される。処理は3段階に分かれ、順序は UI 層が制御する：
///
/// 1. `execute` — 索引を引き、メンバーシップレコードを削除して返す
/// 2. `broadcast_user_leave` — 残りの参加者へ `user_leave` を配信
/// 3. `remove_index` — コネクション索引を破棄（ちょうど1回）
pub struct DisconnectSessionUseCase {
    /// SessionStore（共有エフェメラルストアの抽象化）
    store: Arc<dyn SessionStore>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectSessionUseCase {
    /// 新しい DisconnectSessionUseCase を作成
    pub fn new(store: Arc<dyn SessionStore>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            store,
            message_pusher,
        }
    }

    /// 切断処理を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Membership))` - 索引が存在した。メンバーシップレコードは削除済み
    /// * `Ok(None)` - コネクションは join していなかった（no-op）
    /// * `Err(DisconnectError)` - ストア障害または索引レコードの破損
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<Membership>, DisconnectError> {
        let raw = self.store.get(&keys::socket_index(connection_id)).await?;
        let Some(raw) = raw else {
            // join していない、あるいは清掃済み
            return Ok(None);
        };

        let membership = Membership::from_index_json(&raw)?;

        // 通知より先にメンバーシップを消す。これにより user_leave を観測した
        // 後のスナップショットに退室者が現れることはない
        self.store
            .delete(&keys::membership(&membership.class_id, &membership.username))
            .await?;

        Ok(Some(membership))
    }

    /// 残りの参加者へ `user_leave` をブロードキャスト
    pub async fn broadcast_user_leave(
        &self,
        class_id: &ClassId,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .broadcast_to_room(class_id, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// コネクション索引を破棄する（切断シーケンスの最終段）
    pub async fn remove_index(&self, connection_id: &ConnectionId) -> Result<(), DisconnectError> {
        self.store.delete(&keys::socket_index(connection_id)).await?;
        Ok(())
    }
}
