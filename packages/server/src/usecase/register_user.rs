//! UseCase: 初回登録処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterUserUseCase::execute() メソッド
//! - 初回登録処理（コネクション索引・メンバーシップレコードの書き込み、グループ参加）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：登録後にスナップショットへユーザーが現れる
//! - 再登録が重複ではなく上書きになること（冪等性）を保証
//! - ストア障害時に部分的な成功を返さないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ユーザーの登録
//! - エッジケース：同一コネクションからの再登録（上書き）
//! - 異常系：ストア書き込みの失敗

use std::sync::Arc;

use crate::domain::{ClassId, ConnectionId, Membership, MessagePusher, SessionStore, Username, keys};

use super::error::RegisterError;

/// 初回登録のユースケース
///
/// 登録の成功は呼び出し元にのみ通知される（他の参加者へはブロードキャストしない）。
/// ack の送信は UI 層が行う。
pub struct RegisterUserUseCase {
    /// SessionStore（共有エフェメラルストアの抽象化）
    store: Arc<dyn SessionStore>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RegisterUserUseCase {
    /// 新しい RegisterUserUseCase を作成
    pub fn new(store: Arc<dyn SessionStore>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            store,
            message_pusher,
        }
    }

    /// 初回登録を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 登録するコネクションの ID
    /// * `class_id` - 参加するクラスの ID
    /// * `username` - 登録するユーザー名
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 登録成功（呼び出し元が ack をユニキャストする）
    /// * `Err(RegisterError)` - 登録失敗（イベントは破棄される）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        class_id: &ClassId,
        username: &Username,
    ) -> Result<(), RegisterError> {
        let membership = Membership {
            class_id: class_id.clone(),
            username: username.clone(),
        };

        // 1. コネクション索引を書き込む（切断時の後片付けに必要）
        self.store
            .put(&keys::socket_index(connection_id), &membership.to_index_json())
            .await?;

        // 2. メンバーシップレコードを書き込む（再登録は上書き）
        self.store
            .put(&keys::membership(class_id, username), username.as_str())
            .await?;

        // 3. クラスのブロードキャストグループへ参加
        self.message_pusher.join_room(class_id, connection_id).await;

        Ok(())
    }
}
