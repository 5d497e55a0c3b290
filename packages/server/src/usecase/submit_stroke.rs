//! UseCase: ストローク送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitStrokeUseCase::execute() メソッド
//! - ストロークの永続化（一意なサフィックス）とブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - ストロークが集合として蓄積され、互いに上書きされないことを保証（順序なし）
//! - 永続化とブロードキャストの両方が行われることを確認
//! - ストア障害時にブロードキャストが抑止されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：1件のストローク送信
//! - エッジケース：同一内容の連続送信（別レコードになる）
//! - 異常系：ストア書き込みの失敗

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{ClassId, MessagePusher, SessionStore, keys};

use super::error::DrawError;

/// ストローク送信のユースケース
///
/// ストロークはクラスの接頭辞の下に uuid サフィックス付きで保存される。
/// サフィックスは一意性のためだけに使われ、ストローク間の順序は導出されない。
pub struct SubmitStrokeUseCase {
    /// SessionStore（共有エフェメラルストアの抽象化）
    store: Arc<dyn SessionStore>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SubmitStrokeUseCase {
    /// 新しい SubmitStrokeUseCase を作成
    pub fn new(store: Arc<dyn SessionStore>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            store,
            message_pusher,
        }
    }

    /// ストローク送信を実行
    ///
    /// # Arguments
    ///
    /// * `class_id` - 送信先クラスの ID
    /// * `stroke_json` - 保存するストローク配列の JSON（UI 層で直列化）
    /// * `json_message` - ブロードキャストする `update_draw_canvas` メッセージ（UI 層で生成）
    pub async fn execute(
        &self,
        class_id: &ClassId,
        stroke_json: &str,
        json_message: &str,
    ) -> Result<(), DrawError> {
        // 1. 一意なキーで永続化（既存ストロークを上書きしない）
        let suffix = Uuid::new_v4().to_string();
        self.store
            .put(&keys::stroke(class_id, &suffix), stroke_json)
            .await?;

        // 2. クラス全体へブロードキャスト
        self.message_pusher
            .broadcast_to_room(class_id, json_message)
            .await
            .map_err(|e| DrawError::Broadcast(e.to_string()))?;

        Ok(())
    }
}
