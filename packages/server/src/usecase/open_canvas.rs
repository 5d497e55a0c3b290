//! UseCase: キャンバスオープン通知
//!
//! ユーザーが描画サーフェスを開いたことをクラス全体（本人を含む）へ通知する。
//! ピアはこれを「誰が描いているか」のインジケータ更新に使う。ストアには触れない。

use std::sync::Arc;

use crate::domain::{ClassId, MessagePusher};

use super::error::OpenCanvasError;

/// キャンバスオープン通知のユースケース
pub struct OpenCanvasUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl OpenCanvasUseCase {
    /// 新しい OpenCanvasUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// `new_user_start_drawing` をクラス全体へブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `class_id` - 通知先クラスの ID
    /// * `json_message` - ブロードキャストするメッセージ（UI 層で生成）
    pub async fn execute(
        &self,
        class_id: &ClassId,
        json_message: &str,
    ) -> Result<(), OpenCanvasError> {
        self.message_pusher
            .broadcast_to_room(class_id, json_message)
            .await
            .map_err(|e| OpenCanvasError::Broadcast(e.to_string()))
    }
}
