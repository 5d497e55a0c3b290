//! UseCase: クラススナップショット読み出し
//!
//! リフレッシュしたクライアントがライブイベントの再生の代わりに使う、
//! 共有ストアに対する point-in-time の読み出し。ライブなコネクション状態は
//! 一切参照しないため、結果は最後にコミットされた書き込みを反映する
//! （直近のブロードキャストとは限らない）。

use std::sync::Arc;

use crate::domain::{ClassId, SessionStore, keys};

use super::error::SnapshotError;

/// クラススナップショットのユースケース
pub struct ClassSnapshotUseCase {
    /// SessionStore（共有エフェメラルストアの抽象化）
    store: Arc<dyn SessionStore>,
}

impl ClassSnapshotUseCase {
    /// 新しい ClassSnapshotUseCase を作成
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// 在室ユーザー名の一覧を返す
    ///
    /// ストアの列挙順は未定義なので、出力を安定させるためにソートして返す。
    /// レコードのないクラスは空のリスト（エラーではない）。
    pub async fn users(&self, class_id: &ClassId) -> Result<Vec<String>, SnapshotError> {
        let pairs = self
            .store
            .scan_prefix(&keys::membership_prefix(class_id))
            .await?;

        let mut usernames: Vec<String> = pairs.into_iter().map(|(_, value)| value).collect();
        usernames.sort();

        Ok(usernames)
    }

    /// 保存されたストロークの一覧を返す
    ///
    /// 各レコードは送信時のストローク配列の JSON。クライアントが復元に使うのは
    /// 各レコードの先頭要素のみで、パースできないレコードは読み飛ばす。
    pub async fn strokes(
        &self,
        class_id: &ClassId,
    ) -> Result<Vec<serde_json::Value>, SnapshotError> {
        let mut pairs = self
            .store
            .scan_prefix(&keys::stroke_prefix(class_id))
            .await?;
        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        let mut strokes = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let parsed: Result<Vec<serde_json::Value>, _> = serde_json::from_str(&value);
            match parsed {
                Ok(record) => {
                    if let Some(first) = record.into_iter().next() {
                        strokes.push(first);
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable stroke record '{}': {}", key, e);
                }
            }
        }

        Ok(strokes)
    }
}
