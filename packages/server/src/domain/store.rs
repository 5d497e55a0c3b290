//! 共有エフェメラルストアの trait 定義
//!
//! ドメイン層が必要とするキー/バリューアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## コントラクト
//!
//! - 単一キーへの書き込みは last-write-wins
//! - キーをまたぐトランザクションや順序保証は提供しない
//! - `scan_prefix` の列挙順は未定義

use async_trait::async_trait;
use thiserror::Error;

use super::{ClassId, ConnectionId, Username};

/// ストア操作のエラー
///
/// いずれの操作も I/O として失敗しうる。失敗は進行中の操作にとって致命的で、
/// リトライは行わない（呼び出し元がイベントを破棄する）。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
}

/// Session Store trait
///
/// ライブ配信とスナップショット読み出しの両方を支える共有エフェメラルストア。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// キーに値を書き込む（last-write-wins）
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// キーの値を読み出す。存在しなければ `None`
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// キーを削除する。存在しないキーの削除は no-op
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// 接頭辞に一致する (キー, 値) の組をすべて列挙する（順序は未定義）
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError>;
}

/// 共有ストア上のキーレイアウト
///
/// - `socket_{connectionId}` → `{classId, username}` の JSON（コネクション索引）
/// - `class_{classId}_user_{username}` → ユーザー名（メンバーシップレコード）
/// - `class_{classId}_strokes_{suffix}` → ストロークの JSON 配列
pub mod keys {
    use super::{ClassId, ConnectionId, Username};

    pub fn socket_index(connection_id: &ConnectionId) -> String {
        format!("socket_{}", connection_id.as_str())
    }

    pub fn membership(class_id: &ClassId, username: &Username) -> String {
        format!("class_{}_user_{}", class_id.as_str(), username.as_str())
    }

    pub fn membership_prefix(class_id: &ClassId) -> String {
        format!("class_{}_user", class_id.as_str())
    }

    pub fn stroke(class_id: &ClassId, suffix: &str) -> String {
        format!("class_{}_strokes_{}", class_id.as_str(), suffix)
    }

    pub fn stroke_prefix(class_id: &ClassId) -> String {
        format!("class_{}_strokes", class_id.as_str())
    }
}
