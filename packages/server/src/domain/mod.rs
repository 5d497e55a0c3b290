//! ドメインモデル定義
//!
//! クラス（ルーム）・ユーザー・コネクションを表す値オブジェクトと、
//! 共有ストア上のキーレイアウトを定義します。
//! ストア・通知のインターフェースは `store` / `pusher` モジュールを参照。

mod pusher;
mod store;

pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use store::{SessionStore, StoreError, keys};

#[cfg(test)]
pub use store::MockSessionStore;

use thiserror::Error;
use uuid::Uuid;

/// 値オブジェクトのバリデーションエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{0} exceeds maximum length")]
    TooLong(&'static str),
    #[error("malformed {0} record")]
    Malformed(&'static str),
}

/// クラス（ルーム）の外部識別子
///
/// クラスは独立した保存レコードを持たず、共有ストア上のキー接頭辞と
/// ブロードキャストグループ名としてのみ存在する。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassId(String);

impl ClassId {
    pub const MAX_LEN: usize = 128;

    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::Empty("class id"));
        }
        if value.chars().count() > Self::MAX_LEN {
            return Err(DomainError::TooLong("class id"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ユーザー名
///
/// ユーザーは同時に1つのクラスにのみ所属する。独立したエンティティではなく、
/// メンバーシップレコードとコネクションの属性としてのみ表現される。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub const MAX_LEN: usize = 64;

    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::Empty("username"));
        }
        if value.chars().count() > Self::MAX_LEN {
            return Err(DomainError::TooLong("username"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// トランスポートセッションごとに1つ発行されるコネクション識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// 新しいコネクション識別子を生成（uuid v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 「ユーザー U がクラス R に在室している」というメンバーシップの事実
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub class_id: ClassId,
    pub username: Username,
}

impl Membership {
    /// コネクション索引キー（`socket_{connectionId}`）に保存する JSON 表現
    pub fn to_index_json(&self) -> String {
        serde_json::json!({
            "classId": self.class_id.as_str(),
            "username": self.username.as_str(),
        })
        .to_string()
    }

    /// コネクション索引レコードの JSON からメンバーシップを復元する
    pub fn from_index_json(raw: &str) -> Result<Self, DomainError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|_| DomainError::Malformed("socket index"))?;
        let class_id = value
            .get("classId")
            .and_then(|v| v.as_str())
            .ok_or(DomainError::Malformed("socket index"))?;
        let username = value
            .get("username")
            .and_then(|v| v.as_str())
            .ok_or(DomainError::Malformed("socket index"))?;
        Ok(Self {
            class_id: ClassId::new(class_id.to_string())?,
            username: Username::new(username.to_string())?,
        })
    }
}
