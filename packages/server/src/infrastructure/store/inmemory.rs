//! InMemory Session Store 実装
//!
//! ドメイン層が定義する SessionStore trait の具体的な実装。
//! HashMap をインメモリ KV として使用します。
//!
//! 単一プロセス内で完結するため、この実装がエラーを返すことはありません。
//! Redis などの外部ストア実装に差し替える際は、接続エラーを
//! `StoreError::Unavailable` に写像します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{SessionStore, StoreError};

/// インメモリ Session Store 実装
///
/// フラットなキー空間を last-write-wins で保持します。
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStore {
    /// 新しい InMemorySessionStore を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        // テスト項目: 書き込んだ値が読み出せる
        // given (前提条件):
        let store = InMemorySessionStore::new();

        // when (操作):
        store.put("class_c1_user_alice", "alice").await.unwrap();
        let value = store.get("class_c1_user_alice").await.unwrap();

        // then (期待する結果):
        assert_eq!(value, Some("alice".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        // テスト項目: 存在しないキーの読み出しは None を返す
        // given (前提条件):
        let store = InMemorySessionStore::new();

        // when (操作):
        let value = store.get("socket_unknown").await.unwrap();

        // then (期待する結果):
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_value() {
        // テスト項目: 同一キーへの書き込みは last-write-wins で上書きされる
        // given (前提条件):
        let store = InMemorySessionStore::new();
        store.put("socket_1", "first").await.unwrap();

        // when (操作):
        store.put("socket_1", "second").await.unwrap();

        // then (期待する結果):
        assert_eq!(store.get("socket_1").await.unwrap(), Some("second".to_string()));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        // テスト項目: 削除は存在しないキーに対しても no-op として成功する
        // given (前提条件):
        let store = InMemorySessionStore::new();
        store.put("socket_1", "value").await.unwrap();

        // when (操作):
        store.delete("socket_1").await.unwrap();
        let second = store.delete("socket_1").await;

        // then (期待する結果):
        assert!(second.is_ok());
        assert_eq!(store.get("socket_1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_scan_prefix_filters_keys() {
        // テスト項目: 接頭辞に一致するキーだけが列挙される
        // given (前提条件):
        let store = InMemorySessionStore::new();
        store.put("class_c1_user_alice", "alice").await.unwrap();
        store.put("class_c1_user_bob", "bob").await.unwrap();
        store.put("class_c2_user_carol", "carol").await.unwrap();
        store.put("class_c1_strokes_x", "[]").await.unwrap();

        // when (操作):
        let mut pairs = store.scan_prefix("class_c1_user").await.unwrap();
        pairs.sort();

        // then (期待する結果):
        assert_eq!(
            pairs,
            vec![
                ("class_c1_user_alice".to_string(), "alice".to_string()),
                ("class_c1_user_bob".to_string(), "bob".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_scan_prefix_empty_result() {
        // テスト項目: 一致するキーがなければ空のリストが返る（エラーではない）
        // given (前提条件):
        let store = InMemorySessionStore::new();

        // when (操作):
        let pairs = store.scan_prefix("class_c9_user").await.unwrap();

        // then (期待する結果):
        assert!(pairs.is_empty());
    }
}
