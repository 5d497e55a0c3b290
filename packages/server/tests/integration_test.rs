//! Integration tests for the whiteboard session server using process-based testing.

use std::process::{Child, Command, Stdio};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::{SinkExt, StreamExt};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

const TEST_JWT_SECRET: &str = "test-secret";

/// Helper struct to manage server process lifecycle
struct TestServer {
    process: Child,
    port: u16,
}

impl TestServer {
    /// Start a test server on the specified port and wait until it answers health checks
    async fn start(port: u16) -> Self {
        let process = Command::new("cargo")
            .args([
                "run",
                "--bin",
                "kokuban-server",
                "--",
                "--port",
                &port.to_string(),
                "--jwt-secret",
                TEST_JWT_SECRET,
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to start server");

        let server = TestServer { process, port };
        server.wait_until_ready().await;
        server
    }

    /// Poll the health endpoint until the server is up (covers compile time on first run)
    async fn wait_until_ready(&self) {
        let url = format!("http://127.0.0.1:{}/api/health", self.port);
        for _ in 0..300 {
            if let Ok(resp) = reqwest::get(&url).await {
                if resp.status().is_success() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        panic!("Server did not become ready on port {}", self.port);
    }

    /// Get the WebSocket URL for this server with the given credential
    fn ws_url(&self, token: &str) -> String {
        format!("ws://127.0.0.1:{}/ws?token={}", self.port, token)
    }

    /// Get an HTTP API URL for this server
    fn api_url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Kill the server process when the test ends
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    exp: u64,
}

/// Mint a connection credential signed with the test secret
fn mint_token(sub: &str, expires_in_seconds: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    let exp = (now + expires_in_seconds).max(0) as u64;
    let claims = TestClaims {
        sub: sub.to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connect a WebSocket client with a valid credential for the given subject
async fn connect_client(server: &TestServer, sub: &str) -> WsClient {
    let token = mint_token(sub, 3600);
    let (ws, _) = connect_async(server.ws_url(&token))
        .await
        .expect("Failed to connect WebSocket client");
    ws
}

/// Send one event envelope as a text frame
async fn send_event(ws: &mut WsClient, json: &str) {
    ws.send(Message::Text(json.to_string().into()))
        .await
        .expect("Failed to send event");
}

/// Receive the next text frame as parsed JSON, with a timeout
async fn recv_event(ws: &mut WsClient) -> serde_json::Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("Timed out waiting for event")
            .expect("Connection closed while waiting for event")
            .expect("WebSocket error while waiting for event");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).expect("Received frame is not JSON");
        }
    }
}

/// Register a user in a class and consume the private ack
async fn register(ws: &mut WsClient, class_id: &str, username: &str) {
    let event = serde_json::json!({
        "event": "register",
        "data": {"classId": class_id, "username": username}
    });
    send_event(ws, &event.to_string()).await;

    let ack = recv_event(ws).await;
    assert_eq!(ack["event"], "register_success");
}

#[tokio::test]
async fn test_register_acks_and_appears_in_user_snapshot() {
    // テスト項目: 登録すると本人だけに register_success が届き、ユーザースナップショットに現れる
    // given (前提条件):
    let server = TestServer::start(18090).await;
    let mut alice = connect_client(&server, "alice").await;

    // when (操作):
    register(&mut alice, "c1", "alice").await;

    // then (期待する結果):
    let users: serde_json::Value = reqwest::get(server.api_url("/class/c1/users"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users, serde_json::json!([{"id": 0, "username": "alice"}]));
}

#[tokio::test]
async fn test_draw_is_broadcast_and_persisted() {
    // テスト項目: draw がクラスメイトに配信され、ストロークスナップショットに残る
    // given (前提条件):
    let server = TestServer::start(18091).await;
    let mut alice = connect_client(&server, "alice").await;
    let mut bob = connect_client(&server, "bob").await;
    register(&mut alice, "c1", "alice").await;
    register(&mut bob, "c1", "bob").await;

    // when (操作): bob がストロークを送信
    let draw = serde_json::json!({
        "event": "draw",
        "data": {"classId": "c1", "username": "bob", "strokes": ["s1"]}
    });
    send_event(&mut bob, &draw.to_string()).await;

    // then (期待する結果): alice に update_draw_canvas が届く
    let event = recv_event(&mut alice).await;
    assert_eq!(event["event"], "update_draw_canvas");
    assert_eq!(event["data"]["classId"], "c1");
    assert_eq!(event["data"]["strokes"], serde_json::json!(["s1"]));

    // スナップショットには各レコードの先頭ストロークが残る
    let strokes: serde_json::Value = reqwest::get(server.api_url("/class/c1/strokes"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(strokes, serde_json::json!(["s1"]));
}

#[tokio::test]
async fn test_disconnect_broadcasts_user_leave_and_clears_membership() {
    // テスト項目: 切断すると残りのメンバーに user_leave が届き、在室記録が消える
    // given (前提条件):
    let server = TestServer::start(18092).await;
    let mut alice = connect_client(&server, "alice").await;
    let mut bob = connect_client(&server, "bob").await;
    register(&mut alice, "c1", "alice").await;
    register(&mut bob, "c1", "bob").await;

    // when (操作): alice が切断
    alice.close(None).await.expect("Failed to close connection");

    // then (期待する結果): bob に user_leave が届く
    let event = recv_event(&mut bob).await;
    assert_eq!(event["event"], "user_leave");
    assert_eq!(event["data"]["classId"], "c1");
    assert_eq!(event["data"]["username"], "alice");

    // 在室スナップショットからも alice が消えている
    let users: serde_json::Value = reqwest::get(server.api_url("/class/c1/users"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users, serde_json::json!([{"id": 0, "username": "bob"}]));
}

#[tokio::test]
async fn test_expired_token_is_rejected_before_upgrade() {
    // テスト項目: 期限切れトークンのコネクションはアップグレード前に拒否される
    // given (前提条件):
    let server = TestServer::start(18093).await;
    let token = mint_token("alice", -3600);

    // when (操作):
    let result = connect_async(server.ws_url(&token)).await;

    // then (期待する結果): 接続が確立しない
    assert!(result.is_err(), "Expired credential should be rejected");

    // サーバー側に何の状態も残らない
    let users: serde_json::Value = reqwest::get(server.api_url("/class/c1/users"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users, serde_json::json!([]));
}

#[tokio::test]
async fn test_missing_token_is_rejected_before_upgrade() {
    // テスト項目: トークンなしのコネクションはアップグレード前に拒否される
    // given (前提条件):
    let server = TestServer::start(18094).await;

    // when (操作):
    let url = format!("ws://127.0.0.1:{}/ws", server.port);
    let result = connect_async(url).await;

    // then (期待する結果):
    assert!(result.is_err(), "Credential-less connection should be rejected");
}

#[tokio::test]
async fn test_reconnect_is_broadcast_to_whole_class_including_sender() {
    // テスト項目: reconnect の通知は送信者本人を含むクラス全員に届く
    // given (前提条件):
    let server = TestServer::start(18095).await;
    let mut alice = connect_client(&server, "alice").await;
    let mut bob = connect_client(&server, "bob").await;
    register(&mut alice, "c1", "alice").await;
    register(&mut bob, "c1", "bob").await;

    // when (操作): bob が再接続を申告
    let reconnect = serde_json::json!({
        "event": "reconnect",
        "data": {"classId": "c1", "username": "bob"}
    });
    send_event(&mut bob, &reconnect.to_string()).await;

    // then (期待する結果): alice にも bob 本人にも user_reconnect が届く
    let to_alice = recv_event(&mut alice).await;
    assert_eq!(to_alice["event"], "user_reconnect");
    assert_eq!(to_alice["data"]["username"], "bob");

    let to_bob = recv_event(&mut bob).await;
    assert_eq!(to_bob["event"], "user_reconnect");
    assert_eq!(to_bob["data"]["username"], "bob");
}

#[tokio::test]
async fn test_open_drawing_canvas_notifies_classmates() {
    // テスト項目: open_drawing_canvas がクラス全員に new_user_start_drawing として届く
    // given (前提条件):
    let server = TestServer::start(18096).await;
    let mut alice = connect_client(&server, "alice").await;
    let mut bob = connect_client(&server, "bob").await;
    register(&mut alice, "c1", "alice").await;
    register(&mut bob, "c1", "bob").await;

    // when (操作): bob がキャンバスを開く
    let open = serde_json::json!({
        "event": "open_drawing_canvas",
        "data": {"classId": "c1", "username": "bob"}
    });
    send_event(&mut bob, &open.to_string()).await;

    // then (期待する結果):
    let event = recv_event(&mut alice).await;
    assert_eq!(event["event"], "new_user_start_drawing");
    assert_eq!(event["data"]["classId"], "c1");
    assert_eq!(event["data"]["username"], "bob");
}

#[tokio::test]
async fn test_events_do_not_cross_class_boundaries() {
    // テスト項目: あるクラスの draw は別クラスのメンバーには届かない
    // given (前提条件):
    let server = TestServer::start(18097).await;
    let mut alice = connect_client(&server, "alice").await;
    let mut carol = connect_client(&server, "carol").await;
    register(&mut alice, "c1", "alice").await;
    register(&mut carol, "c2", "carol").await;

    // when (操作): alice が c1 でストロークを送信
    let draw = serde_json::json!({
        "event": "draw",
        "data": {"classId": "c1", "strokes": ["s1"]}
    });
    send_event(&mut alice, &draw.to_string()).await;

    // then (期待する結果): carol には何も届かない
    let result = tokio::time::timeout(Duration::from_secs(2), carol.next()).await;
    assert!(
        result.is_err(),
        "Member of another class should not receive the event"
    );
}
