//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    domain::MessagePusher,
    usecase::{
        ClassSnapshotUseCase, DisconnectSessionUseCase, OpenCanvasUseCase, ReconnectUserUseCase,
        RegisterUserUseCase, SubmitStrokeUseCase,
    },
};

use super::{
    auth::AuthConfig,
    handler::{get_class_strokes, get_class_users, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Collaborative whiteboard session server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     auth,
///     message_pusher,
///     register_user_usecase,
///     reconnect_user_usecase,
///     disconnect_session_usecase,
///     open_canvas_usecase,
///     submit_stroke_usecase,
///     class_snapshot_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// 認証ゲート（コネクション単位の JWT 検証）
    auth: Arc<AuthConfig>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// RegisterUserUseCase（初回登録のユースケース）
    register_user_usecase: Arc<RegisterUserUseCase>,
    /// ReconnectUserUseCase（再接続のユースケース）
    reconnect_user_usecase: Arc<ReconnectUserUseCase>,
    /// DisconnectSessionUseCase（切断処理のユースケース）
    disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// OpenCanvasUseCase（キャンバスオープン通知のユースケース）
    open_canvas_usecase: Arc<OpenCanvasUseCase>,
    /// SubmitStrokeUseCase（ストローク送信のユースケース）
    submit_stroke_usecase: Arc<SubmitStrokeUseCase>,
    /// ClassSnapshotUseCase（スナップショット読み出しのユースケース）
    class_snapshot_usecase: Arc<ClassSnapshotUseCase>,
}

impl Server {
    /// Create a new Server instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        auth: Arc<AuthConfig>,
        message_pusher: Arc<dyn MessagePusher>,
        register_user_usecase: Arc<RegisterUserUseCase>,
        reconnect_user_usecase: Arc<ReconnectUserUseCase>,
        disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
        open_canvas_usecase: Arc<OpenCanvasUseCase>,
        submit_stroke_usecase: Arc<SubmitStrokeUseCase>,
        class_snapshot_usecase: Arc<ClassSnapshotUseCase>,
    ) -> Self {
        Self {
            auth,
            message_pusher,
            register_user_usecase,
            reconnect_user_usecase,
            disconnect_session_usecase,
            open_canvas_usecase,
            submit_stroke_usecase,
            class_snapshot_usecase,
        }
    }

    /// Run the whiteboard session server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            auth: self.auth,
            message_pusher: self.message_pusher,
            register_user_usecase: self.register_user_usecase,
            reconnect_user_usecase: self.reconnect_user_usecase,
            disconnect_session_usecase: self.disconnect_session_usecase,
            open_canvas_usecase: self.open_canvas_usecase,
            submit_stroke_usecase: self.submit_stroke_usecase,
            class_snapshot_usecase: self.class_snapshot_usecase,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/class/{class_id}/users", get(get_class_users))
            .route("/class/{class_id}/strokes", get(get_class_strokes))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Whiteboard session server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws?token=<jwt>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
