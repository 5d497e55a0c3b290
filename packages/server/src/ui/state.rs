//! Server state shared across connection and snapshot handlers.

use std::sync::Arc;

use crate::domain::MessagePusher;
use crate::ui::auth::AuthConfig;
use crate::usecase::{
    ClassSnapshotUseCase, DisconnectSessionUseCase, OpenCanvasUseCase, ReconnectUserUseCase,
    RegisterUserUseCase, SubmitStrokeUseCase,
};

/// Shared application state
pub struct AppState {
    /// 認証ゲート（コネクション単位の JWT 検証）
    pub auth: Arc<AuthConfig>,
    /// MessagePusher（メッセージ通知の抽象化）
    pub message_pusher: Arc<dyn MessagePusher>,
    /// RegisterUserUseCase（初回登録のユースケース）
    pub register_user_usecase: Arc<RegisterUserUseCase>,
    /// ReconnectUserUseCase（再接続のユースケース）
    pub reconnect_user_usecase: Arc<ReconnectUserUseCase>,
    /// DisconnectSessionUseCase（切断処理のユースケース）
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// OpenCanvasUseCase（キャンバスオープン通知のユースケース）
    pub open_canvas_usecase: Arc<OpenCanvasUseCase>,
    /// SubmitStrokeUseCase（ストローク送信のユースケース）
    pub submit_stroke_usecase: Arc<SubmitStrokeUseCase>,
    /// ClassSnapshotUseCase（スナップショット読み出しのユースケース）
    pub class_snapshot_usecase: Arc<ClassSnapshotUseCase>,
}
