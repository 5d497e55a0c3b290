//! UseCase 層
//!
//! セッション操作ごとに1つのユースケースを定義します。各ユースケースは
//! ドメイン層の trait（`SessionStore`, `MessagePusher`）のみに依存します。

mod class_snapshot;
mod disconnect_session;
mod error;
mod open_canvas;
mod reconnect_user;
mod register_user;
mod submit_stroke;

pub use class_snapshot::ClassSnapshotUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{
    DisconnectError, DrawError, OpenCanvasError, ReconnectError, RegisterError, SnapshotError,
};
pub use open_canvas::OpenCanvasUseCase;
pub use reconnect_user::ReconnectUserUseCase;
pub use register_user::RegisterUserUseCase;
pub use submit_stroke::SubmitStrokeUseCase;
