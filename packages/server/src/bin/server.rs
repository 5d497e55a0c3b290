//! Real-time collaborative whiteboard session server.
//!
//! Authenticates WebSocket connections with a JWT, manages class membership,
//! fans drawing events out to classmates, and serves snapshot reads over HTTP.
//!
//! Run with:
//! ```not_rust
//! JWT_SECRET=dev-secret cargo run --bin kokuban-server
//! cargo run --bin kokuban-server -- --host 0.0.0.0 --port 3000 --jwt-secret dev-secret
//! ```

use std::sync::Arc;

use clap::Parser;

use kokuban_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, store::InMemorySessionStore},
    ui::{Server, auth::AuthConfig},
    usecase::{
        ClassSnapshotUseCase, DisconnectSessionUseCase, OpenCanvasUseCase, ReconnectUserUseCase,
        RegisterUserUseCase, SubmitStrokeUseCase,
    },
};
use kokuban_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kokuban-server")]
#[command(about = "Collaborative whiteboard session server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Secret used to verify connection credentials (HS256)
    #[arg(long, env = "JWT_SECRET")]
    jwt_secret: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. SessionStore
    // 2. MessagePusher
    // 3. AuthConfig
    // 4. UseCases
    // 5. Server

    // 1. Create SessionStore (in-memory, single-process)
    let store = Arc::new(InMemorySessionStore::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create the connection authenticator
    let auth = Arc::new(AuthConfig::new(args.jwt_secret.as_bytes()));

    // 4. Create UseCases
    let register_user_usecase = Arc::new(RegisterUserUseCase::new(
        store.clone(),
        message_pusher.clone(),
    ));
    let reconnect_user_usecase = Arc::new(ReconnectUserUseCase::new(
        store.clone(),
        message_pusher.clone(),
    ));
    let disconnect_session_usecase = Arc::new(DisconnectSessionUseCase::new(
        store.clone(),
        message_pusher.clone(),
    ));
    let open_canvas_usecase = Arc::new(OpenCanvasUseCase::new(message_pusher.clone()));
    let submit_stroke_usecase = Arc::new(SubmitStrokeUseCase::new(
        store.clone(),
        message_pusher.clone(),
    ));
    let class_snapshot_usecase = Arc::new(ClassSnapshotUseCase::new(store.clone()));

    // 5. Create and run the server
    let server = Server::new(
        auth,
        message_pusher,
        register_user_usecase,
        reconnect_user_usecase,
        disconnect_session_usecase,
        open_canvas_usecase,
        submit_stroke_usecase,
        class_snapshot_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
