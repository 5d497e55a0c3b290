//! HTTP API endpoint handlers.
//!
//! The snapshot endpoints are the read-only recovery surface: a refreshing
//! client rebuilds its local state from here instead of replaying the live
//! event stream. They read the shared store only, never live connections.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{domain::ClassId, infrastructure::dto::http::ClassUserDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the users currently present in a class
pub async fn get_class_users(
    State(state): State<Arc<AppState>>,
    Path(class_id): Path<String>,
) -> Result<Json<Vec<ClassUserDto>>, StatusCode> {
    let class_id = match ClassId::new(class_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid class id in user snapshot request: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    match state.class_snapshot_usecase.users(&class_id).await {
        Ok(usernames) => {
            // Domain Model から DTO への変換（id はソート済みリスト内の位置）
            let users = usernames
                .into_iter()
                .enumerate()
                .map(|(id, username)| ClassUserDto { id, username })
                .collect();
            Ok(Json(users))
        }
        Err(e) => {
            tracing::error!(
                "Failed to read user snapshot for class '{}': {}",
                class_id.as_str(),
                e
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get the strokes drawn so far in a class
pub async fn get_class_strokes(
    State(state): State<Arc<AppState>>,
    Path(class_id): Path<String>,
) -> Result<Json<Vec<serde_json::Value>>, StatusCode> {
    let class_id = match ClassId::new(class_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid class id in stroke snapshot request: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    match state.class_snapshot_usecase.strokes(&class_id).await {
        Ok(strokes) => Ok(Json(strokes)),
        Err(e) => {
            tracing::error!(
                "Failed to read stroke snapshot for class '{}': {}",
                class_id.as_str(),
                e
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
