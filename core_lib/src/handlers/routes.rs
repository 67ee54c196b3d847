//! Route table for the file gateway

use axum::{
    extract::State,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::AppState;

use super::gateway;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(gateway::list_files).post(gateway::upload_file))
        .route("/health", get(handle_health))
        .route(
            "/files/:filename",
            get(gateway::serve_file).delete(gateway::delete_file),
        )
}

async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "app": state.app_name,
        "version": state.version,
        "backend": state.backend_kind,
        "timestamp": chrono::Utc::now().timestamp(),
    }))
}
