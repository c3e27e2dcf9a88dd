// 헬스 체크
// Health check: pings the database
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use crate::shared::services::AppState;

pub async fn health_check(State(app_state): State<AppState>) -> (StatusCode, Json<Value>) {
    match app_state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok", "database": "up" }))),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error", "database": "down" })),
            )
        }
    }
}
