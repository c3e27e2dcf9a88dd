// API key domain routes
// API 키 라우터
use axum::{routing::post, Router};
use crate::domains::api_key::handlers::api_key_handler;
use crate::shared::services::AppState;

/// Create API key router
/// API 키 라우터 생성 (Bearer 전용)
pub fn create_api_key_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(api_key_handler::create_api_key))
        .route("/rollover", post(api_key_handler::rollover_api_key))
        .route("/revoke", post(api_key_handler::revoke_api_key))
}
