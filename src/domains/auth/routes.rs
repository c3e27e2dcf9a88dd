// Auth domain routes
// 사용자 라우터
use axum::{routing::get, Router};
use crate::domains::auth::handlers::user_handler;
use crate::shared::services::AppState;

/// Create user router
/// 사용자 라우터 생성
pub fn create_user_router() -> Router<AppState> {
    Router::new().route("/me", get(user_handler::get_me))
}
