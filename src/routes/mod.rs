// Routes module: 라우팅 설정
// 역할: 모든 도메인의 라우터를 조합
// Routes module: combines all domain routers

pub mod health;

use axum::{routing::get, Router};
use crate::shared::services::AppState;

// 각 도메인의 routes import
use crate::domains::api_key::routes::create_api_key_router;
use crate::domains::auth::routes::create_user_router;
use crate::domains::wallet::routes::create_wallet_router;

/// Create main router (combines all domain routers)
/// 메인 라우터 생성 (모든 도메인 라우터 조합)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/keys", create_api_key_router())
        .nest("/users", create_user_router())
        .nest("/wallet", create_wallet_router())
}
