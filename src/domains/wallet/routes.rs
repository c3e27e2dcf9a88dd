// Wallet domain routes
// 지갑 도메인 라우터
use axum::{routing::{get, post}, Router};
use crate::domains::wallet::handlers::wallet_handler;
use crate::shared::services::AppState;

/// Create wallet router
/// 지갑 라우터 생성
pub fn create_wallet_router() -> Router<AppState> {
    Router::new()
        .route("/deposit", post(wallet_handler::deposit))
        .route("/paystack/webhook", post(wallet_handler::paystack_webhook))  // 인증 없음 (서명 검증)
        .route("/transfer", post(wallet_handler::transfer))
        .route("/balance", get(wallet_handler::get_balance))
        .route("/transactions", get(wallet_handler::get_transactions))
        .route("/deposit/:reference/status", get(wallet_handler::get_deposit_status))
}
