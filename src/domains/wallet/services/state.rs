// Wallet domain state
// 지갑 도메인 상태
use std::sync::Arc;
use rust_decimal::Decimal;
use crate::shared::clients::PaymentGateway;
use crate::shared::database::Database;
use crate::domains::wallet::services::WalletService;

/// Wallet domain state
/// 지갑 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct WalletState {
    pub wallet_service: WalletService,
}

impl WalletState {
    /// WalletState 생성 (게이트웨이는 주입받음)
    pub fn new(db: Database, gateway: Arc<dyn PaymentGateway>, min_deposit_amount: Decimal) -> Self {
        Self {
            wallet_service: WalletService::new(db, gateway, min_deposit_amount),
        }
    }
}
