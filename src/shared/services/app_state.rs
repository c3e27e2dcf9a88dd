use std::sync::Arc;
use crate::shared::clients::PaymentGateway;
use crate::shared::config::AppConfig;
use crate::shared::database::Database;
use crate::domains::api_key::services::state::ApiKeyState;
use crate::domains::auth::services::state::AuthState;
use crate::domains::auth::services::JwtService;
use crate::domains::wallet::services::state::WalletState;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 각 도메인의 State를 조합하여 전체 애플리케이션 상태를 관리
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 (공유)
    /// Database connection (shared)
    pub db: Database,
    pub auth_state: AuthState,
    pub api_key_state: ApiKeyState,
    pub wallet_state: WalletState,
}

impl AppState {
    /// 모든 도메인 State를 초기화하고 조합
    /// Build every domain state from the loaded configuration
    ///
    /// 게이트웨이는 외부에서 주입 (운영: PaystackClient, 테스트: 스텁)
    pub fn new(db: Database, config: &AppConfig, gateway: Arc<dyn PaymentGateway>) -> Self {
        // 1. 공유 서비스 생성 (JWT)
        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

        // 2. 각 도메인 State 생성 (Access Gate는 Credential Store에 의존)
        let api_key_state = ApiKeyState::new(db.clone(), config.api_keys);
        let auth_state = AuthState::new(
            db.clone(),
            jwt_service,
            api_key_state.api_key_service.clone(),
        );
        let wallet_state = WalletState::new(db.clone(), gateway, config.min_deposit_amount);

        Self {
            db,
            auth_state,
            api_key_state,
            wallet_state,
        }
    }
}
