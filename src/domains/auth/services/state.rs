// Auth domain state
// 인증 도메인 상태
use crate::shared::database::Database;
use crate::domains::api_key::services::ApiKeyService;
use crate::domains::auth::services::{AccessGate, JwtService, UserService};

/// Auth domain state
/// 인증 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct AuthState {
    pub user_service: UserService,
    pub jwt_service: JwtService,
    pub access_gate: AccessGate,
}

impl AuthState {
    /// AuthState 생성 (API 키 검증은 Credential Store에 위임)
    pub fn new(db: Database, jwt_service: JwtService, api_key_service: ApiKeyService) -> Self {
        Self {
            user_service: UserService::new(db.clone()),
            access_gate: AccessGate::new(db, jwt_service.clone(), api_key_service),
            jwt_service,
        }
    }
}
