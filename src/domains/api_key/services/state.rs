// API key domain state
// API 키 도메인 상태
use crate::domains::api_key::services::ApiKeyService;
use crate::shared::config::ApiKeyPolicy;
use crate::shared::database::Database;

#[derive(Clone)]
pub struct ApiKeyState {
    pub api_key_service: ApiKeyService,
}

impl ApiKeyState {
    pub fn new(db: Database, policy: ApiKeyPolicy) -> Self {
        Self {
            api_key_service: ApiKeyService::new(db, policy),
        }
    }
}
