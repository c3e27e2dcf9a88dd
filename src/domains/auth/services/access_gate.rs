use axum::http::HeaderMap;
use crate::domains::api_key::services::ApiKeyService;
use crate::domains::auth::models::Principal;
use crate::domains::auth::services::JwtService;
use crate::shared::database::{Database, UserRepository};
use crate::shared::errors::{ApiKeyError, AuthError, ErrorKind};

/// API 키 헤더
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authorization 헤더에서 Bearer 토큰 추출
/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// x-api-key 헤더 값
pub fn api_key_value(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// 인증 게이트
/// Resolves an inbound credential to a `Principal`
///
/// Bearer 토큰: 모든 권한
/// API 키: 키에 명시된 권한만
#[derive(Clone)]
pub struct AccessGate {
    db: Database,
    jwt_service: JwtService,
    api_key_service: ApiKeyService,
}

impl AccessGate {
    pub fn new(db: Database, jwt_service: JwtService, api_key_service: ApiKeyService) -> Self {
        Self {
            db,
            jwt_service,
            api_key_service,
        }
    }

    /// Bearer 우선, 실패 시 API 키
    /// Try the bearer token first, then the API key
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let bearer = bearer_token(headers);
        let api_key = api_key_value(headers);

        if let Some(token) = bearer {
            match self.resolve_bearer(token).await {
                Ok(principal) => return Ok(principal),
                // 인증 실패만 API 키로 넘어감 (DB 장애 등은 그대로 전파)
                Err(e) if api_key.is_some() && e.kind() == ErrorKind::Unauthenticated => {
                    tracing::debug!(error = %e, "Bearer rejected, falling back to API key");
                }
                Err(e) => return Err(e),
            }
        }

        match api_key {
            Some(key) => self.resolve_api_key(key).await,
            None => Err(AuthError::MissingCredentials),
        }
    }

    /// Bearer 토큰 → Principal (사용자 + 지갑 즉시 로딩)
    pub async fn resolve_bearer(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.jwt_service.verify_access_token(token)?;

        let user_repo = UserRepository::new(self.db.pool().clone());
        let found = user_repo
            .get_user_with_wallet(claims.user_id)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch user: {:#}", e)))?
            .ok_or(AuthError::UserNotFound { id: claims.user_id })?;

        Ok(Principal::bearer(found.user.id, found.user.email, found.wallet))
    }

    /// API 키 → Principal (소유자 지갑 + 키 권한)
    pub async fn resolve_api_key(&self, candidate: &str) -> Result<Principal, AuthError> {
        let validated = self
            .api_key_service
            .validate(candidate)
            .await
            .map_err(|e: ApiKeyError| AuthError::DatabaseError(e.to_string()))?
            .ok_or(AuthError::InvalidApiKey)?;

        let user_repo = UserRepository::new(self.db.pool().clone());
        let owner = user_repo
            .get_user_with_wallet(validated.user_id)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch key owner: {:#}", e)))?
            .ok_or(AuthError::WalletMissing { user_id: validated.user_id })?;

        Ok(Principal::api_key(
            owner.user.id,
            owner.user.email,
            owner.wallet,
            validated.key_id,
            validated.permissions,
        ))
    }
}
