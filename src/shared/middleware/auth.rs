use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use crate::domains::auth::models::Principal;
use crate::domains::auth::services::bearer_token;
use crate::shared::services::AppState;
use crate::shared::errors::AuthError;

/// 인증된 사용자 정보 (JWT 토큰에서 추출, Bearer 전용)
/// Bearer-only caller, used for key management and profile routes
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: u64,
    pub email: String,
}

/// AuthenticatedUser를 Axum Extractor로 구현
///
/// 사용법:
/// ```rust,ignore
/// pub async fn create_api_key(
///     State(app_state): State<AppState>,
///     authenticated_user: AuthenticatedUser,
///     Json(request): Json<CreateApiKeyRequest>,
/// ) -> Result<...> {
///     let user_id = authenticated_user.user_id;
///     // ...
/// }
/// ```
#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // 1. "Bearer <token>" 파싱
        let token = bearer_token(&parts.headers)
            .ok_or(AuthError::MissingCredentials)
            .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

        // 2. JWT Service로 토큰 검증
        let claims = state
            .auth_state
            .jwt_service
            .verify_access_token(token)
            .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

        Ok(AuthenticatedUser {
            user_id: claims.user_id,
            email: claims.email,
        })
    }
}

/// Principal Extractor (Bearer 또는 API 키)
/// Either credential kind, normalized by the access gate
#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .auth_state
            .access_gate
            .resolve(&parts.headers)
            .await
            .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })
    }
}
