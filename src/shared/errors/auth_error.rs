use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;
use crate::domains::auth::models::Permission;
use crate::shared::errors::ErrorKind;

/// 인증 관련 에러
/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// 잘못된 또는 만료된 토큰
    /// Invalid or expired token
    #[error("Invalid or expired token")]
    InvalidToken,

    /// 인증 정보가 제공되지 않음
    /// No bearer token or API key supplied
    #[error("Missing credentials")]
    MissingCredentials,

    /// 유효하지 않은 API 키
    /// API key unknown, revoked or expired
    #[error("Invalid API key")]
    InvalidApiKey,

    /// 권한 없음 (유효한 인증, 권한 부족)
    /// Valid credential without the required capability
    #[error("You do not have {permission} permission")]
    MissingPermission { permission: Permission },

    /// 사용자를 찾을 수 없음
    /// User not found
    #[error("User not found: id={id}")]
    UserNotFound { id: u64 },

    /// 사용자에게 지갑이 없음
    /// User exists without a wallet
    #[error("Wallet not found for user: id={user_id}")]
    WalletMissing { user_id: u64 },

    /// 잘못된 입력
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 데이터베이스 에러
    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 내부 서버 에러
    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidToken
            | AuthError::MissingCredentials
            | AuthError::InvalidApiKey => ErrorKind::Unauthenticated,
            AuthError::MissingPermission { .. } => ErrorKind::Forbidden,
            // 토큰은 유효하지만 주체가 사라진 경우도 인증 실패로 취급
            AuthError::UserNotFound { .. } | AuthError::WalletMissing { .. } => {
                ErrorKind::Unauthenticated
            }
            AuthError::InvalidInput(_) => ErrorKind::InvalidInput,
            AuthError::DatabaseError(_) | AuthError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// AuthError를 HTTP 응답으로 변환
impl From<AuthError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: AuthError) -> Self {
        let kind = err.kind();
        (kind.status(), Json(json!({ "error": kind.public_message(&err) })))
    }
}
