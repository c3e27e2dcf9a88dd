use thiserror::Error;
use axum::{http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;
use crate::shared::errors::ErrorKind;

/// API 키 관련 에러
/// API key (credential store) errors
#[derive(Error, Debug)]
pub enum ApiKeyError {
    /// 활성 키 개수 제한 도달
    /// Active key limit reached
    #[error("You have reached the maximum number of active API keys ({limit})")]
    LimitExceeded { limit: i64 },

    /// 허용 범위를 벗어난 만료 시간
    /// Expiry outside the admissible window
    #[error("Invalid expiry: {0}")]
    InvalidExpiry(String),

    /// 키가 없거나 소유자가 아님
    /// Key absent or owned by someone else
    #[error("API key not found or you do not have permission to access it: id={id}")]
    NotFound { id: Uuid },

    /// 아직 만료되지 않은 키는 롤오버 불가
    /// Rollover requested before expiry
    #[error("This key is not yet expired and cannot be rolled over (expires at {expires_at})")]
    NotYetExpired { expires_at: DateTime<Utc> },

    /// 폐기되었거나 이미 롤오버된 키
    /// Key was revoked or already rolled over
    #[error("API key has been revoked and cannot be rolled over: id={id}")]
    AlreadyRevoked { id: Uuid },

    /// 잘못된 입력
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 키 해싱 실패
    /// Failed to hash key
    #[error("Failed to hash API key: {0}")]
    HashingFailed(String),

    /// 데이터베이스 에러
    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl ApiKeyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiKeyError::LimitExceeded { .. } => ErrorKind::Forbidden,
            ApiKeyError::InvalidExpiry(_)
            | ApiKeyError::NotYetExpired { .. }
            | ApiKeyError::AlreadyRevoked { .. }
            | ApiKeyError::InvalidInput(_) => ErrorKind::InvalidInput,
            ApiKeyError::NotFound { .. } => ErrorKind::NotFound,
            ApiKeyError::HashingFailed(_) | ApiKeyError::DatabaseError(_) => ErrorKind::Internal,
        }
    }
}

/// ApiKeyError를 HTTP 응답으로 변환
impl From<ApiKeyError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: ApiKeyError) -> Self {
        let kind = err.kind();
        (kind.status(), Json(json!({ "error": kind.public_message(&err) })))
    }
}
