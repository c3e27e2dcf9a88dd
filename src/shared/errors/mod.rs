// Shared errors
pub mod auth_error;
pub mod api_key_error;
pub mod wallet_error;
pub mod gateway_error;

pub use auth_error::*;
pub use api_key_error::*;
pub use wallet_error::*;
pub use gateway_error::*;

use axum::http::StatusCode;

/// 에러 분류 (HTTP 상태 코드와 1:1 대응)
/// Error taxonomy shared by every domain error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    NotFound,
    InvalidInput,
    Conflict,
    SignatureInvalid,
    Upstream,
    Internal,
}

impl ErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::BAD_REQUEST,
            ErrorKind::SignatureInvalid => StatusCode::BAD_REQUEST,
            ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 응답 본문 메시지 (내부 에러는 로그로만 남기고 일반 메시지 반환)
    /// Client-facing message; internal failures are logged and masked
    pub fn public_message(&self, err: &dyn std::fmt::Display) -> String {
        match self {
            ErrorKind::Internal => {
                tracing::error!(error = %err, "Internal error while handling request");
                "Internal server error".to_string()
            }
            _ => err.to_string(),
        }
    }
}
