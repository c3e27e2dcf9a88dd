use thiserror::Error;
use axum::{http::StatusCode, Json};
use rust_decimal::Decimal;
use serde_json::json;
use crate::shared::errors::{AuthError, ErrorKind};

/// 지갑(원장) 관련 에러
/// Ledger errors
#[derive(Error, Debug)]
pub enum WalletError {
    /// 인증/권한 에러
    /// Authorization failure (missing permission)
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// 잘못된 금액 (0 이하, 소수점 2자리 초과, 최소 금액 미만)
    /// Invalid amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// 자기 자신에게 송금
    /// Transfer to own wallet
    #[error("You cannot transfer funds to your own wallet")]
    SelfTransfer,

    /// 수신 지갑 없음
    /// Recipient wallet not found
    #[error("Recipient wallet not found: {wallet_number}")]
    RecipientNotFound { wallet_number: String },

    /// 잔액 부족
    /// Insufficient balance
    #[error("Insufficient wallet balance: required={required}, available={available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    /// 웹훅 서명 불일치
    /// Webhook signature mismatch
    #[error("Invalid Paystack signature")]
    InvalidSignature,

    /// 웹훅 페이로드 파싱 실패
    /// Webhook payload could not be parsed
    #[error("Malformed webhook payload: {0}")]
    MalformedEvent(String),

    /// 알 수 없는 참조값
    /// Webhook reference matches no transaction
    #[error("Transaction with reference {reference} not found")]
    UnknownReference { reference: String },

    /// 실패로 종료된 입금에 대한 성공 이벤트 (상태 변경 불가)
    /// Success event for a deposit already marked failed
    #[error("Deposit {reference} was marked failed and cannot be confirmed")]
    DepositFailed { reference: String },

    /// 입금 거래 없음 (상태 조회)
    /// Deposit not found for this wallet
    #[error("Deposit transaction with reference {reference} not found")]
    DepositNotFound { reference: String },

    /// 결제 게이트웨이 에러
    /// Payment gateway error
    #[error("Payment gateway error: {0}")]
    Gateway(String),

    /// 데이터베이스 에러
    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 내부 서버 에러
    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl WalletError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::Auth(e) => e.kind(),
            WalletError::InvalidAmount(_)
            | WalletError::SelfTransfer
            | WalletError::MalformedEvent(_)
            | WalletError::UnknownReference { .. } => ErrorKind::InvalidInput,
            WalletError::RecipientNotFound { .. } | WalletError::DepositNotFound { .. } => {
                ErrorKind::NotFound
            }
            WalletError::InsufficientFunds { .. } | WalletError::DepositFailed { .. } => {
                ErrorKind::Conflict
            }
            WalletError::InvalidSignature => ErrorKind::SignatureInvalid,
            WalletError::Gateway(_) => ErrorKind::Upstream,
            WalletError::DatabaseError(_) | WalletError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// WalletError를 HTTP 응답으로 변환
impl From<WalletError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: WalletError) -> Self {
        let kind = err.kind();
        (kind.status(), Json(json!({ "error": kind.public_message(&err) })))
    }
}
