use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// 지갑 모델 (DB)
/// Wallet model: one per user, balance never negative
#[derive(Debug, Clone, Serialize)]
pub struct Wallet {
    pub id: u64,
    pub user_id: u64,
    /// 공개 지갑 번호 (10자리, 송금 상대방이 사용)
    /// Public 10-digit wallet number used by transfer counterparties
    pub wallet_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 입금 요청
/// Deposit request
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: Decimal,
}

/// 게이트웨이 결제 세션 (입금 요청 응답)
/// Payment session returned by the gateway
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepositSession {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// 송금 요청
/// Transfer request
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub wallet_number: String,
    pub amount: Decimal,
}

/// 송금 응답
/// Transfer response
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub status: String,
    pub message: String,
}

/// 잔액 조회 응답
/// Balance response
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// 웹훅 처리 결과
/// Webhook acknowledgement body
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub status: bool,
}

/// 웹훅 처리 결과 (내부용)
/// Outcome of a verified webhook delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// 입금 반영됨
    Credited { reference: String },
    /// 이미 처리된 참조 (멱등 처리)
    AlreadyProcessed { reference: String },
    /// 성공 이벤트가 아님
    IgnoredEvent { event: String },
}
