use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// 거래 유형
/// Transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Transfer => "transfer",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionType::Deposit),
            "transfer" => Ok(TransactionType::Transfer),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

/// 거래 상태
/// Transaction status: pending -> success | failed, never reversed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Success => "success",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "success" => Ok(TransactionStatus::Success),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(format!("Unknown transaction status: {}", other)),
        }
    }
}

// DB 저장용 Transaction 모델
// Note: FromRow 대신 수동 매핑 (BIGINT i64 -> u64, TEXT -> enum)
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: u64,
    pub wallet_id: u64,
    pub tx_type: TransactionType,
    pub amount: Decimal,
    pub status: TransactionStatus,
    /// 게이트웨이 입금의 멱등성 키 (송금은 None)
    pub reference: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 거래 생성 요청
/// Transaction creation payload
#[derive(Debug)]
pub struct TransactionCreate {
    pub wallet_id: u64,
    pub tx_type: TransactionType,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub reference: Option<String>,
    pub description: String,
}

/// 거래 내역 항목 (최신순)
/// Transaction history item
#[derive(Debug, Serialize)]
pub struct TransactionHistoryItem {
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: TransactionStatus,
}

impl From<Transaction> for TransactionHistoryItem {
    fn from(tx: Transaction) -> Self {
        Self {
            tx_type: tx.tx_type,
            amount: tx.amount,
            status: tx.status,
        }
    }
}

/// 입금 상태 조회 응답
/// Deposit status response
#[derive(Debug, Serialize)]
pub struct DepositStatusResponse {
    pub reference: String,
    pub status: TransactionStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}
