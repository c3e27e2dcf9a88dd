use serde::Serialize;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use crate::domains::wallet::models::Wallet;

/// 사용자 모델 (DB)
/// User model
#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 사용자 + 지갑 (즉시 로딩)
/// User with its wallet eagerly attached
#[derive(Debug, Clone)]
pub struct UserWithWallet {
    pub user: User,
    pub wallet: Wallet,
}

/// 내 정보 응답
/// Current user profile response
#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub wallet: WalletSummary,
}

#[derive(Debug, Serialize)]
pub struct WalletSummary {
    pub wallet_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl From<UserWithWallet> for UserProfileResponse {
    fn from(value: UserWithWallet) -> Self {
        Self {
            id: value.user.id,
            email: value.user.email,
            name: value.user.name,
            wallet: WalletSummary {
                wallet_number: value.wallet.wallet_number,
                balance: value.wallet.balance,
            },
        }
    }
}
