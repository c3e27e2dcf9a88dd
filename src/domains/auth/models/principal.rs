use serde::Serialize;
use uuid::Uuid;
use crate::domains::auth::models::{Permission, PermissionSet};
use crate::domains::wallet::models::Wallet;
use crate::shared::errors::AuthError;

/// 인증 수단
/// How the caller authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CredentialKind {
    Bearer,
    ApiKey { key_id: Uuid },
}

/// 인증된 호출자 (Bearer 또는 API 키를 하나의 형태로 정규화)
/// Authenticated caller, normalized across bearer tokens and API keys
///
/// 원장(Ledger) 코드는 인증 수단을 구분하지 않고 이 구조만 사용함
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: u64,
    pub email: String,
    pub wallet: Wallet,
    pub permissions: PermissionSet,
    pub credential: CredentialKind,
}

impl Principal {
    /// Bearer 토큰 주체 (모든 권한)
    pub fn bearer(user_id: u64, email: String, wallet: Wallet) -> Self {
        Self {
            user_id,
            email,
            wallet,
            permissions: PermissionSet::all(),
            credential: CredentialKind::Bearer,
        }
    }

    /// API 키 주체 (키에 명시된 권한만)
    pub fn api_key(
        user_id: u64,
        email: String,
        wallet: Wallet,
        key_id: Uuid,
        permissions: PermissionSet,
    ) -> Self {
        Self {
            user_id,
            email,
            wallet,
            permissions,
            credential: CredentialKind::ApiKey { key_id },
        }
    }

    /// 권한 확인
    /// Fails with `Forbidden` when the capability is missing
    pub fn require(&self, permission: Permission) -> Result<(), AuthError> {
        if self.permissions.contains(permission) {
            Ok(())
        } else {
            Err(AuthError::MissingPermission { permission })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn wallet() -> Wallet {
        Wallet {
            id: 7,
            user_id: 3,
            wallet_number: "4821937465".to_string(),
            balance: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_bearer_principal_is_unrestricted() {
        let principal = Principal::bearer(3, "a@example.com".to_string(), wallet());
        for permission in Permission::ALL {
            assert!(principal.require(permission).is_ok());
        }
    }

    #[test]
    fn test_api_key_principal_limited_to_key_permissions() {
        let principal = Principal::api_key(
            3,
            "a@example.com".to_string(),
            wallet(),
            Uuid::new_v4(),
            PermissionSet::new([Permission::Read]),
        );
        assert!(principal.require(Permission::Read).is_ok());
        assert!(matches!(
            principal.require(Permission::Transfer),
            Err(AuthError::MissingPermission { permission: Permission::Transfer })
        ));
    }
}
