use crate::shared::database::{Database, UserRepository, WalletRepository};
use crate::shared::utils::WalletNumberGenerator;
use crate::domains::auth::models::{User, UserProfileResponse, UserWithWallet};
use crate::shared::errors::AuthError;

/// 지갑 번호 충돌 시 최대 재시도 횟수
const WALLET_NUMBER_ATTEMPTS: usize = 5;

// 사용자 서비스
// UserService: user lookup and first-login provisioning
#[derive(Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 이메일로 사용자 조회, 없으면 사용자 + 지갑을 원자적으로 생성
    /// Return the user for `email`, creating it together with its wallet if absent
    pub async fn find_or_create(&self, email: &str, name: &str) -> Result<UserWithWallet, AuthError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AuthError::InvalidInput("Email must not be empty".to_string()));
        }

        let user_repo = UserRepository::new(self.db.pool().clone());

        for attempt in 1..=WALLET_NUMBER_ATTEMPTS {
            if let Some(user) = user_repo
                .get_user_by_email(&email)
                .await
                .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch user: {:#}", e)))?
            {
                return self.load_with_wallet(user).await;
            }

            match self.create_with_wallet(&email, name).await {
                Ok(created) => {
                    tracing::info!(user_id = created.user.id, wallet_number = %created.wallet.wallet_number, "User provisioned");
                    return Ok(created);
                }
                // 지갑 번호 충돌 또는 동시 가입: 롤백 후 처음부터 다시
                Err(e) if is_unique_violation(&e) => {
                    tracing::warn!(attempt, error = %e, "Unique collision while provisioning user, retrying");
                }
                Err(e) => {
                    return Err(AuthError::DatabaseError(format!("Failed to create user: {:#}", e)));
                }
            }
        }

        Err(AuthError::Internal(format!(
            "Could not allocate a unique wallet number after {} attempts",
            WALLET_NUMBER_ATTEMPTS
        )))
    }

    /// 내 정보 조회
    /// Current user profile
    pub async fn get_profile(&self, user_id: u64) -> Result<UserProfileResponse, AuthError> {
        let user_repo = UserRepository::new(self.db.pool().clone());

        let profile = user_repo
            .get_user_with_wallet(user_id)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch user: {:#}", e)))?
            .ok_or(AuthError::UserNotFound { id: user_id })?;

        Ok(profile.into())
    }

    async fn create_with_wallet(&self, email: &str, name: &str) -> anyhow::Result<UserWithWallet> {
        let mut tx = self.db.begin().await?;

        let user = UserRepository::create_user(&mut tx, email, name).await?;
        let wallet = WalletRepository::create(&mut tx, user.id, &WalletNumberGenerator::next()).await?;

        tx.commit().await?;
        Ok(UserWithWallet { user, wallet })
    }

    async fn load_with_wallet(&self, user: User) -> Result<UserWithWallet, AuthError> {
        let user_repo = UserRepository::new(self.db.pool().clone());

        user_repo
            .get_user_with_wallet(user.id)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch wallet: {:#}", e)))?
            .ok_or(AuthError::WalletMissing { user_id: user.id })
    }
}

/// UNIQUE 제약 위반 여부 (PostgreSQL 23505)
fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<sqlx::Error>(),
            Some(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505")
        )
    })
}
