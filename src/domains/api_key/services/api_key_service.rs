use chrono::Utc;
use uuid::Uuid;
use crate::domains::api_key::models::{
    ApiKeyCreate, CreateApiKeyRequest, IssuedApiKey, RevokeApiKeyResponse,
    RolloverApiKeyRequest, ValidatedKey,
};
use crate::domains::api_key::services::key_material::{generate_key, hash_key, lookup_prefix, verify_key};
use crate::domains::auth::models::PermissionSet;
use crate::shared::config::ApiKeyPolicy;
use crate::shared::database::{ApiKeyRepository, Database, UserRepository};
use crate::shared::errors::ApiKeyError;
use sqlx::PgConnection;

// API 키 서비스 (Credential Store)
// Issues, rolls over, revokes and validates API keys
#[derive(Clone)]
pub struct ApiKeyService {
    db: Database,
    policy: ApiKeyPolicy,
}

impl ApiKeyService {
    pub fn new(db: Database, policy: ApiKeyPolicy) -> Self {
        Self { db, policy }
    }

    /// API 키 발급
    /// Issue a new key. The raw secret is returned once and never stored.
    pub async fn issue(
        &self,
        user_id: u64,
        request: CreateApiKeyRequest,
    ) -> Result<IssuedApiKey, ApiKeyError> {
        // 1. 입력 검증
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiKeyError::InvalidInput("Key name must not be empty".to_string()));
        }
        let permissions = PermissionSet::new(request.permissions);
        if permissions.is_empty() {
            return Err(ApiKeyError::InvalidInput(
                "At least one permission is required".to_string(),
            ));
        }
        let expires_at = request.expiry.resolve(Utc::now(), &self.policy)?;

        // 해싱은 잠금 획득 전에 수행
        let key = generate_key();
        let key_hash = hash_key(&key.raw)?;

        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|e| ApiKeyError::DatabaseError(format!("Failed to begin transaction: {:#}", e)))?;

        // 2. 사용자 행 잠금 후 활성 키 개수 확인
        Self::lock_owner(&mut tx, user_id).await?;
        self.check_active_limit(&mut tx, user_id).await?;

        // 3. 키 생성 및 저장
        let issued = Self::store_new_key(
            &mut tx,
            ApiKeyCreate {
                user_id,
                key_prefix: key.prefix,
                key_hash,
                name,
                permissions,
                expires_at,
            },
            key.raw,
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| ApiKeyError::DatabaseError(format!("Failed to commit api key: {:#}", e)))?;

        tracing::info!(user_id, key_id = %issued.id, "API key issued");
        Ok(issued)
    }

    /// 만료된 키 교체 (이름/권한 상속, 이전 키 폐기)
    /// Replace an expired key with a new one inheriting its name and permissions
    pub async fn rollover(
        &self,
        user_id: u64,
        request: RolloverApiKeyRequest,
    ) -> Result<IssuedApiKey, ApiKeyError> {
        let expires_at = request.expiry.resolve(Utc::now(), &self.policy)?;
        let key = generate_key();
        let key_hash = hash_key(&key.raw)?;

        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|e| ApiKeyError::DatabaseError(format!("Failed to begin transaction: {:#}", e)))?;

        Self::lock_owner(&mut tx, user_id).await?;

        let old_key = ApiKeyRepository::find_owned_for_update(&mut tx, request.expired_key_id, user_id)
            .await
            .map_err(|e| ApiKeyError::DatabaseError(format!("Failed to fetch api key: {:#}", e)))?
            .ok_or(ApiKeyError::NotFound { id: request.expired_key_id })?;

        // 이미 롤오버되었거나 소유자가 폐기한 키는 다시 살릴 수 없음
        if old_key.revoked {
            return Err(ApiKeyError::AlreadyRevoked { id: old_key.id });
        }
        if old_key.expires_at > Utc::now() {
            return Err(ApiKeyError::NotYetExpired { expires_at: old_key.expires_at });
        }
        self.check_active_limit(&mut tx, user_id).await?;

        let issued = Self::store_new_key(
            &mut tx,
            ApiKeyCreate {
                user_id,
                key_prefix: key.prefix,
                key_hash,
                name: old_key.name.clone(),
                permissions: old_key.permissions.clone(),
                expires_at,
            },
            key.raw,
        )
        .await?;

        ApiKeyRepository::revoke(&mut tx, old_key.id)
            .await
            .map_err(|e| ApiKeyError::DatabaseError(format!("Failed to revoke old api key: {:#}", e)))?;

        tx.commit()
            .await
            .map_err(|e| ApiKeyError::DatabaseError(format!("Failed to commit rollover: {:#}", e)))?;

        tracing::info!(user_id, old_key_id = %old_key.id, new_key_id = %issued.id, "API key rolled over");
        Ok(issued)
    }

    /// API 키 폐기 (멱등)
    /// Revoke a key owned by the caller. Revoking twice is not an error.
    pub async fn revoke(&self, user_id: u64, key_id: Uuid) -> Result<RevokeApiKeyResponse, ApiKeyError> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|e| ApiKeyError::DatabaseError(format!("Failed to begin transaction: {:#}", e)))?;

        let key = ApiKeyRepository::find_owned_for_update(&mut tx, key_id, user_id)
            .await
            .map_err(|e| ApiKeyError::DatabaseError(format!("Failed to fetch api key: {:#}", e)))?
            .ok_or(ApiKeyError::NotFound { id: key_id })?;

        if !key.revoked {
            ApiKeyRepository::revoke(&mut tx, key.id)
                .await
                .map_err(|e| ApiKeyError::DatabaseError(format!("Failed to revoke api key: {:#}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| ApiKeyError::DatabaseError(format!("Failed to commit revoke: {:#}", e)))?;

        tracing::info!(user_id, key_id = %key.id, "API key revoked");
        Ok(RevokeApiKeyResponse {
            message: format!("API key '{}' has been successfully revoked.", key.name),
        })
    }

    /// 제시된 키 검증
    /// Resolve a presented key to its owner and permissions, or `None`
    pub async fn validate(&self, candidate: &str) -> Result<Option<ValidatedKey>, ApiKeyError> {
        let Some(prefix) = lookup_prefix(candidate) else {
            return Ok(None);
        };

        let repo = ApiKeyRepository::new(self.db.pool().clone());
        let candidates = repo
            .find_active_by_prefix(prefix)
            .await
            .map_err(|e| ApiKeyError::DatabaseError(format!("Failed to load api keys: {:#}", e)))?;

        let now = Utc::now();
        Ok(candidates
            .into_iter()
            .filter(|key| key.is_active_at(now))
            .find(|key| verify_key(candidate, &key.key_hash))
            .map(|key| ValidatedKey {
                key_id: key.id,
                user_id: key.user_id,
                permissions: key.permissions,
            }))
    }

    /// 소유자 행 잠금: 동시 발급이 개수 제한을 넘지 못하도록 직렬화
    async fn lock_owner(conn: &mut PgConnection, user_id: u64) -> Result<(), ApiKeyError> {
        let exists = UserRepository::lock_user(conn, user_id)
            .await
            .map_err(|e| ApiKeyError::DatabaseError(format!("Failed to lock user: {:#}", e)))?;
        if !exists {
            return Err(ApiKeyError::InvalidInput(format!("User {} does not exist", user_id)));
        }
        Ok(())
    }

    async fn check_active_limit(&self, conn: &mut PgConnection, user_id: u64) -> Result<(), ApiKeyError> {
        let active = ApiKeyRepository::count_active_for_user(conn, user_id)
            .await
            .map_err(|e| ApiKeyError::DatabaseError(format!("Failed to count api keys: {:#}", e)))?;

        if active >= self.policy.max_active_keys {
            return Err(ApiKeyError::LimitExceeded { limit: self.policy.max_active_keys });
        }
        Ok(())
    }

    async fn store_new_key(
        conn: &mut PgConnection,
        data: ApiKeyCreate,
        raw_key: String,
    ) -> Result<IssuedApiKey, ApiKeyError> {
        let stored = ApiKeyRepository::create(conn, &data)
            .await
            .map_err(|e| ApiKeyError::DatabaseError(format!("Failed to store api key: {:#}", e)))?;

        Ok(IssuedApiKey {
            id: stored.id,
            api_key: raw_key,
            expires_at: stored.expires_at,
        })
    }
}
