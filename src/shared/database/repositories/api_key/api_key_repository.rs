use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use anyhow::{Context, Result};
use uuid::Uuid;
use crate::domains::api_key::models::{ApiKey, ApiKeyCreate};
use crate::domains::auth::models::PermissionSet;

/// API 키 Repository
/// API key table access (hash-only storage)
pub struct ApiKeyRepository {
    pool: PgPool,
}

const API_KEY_COLUMNS: &str =
    "id, user_id, key_prefix, key_hash, name, permissions, expires_at, revoked, created_at, updated_at";

impl ApiKeyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 사용자의 활성 키 개수 (폐기되지 않았고 만료되지 않음)
    /// Count active keys for a user
    pub async fn count_active_for_user(conn: &mut PgConnection, user_id: u64) -> Result<i64> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM api_keys
            WHERE user_id = $1 AND revoked = FALSE AND expires_at > NOW()
            "#,
        )
        .bind(user_id as i64)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to count active api keys")?;

        Ok(row.get("count"))
    }

    /// API 키 저장
    /// Insert a new key
    pub async fn create(conn: &mut PgConnection, data: &ApiKeyCreate) -> Result<ApiKey> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO api_keys (id, user_id, key_prefix, key_hash, name, permissions, expires_at, revoked, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, NOW(), NOW())
            RETURNING {}
            "#,
            API_KEY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(data.user_id as i64)
        .bind(&data.key_prefix)
        .bind(&data.key_hash)
        .bind(&data.name)
        .bind(data.permissions.to_stored())
        .bind(data.expires_at)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to create api key")?;

        Ok(map_api_key(&row))
    }

    /// 소유자 확인 후 키 조회 (행 잠금)
    /// Find a key owned by the user, locking it for the unit of work
    pub async fn find_owned_for_update(
        conn: &mut PgConnection,
        id: Uuid,
        user_id: u64,
    ) -> Result<Option<ApiKey>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM api_keys
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#,
            API_KEY_COLUMNS
        ))
        .bind(id)
        .bind(user_id as i64)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to fetch api key")?;

        Ok(row.as_ref().map(map_api_key))
    }

    /// 키 폐기 (멱등)
    /// Flip the revoked flag (idempotent)
    pub async fn revoke(conn: &mut PgConnection, id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE api_keys
            SET revoked = TRUE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("Failed to revoke api key")?;

        Ok(())
    }

    /// 접두사가 일치하는 활성 키 목록 (시점 스냅샷, 잠금 없음)
    /// Point-in-time snapshot of active keys sharing a lookup prefix
    pub async fn find_active_by_prefix(&self, key_prefix: &str) -> Result<Vec<ApiKey>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM api_keys
            WHERE key_prefix = $1 AND revoked = FALSE AND expires_at > NOW()
            "#,
            API_KEY_COLUMNS
        ))
        .bind(key_prefix)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch active api keys")?;

        Ok(rows.iter().map(map_api_key).collect())
    }
}

fn map_api_key(row: &PgRow) -> ApiKey {
    let permissions: Vec<String> = row.get("permissions");

    ApiKey {
        id: row.get("id"),
        user_id: row.get::<i64, _>("user_id") as u64,
        key_prefix: row.get("key_prefix"),
        key_hash: row.get("key_hash"),
        name: row.get("name"),
        permissions: PermissionSet::from_stored(&permissions),
        expires_at: row.get("expires_at"),
        revoked: row.get("revoked"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
