use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use anyhow::{Context, Result};
use crate::domains::auth::models::{User, UserWithWallet};
use crate::shared::database::WalletRepository;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 이메일로 사용자 조회
    // Get user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by email")?;

        Ok(row.as_ref().map(map_user))
    }

    // ID로 사용자 조회
    // Get user by ID
    pub async fn get_user_by_id(&self, id: u64) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by id")?;

        Ok(row.as_ref().map(map_user))
    }

    /// 사용자 + 지갑 조회 (JOIN, 즉시 로딩)
    /// Get user with wallet eagerly attached
    pub async fn get_user_with_wallet(&self, id: u64) -> Result<Option<UserWithWallet>> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.email, u.name, u.created_at, u.updated_at,
                   w.id AS wallet_id, w.wallet_number, w.balance,
                   w.created_at AS wallet_created_at, w.updated_at AS wallet_updated_at
            FROM users u
            JOIN wallets w ON w.user_id = u.id
            WHERE u.id = $1
            "#,
        )
        .bind(id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user with wallet")?;

        Ok(row.map(|row| map_user_with_wallet(&row)))
    }

    /// 사용자 생성 (트랜잭션 내부)
    /// Insert a user inside an open unit of work
    pub async fn create_user(conn: &mut PgConnection, email: &str, name: &str) -> Result<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (email, name, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            RETURNING id, email, name, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(name)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to create user")?;

        Ok(map_user(&row))
    }

    /// 사용자 행 잠금 (SELECT ... FOR UPDATE)
    /// Lock the user row; returns false when the user does not exist
    pub async fn lock_user(conn: &mut PgConnection, id: u64) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT id FROM users WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(id as i64)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to lock user row")?;

        Ok(row.is_some())
    }
}

fn map_user(row: &PgRow) -> User {
    User {
        id: row.get::<i64, _>("id") as u64,
        email: row.get("email"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_user_with_wallet(row: &PgRow) -> UserWithWallet {
    let user = map_user(row);
    let wallet = WalletRepository::map_joined(row, user.id);
    UserWithWallet { user, wallet }
}
