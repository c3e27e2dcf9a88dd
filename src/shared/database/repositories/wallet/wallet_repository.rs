use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use crate::domains::wallet::models::Wallet;

/// 지갑 Repository
/// Wallet table access. Balance mutations only happen inside a unit of work.
pub struct WalletRepository {
    pool: PgPool,
}

impl WalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 사용자 ID로 지갑 조회
    /// Get wallet by owner
    pub async fn get_by_user_id(&self, user_id: u64) -> Result<Option<Wallet>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, wallet_number, balance, created_at, updated_at
            FROM wallets
            WHERE user_id = $1
            "#,
        )
        .bind(user_id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch wallet by user id")?;

        Ok(row.as_ref().map(map_wallet))
    }

    /// 지갑 생성 (트랜잭션 내부, 사용자 생성과 함께)
    /// Create a wallet inside the unit of work that creates its owner
    pub async fn create(conn: &mut PgConnection, user_id: u64, wallet_number: &str) -> Result<Wallet> {
        let row = sqlx::query(
            r#"
            INSERT INTO wallets (user_id, wallet_number, balance, created_at, updated_at)
            VALUES ($1, $2, 0, NOW(), NOW())
            RETURNING id, user_id, wallet_number, balance, created_at, updated_at
            "#,
        )
        .bind(user_id as i64)
        .bind(wallet_number)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to create wallet")?;

        Ok(map_wallet(&row))
    }

    /// 지갑 번호로 ID 조회 (잠금 없음)
    /// Resolve a wallet number to its id without locking
    pub async fn find_id_by_number(conn: &mut PgConnection, wallet_number: &str) -> Result<Option<u64>> {
        let row = sqlx::query(
            r#"
            SELECT id FROM wallets WHERE wallet_number = $1
            "#,
        )
        .bind(wallet_number)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to resolve wallet number")?;

        Ok(row.map(|r| r.get::<i64, _>("id") as u64))
    }

    /// 여러 지갑을 ID 오름차순으로 배타 잠금
    /// Lock wallets exclusively, always in ascending id order
    ///
    /// 모든 송금이 같은 순서로 잠금을 획득하므로 교착 상태가 발생하지 않음
    pub async fn lock_many(conn: &mut PgConnection, ids: &[u64]) -> Result<Vec<Wallet>> {
        let ids: Vec<i64> = ids.iter().map(|id| *id as i64).collect();

        let rows = sqlx::query(
            r#"
            SELECT id, user_id, wallet_number, balance, created_at, updated_at
            FROM wallets
            WHERE id = ANY($1)
            ORDER BY id ASC
            FOR UPDATE
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to lock wallets")?;

        Ok(rows.iter().map(map_wallet).collect())
    }

    /// 잔액 증감 (트랜잭션 내부)
    /// Apply a signed balance delta inside the unit of work
    pub async fn apply_delta(conn: &mut PgConnection, wallet_id: u64, delta: Decimal) -> Result<Decimal> {
        let row = sqlx::query(
            r#"
            UPDATE wallets
            SET balance = balance + $1, updated_at = NOW()
            WHERE id = $2
            RETURNING balance
            "#,
        )
        .bind(delta)
        .bind(wallet_id as i64)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to update wallet balance")?;

        Ok(row.get("balance"))
    }

    /// JOIN 결과에서 지갑 매핑 (users JOIN wallets)
    pub(crate) fn map_joined(row: &PgRow, user_id: u64) -> Wallet {
        Wallet {
            id: row.get::<i64, _>("wallet_id") as u64,
            user_id,
            wallet_number: row.get("wallet_number"),
            balance: row.get("balance"),
            created_at: row.get("wallet_created_at"),
            updated_at: row.get("wallet_updated_at"),
        }
    }
}

fn map_wallet(row: &PgRow) -> Wallet {
    Wallet {
        id: row.get::<i64, _>("id") as u64,
        user_id: row.get::<i64, _>("user_id") as u64,
        wallet_number: row.get("wallet_number"),
        balance: row.get("balance"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
