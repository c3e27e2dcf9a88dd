use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use anyhow::{anyhow, Context, Result};
use crate::domains::wallet::models::{Transaction, TransactionCreate, TransactionStatus, TransactionType};

/// 거래 Repository
/// Transaction log access (append-only; only status of pending rows changes)
pub struct TransactionRepository {
    pool: PgPool,
}

const TRANSACTION_COLUMNS: &str =
    "id, wallet_id, type, amount, status, reference, description, created_at, updated_at";

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 거래 생성 (풀 사용, 대기 상태 입금용)
    /// Insert a transaction outside any unit of work
    pub async fn create(&self, data: &TransactionCreate) -> Result<Transaction> {
        let mut conn = self.pool.acquire().await.context("Failed to acquire connection")?;
        Self::insert(&mut conn, data).await
    }

    /// 거래 생성 (트랜잭션 내부)
    /// Insert a transaction inside the unit of work
    pub async fn insert(conn: &mut PgConnection, data: &TransactionCreate) -> Result<Transaction> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO transactions (wallet_id, type, amount, status, reference, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING {}
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(data.wallet_id as i64)
        .bind(data.tx_type.as_str())
        .bind(data.amount)
        .bind(data.status.as_str())
        .bind(data.reference.as_deref())
        .bind(&data.description)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to create transaction")?;

        map_transaction(&row)
    }

    /// 참조값으로 거래 조회 + 행 잠금
    /// Find by reference and lock the row for the rest of the unit of work
    pub async fn find_by_reference_for_update(
        conn: &mut PgConnection,
        reference: &str,
    ) -> Result<Option<Transaction>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM transactions
            WHERE reference = $1
            FOR UPDATE
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(reference)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to fetch transaction by reference")?;

        row.as_ref().map(map_transaction).transpose()
    }

    /// 대기 중 거래의 상태 변경 (pending -> success | failed)
    /// Transition a pending transaction; returns false if it was not pending
    pub async fn settle_pending(
        conn: &mut PgConnection,
        id: u64,
        status: TransactionStatus,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND status = 'pending'
            "#,
        )
        .bind(status.as_str())
        .bind(id as i64)
        .execute(&mut *conn)
        .await
        .context("Failed to update transaction status")?;

        Ok(result.rows_affected() == 1)
    }

    /// 지갑의 거래 내역 (최신순)
    /// Wallet history, newest first
    pub async fn list_by_wallet(&self, wallet_id: u64) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM transactions
            WHERE wallet_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(wallet_id as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch wallet transactions")?;

        rows.iter().map(map_transaction).collect()
    }

    /// 지갑 소유의 입금 거래 조회
    /// Deposit owned by the wallet, by reference
    pub async fn find_deposit(&self, wallet_id: u64, reference: &str) -> Result<Option<Transaction>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM transactions
            WHERE reference = $1 AND wallet_id = $2 AND type = 'deposit'
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(reference)
        .bind(wallet_id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch deposit transaction")?;

        row.as_ref().map(map_transaction).transpose()
    }

    /// 대기 중 거래를 실패로 종료 (게이트웨이 초기화 실패 시)
    /// Mark a pending transaction failed outside a unit of work
    pub async fn mark_failed(&self, id: u64) -> Result<bool> {
        let mut conn = self.pool.acquire().await.context("Failed to acquire connection")?;
        Self::settle_pending(&mut conn, id, TransactionStatus::Failed).await
    }
}

fn map_transaction(row: &PgRow) -> Result<Transaction> {
    let tx_type: String = row.get("type");
    let status: String = row.get("status");

    Ok(Transaction {
        id: row.get::<i64, _>("id") as u64,
        wallet_id: row.get::<i64, _>("wallet_id") as u64,
        tx_type: tx_type.parse::<TransactionType>().map_err(|e| anyhow!(e))?,
        amount: row.get("amount"),
        status: status.parse::<TransactionStatus>().map_err(|e| anyhow!(e))?,
        reference: row.get("reference"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
