use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use anyhow::{Context, Result};
use std::time::Duration;
use crate::shared::config::DatabaseConfig;

// 데이터베이스 연결 풀
// Database connection pool for PostgreSQL
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    statement_timeout: Duration,
}

impl Database {
    // 데이터베이스 연결 생성
    // Create database connection
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await
            .context("Failed to connect to database")?;

        Ok(Self {
            pool,
            statement_timeout: config.statement_timeout,
        })
    }

    /// 기존 풀로 Database 생성 (테스트용)
    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool, statement_timeout: Duration) -> Self {
        Self { pool, statement_timeout }
    }

    // 연결 풀 반환
    // Get connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // 테이블 생성 (초기화) - 마이그레이션 실행
    // Create tables (initialization) - Run migrations
    pub async fn initialize(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(self.pool())
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database migrations completed successfully");
        Ok(())
    }

    /// 원자적 작업 단위 시작
    /// Begin an atomic unit of work
    ///
    /// 트랜잭션 안의 모든 문장에 statement_timeout이 적용됨.
    /// 타임아웃이나 에러로 커밋 전에 drop되면 전체가 롤백됨.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        // SET LOCAL은 바인드 파라미터를 받지 않으므로 정수 밀리초를 직접 포맷
        let timeout_ms = self.statement_timeout.as_millis().max(1);
        sqlx::query(&format!("SET LOCAL statement_timeout = {}", timeout_ms))
            .execute(&mut *tx)
            .await
            .context("Failed to set statement timeout")?;

        Ok(tx)
    }

    /// 연결 상태 확인
    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .context("Database ping failed")?;
        Ok(())
    }
}
