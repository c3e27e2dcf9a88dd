// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 모든 통합 테스트에서 공통으로 사용하는 셋업 함수 제공
//
// TEST_DATABASE_URL 이 없으면 setup()이 None을 반환하고
// DB 테스트는 바로 종료됨
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let Some(ctx) = setup().await else { return };
//     // 테스트 코드...
// }
// ```
// =====================================================
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use wallet_server::domains::auth::models::{Principal, UserWithWallet};
use wallet_server::domains::wallet::models::DepositSession;
use wallet_server::shared::clients::{sign_payload, verify_payload_signature, PaymentGateway};
use wallet_server::shared::errors::GatewayError;
use wallet_server::shared::config::{ApiKeyPolicy, AppConfig, DatabaseConfig, PaystackConfig};
use wallet_server::shared::database::Database;
use wallet_server::shared::services::AppState;

// 테스트용 상수
pub const JWT_SECRET: &str = "test-jwt-secret";
pub const WEBHOOK_SECRET: &str = "sk_test_paystack_secret";

/// 결제 게이트웨이 스텁
/// Records initialized references instead of calling Paystack
#[derive(Default)]
pub struct StubGateway {
    pub reject: AtomicBool,
    pub unavailable: AtomicBool,
    pub initialized: Mutex<Vec<(String, Decimal)>>,
}

impl StubGateway {
    /// 명시적 거절 (세션 미생성)
    pub fn reject_next_calls(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    /// 타임아웃/응답 유실 (세션 생성 여부 불명)
    pub fn time_out_next_calls(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn references(&self) -> Vec<String> {
        self.initialized.lock().unwrap().iter().map(|(r, _)| r.clone()).collect()
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn initialize_transaction(
        &self,
        _email: &str,
        amount: Decimal,
        reference: &str,
    ) -> Result<DepositSession, GatewayError> {
        self.initialized.lock().unwrap().push((reference.to_string(), amount));

        if self.reject.load(Ordering::SeqCst) {
            return Err(GatewayError::Rejected("Invalid key".to_string()));
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("operation timed out".to_string()));
        }

        Ok(DepositSession {
            authorization_url: format!("https://checkout.test/{}", reference),
            access_code: format!("access_{}", reference),
            reference: reference.to_string(),
        })
    }

    fn verify_signature(&self, signature: &str, body: &[u8]) -> bool {
        verify_payload_signature(WEBHOOK_SECRET, signature, body)
    }
}

pub struct TestContext {
    pub db: Database,
    pub state: AppState,
    pub gateway: Arc<StubGateway>,
}

pub fn test_config(database_url: &str) -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 20,
            acquire_timeout: Duration::from_secs(10),
            statement_timeout: Duration::from_secs(5),
        },
        port: 0,
        cors_origin: None,
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration_hours: 1,
        paystack: PaystackConfig {
            secret_key: WEBHOOK_SECRET.to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
        },
        api_keys: ApiKeyPolicy::default(),
        min_deposit_amount: Decimal::new(100, 0),
    }
}

/// 테스트 전 초기화
///
/// 데이터베이스 연결, 마이그레이션, AppState 생성을 순차적으로 수행합니다.
pub async fn setup() -> Option<TestContext> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping database test");
        return None;
    };

    let config = test_config(&database_url);

    // 1. 데이터베이스 연결
    let db = Database::new(&config.database)
        .await
        .expect("Failed to connect to database");

    // 2. 마이그레이션 실행
    db.initialize().await.expect("Failed to initialize database");

    // 3. AppState 생성 (스텁 게이트웨이 주입)
    let gateway = Arc::new(StubGateway::default());
    let state = AppState::new(db.clone(), &config, gateway.clone());

    Some(TestContext { db, state, gateway })
}

impl TestContext {
    /// 고유 이메일로 사용자 + 지갑 생성
    pub async fn create_user(&self) -> UserWithWallet {
        let email = format!("user_{}@example.com", Uuid::new_v4().simple());
        self.state
            .auth_state
            .user_service
            .find_or_create(&email, "Test User")
            .await
            .expect("Failed to create user")
    }

    pub fn bearer_for(&self, user: &UserWithWallet) -> String {
        self.state
            .auth_state
            .jwt_service
            .generate_access_token(user.user.id, user.user.email.clone())
            .expect("Failed to generate token")
    }

    pub async fn principal_for(&self, user: &UserWithWallet) -> Principal {
        self.state
            .auth_state
            .access_gate
            .resolve_bearer(&self.bearer_for(user))
            .await
            .expect("Failed to resolve principal")
    }

    /// 테스트용 잔액 직접 설정
    pub async fn set_balance(&self, wallet_id: u64, balance: Decimal) {
        sqlx::query("UPDATE wallets SET balance = $1 WHERE id = $2")
            .bind(balance)
            .bind(wallet_id as i64)
            .execute(self.db.pool())
            .await
            .expect("Failed to set balance");
    }

    pub async fn balance_of(&self, wallet_id: u64) -> Decimal {
        use sqlx::Row;
        sqlx::query("SELECT balance FROM wallets WHERE id = $1")
            .bind(wallet_id as i64)
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to read balance")
            .get("balance")
    }

    /// API 키 만료 시각을 과거로 이동
    pub async fn expire_key(&self, key_id: Uuid) {
        sqlx::query("UPDATE api_keys SET expires_at = NOW() - INTERVAL '1 minute' WHERE id = $1")
            .bind(key_id)
            .execute(self.db.pool())
            .await
            .expect("Failed to expire key");
    }

    pub async fn transaction_status(&self, reference: &str) -> String {
        use sqlx::Row;
        sqlx::query("SELECT status FROM transactions WHERE reference = $1")
            .bind(reference)
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to read transaction")
            .get("status")
    }
}

/// charge.success 웹훅 본문
pub fn charge_success_body(reference: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "event": "charge.success",
        "data": { "reference": reference, "status": "success" }
    }))
    .unwrap()
}

pub fn sign(body: &[u8]) -> String {
    sign_payload(WEBHOOK_SECRET, body)
}
