use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;

/// 애플리케이션 설정
/// Application configuration, loaded once at startup
///
/// 환경 변수(.env 포함)에서 읽어오며, 시작 이후에는 환경 변수를 다시 읽지 않음
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub port: u16,
    pub cors_origin: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub paystack: PaystackConfig,
    pub api_keys: ApiKeyPolicy,
    pub min_deposit_amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// 작업 단위(트랜잭션) 내 개별 SQL 문장 타임아웃
    /// Statement timeout applied inside every unit of work
    pub statement_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct PaystackConfig {
    pub secret_key: String,
    pub base_url: String,
}

/// API 키 발급 정책
/// Issuance policy for API keys
#[derive(Debug, Clone, Copy)]
pub struct ApiKeyPolicy {
    pub min_expiry_hours: i64,
    pub max_expiry_hours: i64,
    pub max_active_keys: i64,
}

/// 만료 상한의 최대 허용값 (10년)
const EXPIRY_HOURS_CEILING: i64 = 10 * 366 * 24;

impl ApiKeyPolicy {
    /// 정책 값 검증: 1 <= min <= max <= 10년, 활성 키 최소 1개
    /// Reject policies that would make expiry arithmetic overflow or issuance impossible
    pub fn validate(&self) -> Result<()> {
        if self.min_expiry_hours < 1 {
            bail!("API_KEY_MIN_EXPIRY_HOURS must be at least 1, got {}", self.min_expiry_hours);
        }
        if self.max_expiry_hours > EXPIRY_HOURS_CEILING {
            bail!(
                "API_KEY_MAX_EXPIRY_HOURS must be at most {}, got {}",
                EXPIRY_HOURS_CEILING,
                self.max_expiry_hours
            );
        }
        if self.min_expiry_hours > self.max_expiry_hours {
            bail!(
                "API_KEY_MIN_EXPIRY_HOURS ({}) exceeds API_KEY_MAX_EXPIRY_HOURS ({})",
                self.min_expiry_hours,
                self.max_expiry_hours
            );
        }
        if self.max_active_keys < 1 {
            bail!("API_KEY_MAX_ACTIVE must be at least 1, got {}", self.max_active_keys);
        }
        Ok(())
    }
}

impl Default for ApiKeyPolicy {
    fn default() -> Self {
        Self {
            min_expiry_hours: 1,
            max_expiry_hours: 366 * 24,
            max_active_keys: 5,
        }
    }
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    /// Load configuration from the process environment (and `.env` if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = ApiKeyPolicy::default();
        let api_keys = ApiKeyPolicy {
            min_expiry_hours: optional("API_KEY_MIN_EXPIRY_HOURS", defaults.min_expiry_hours)?,
            max_expiry_hours: optional("API_KEY_MAX_EXPIRY_HOURS", defaults.max_expiry_hours)?,
            max_active_keys: optional("API_KEY_MAX_ACTIVE", defaults.max_active_keys)?,
        };
        api_keys.validate()?;

        Ok(Self {
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: optional("DB_MAX_CONNECTIONS", 10)?,
                acquire_timeout: Duration::from_secs(optional("DB_ACQUIRE_TIMEOUT_SECS", 5)?),
                statement_timeout: Duration::from_millis(optional("DB_STATEMENT_TIMEOUT_MS", 5000)?),
            },
            port: optional("PORT", 3000)?,
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|v| !v.is_empty()),
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration_hours: optional("JWT_EXPIRATION_HOURS", 24)?,
            paystack: PaystackConfig {
                secret_key: required("PAYSTACK_SECRET_KEY")?,
                base_url: std::env::var("PAYSTACK_BASE_URL")
                    .unwrap_or_else(|_| "https://api.paystack.co".to_string()),
            },
            api_keys,
            min_deposit_amount: optional("MIN_DEPOSIT_AMOUNT", Decimal::new(100, 0))?,
        })
    }
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{} must be set", key))
}

fn optional<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {} ({})", key, raw, e)),
        Err(_) => Ok(default),
    }
}
