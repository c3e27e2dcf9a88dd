use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Months, Utc};
use uuid::Uuid;
use crate::domains::auth::models::{Permission, PermissionSet};
use crate::shared::config::ApiKeyPolicy;
use crate::shared::errors::ApiKeyError;

/// API 키 모델 (DB 저장용)
/// API key record. Only the hash of the secret is ever stored.
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub id: Uuid,
    pub user_id: u64,
    /// 조회용 비밀 아님 접두사 (8 hex)
    /// Non-secret lookup prefix embedded in the raw key
    pub key_prefix: String,
    pub key_hash: String,
    pub name: String,
    pub permissions: PermissionSet,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApiKey {
    /// 활성 키: 폐기되지 않았고 만료되지 않음
    /// Active means neither revoked nor past its expiry
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

/// API 키 생성 데이터
#[derive(Debug)]
pub struct ApiKeyCreate {
    pub user_id: u64,
    pub key_prefix: String,
    pub key_hash: String,
    pub name: String,
    pub permissions: PermissionSet,
    pub expires_at: DateTime<Utc>,
}

/// 만료 기간 (심볼)
/// Symbolic expiry class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryClass {
    #[serde(rename = "1H")]
    Hour,
    #[serde(rename = "1D")]
    Day,
    #[serde(rename = "1M")]
    Month,
    #[serde(rename = "1Y")]
    Year,
}

impl ExpiryClass {
    /// now에 기간을 더함 (월/년은 달력 기준)
    /// Add the class to `now`; month and year follow the calendar
    pub fn add_to(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            ExpiryClass::Hour => now.checked_add_signed(Duration::hours(1)),
            ExpiryClass::Day => now.checked_add_signed(Duration::days(1)),
            ExpiryClass::Month => now.checked_add_months(Months::new(1)),
            ExpiryClass::Year => now.checked_add_months(Months::new(12)),
        }
    }

    /// 절대 만료 시각 계산 및 허용 범위 [min, max] 검증
    /// Resolve the absolute expiry and reject it outside the admissible window
    pub fn resolve(&self, now: DateTime<Utc>, policy: &ApiKeyPolicy) -> Result<DateTime<Utc>, ApiKeyError> {
        let expires_at = self
            .add_to(now)
            .ok_or_else(|| ApiKeyError::InvalidExpiry("Expiry overflows the calendar".to_string()))?;

        let window = |hours: i64| {
            Duration::try_hours(hours)
                .and_then(|d| now.checked_add_signed(d))
                .ok_or_else(|| ApiKeyError::InvalidExpiry(format!("Expiry bound of {} hour(s) overflows", hours)))
        };
        let min = window(policy.min_expiry_hours)?;
        let max = window(policy.max_expiry_hours)?;

        if expires_at < min {
            return Err(ApiKeyError::InvalidExpiry(format!(
                "Expiry is too short. Minimum is {} hour(s)",
                policy.min_expiry_hours
            )));
        }
        if expires_at > max {
            return Err(ApiKeyError::InvalidExpiry(format!(
                "Expiry is too long. Maximum is {} hour(s), requested expiry {} is beyond {}",
                policy.max_expiry_hours,
                expires_at.to_rfc3339(),
                max.to_rfc3339()
            )));
        }

        Ok(expires_at)
    }
}

/// API 키 생성 요청
/// Create API key request
#[derive(Debug, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: String,
    pub permissions: Vec<Permission>,
    pub expiry: ExpiryClass,
}

/// API 키 롤오버 요청
/// Rollover request (the old key must already be expired)
#[derive(Debug, Deserialize)]
pub struct RolloverApiKeyRequest {
    pub expired_key_id: Uuid,
    pub expiry: ExpiryClass,
}

/// API 키 폐기 요청
/// Revoke request
#[derive(Debug, Deserialize)]
pub struct RevokeApiKeyRequest {
    pub key_id: Uuid,
}

/// 발급 응답 (원본 키는 이 응답에서 단 한 번만 노출)
/// Issue/rollover response. The raw key appears here exactly once.
#[derive(Debug, Serialize)]
pub struct IssuedApiKey {
    pub id: Uuid,
    pub api_key: String,
    pub expires_at: DateTime<Utc>,
}

/// 폐기 응답
#[derive(Debug, Serialize)]
pub struct RevokeApiKeyResponse {
    pub message: String,
}

/// 검증된 API 키 (소유자 + 권한)
/// Result of a successful key validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedKey {
    pub key_id: Uuid,
    pub user_id: u64,
    pub permissions: PermissionSet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn policy(min: i64, max: i64) -> ApiKeyPolicy {
        ApiKeyPolicy {
            min_expiry_hours: min,
            max_expiry_hours: max,
            max_active_keys: 5,
        }
    }

    #[test]
    fn test_expiry_class_wire_format() {
        let class: ExpiryClass = serde_json::from_str(r#""1M""#).unwrap();
        assert_eq!(class, ExpiryClass::Month);
        assert!(serde_json::from_str::<ExpiryClass>(r#""2W""#).is_err());
    }

    #[test]
    fn test_month_and_year_follow_calendar() {
        let now = Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap();
        // 1월 31일 + 1개월 = 2월 28일 (말일로 보정)
        assert_eq!(
            ExpiryClass::Month.add_to(now).unwrap(),
            Utc.with_ymd_and_hms(2025, 2, 28, 12, 0, 0).unwrap()
        );
        assert_eq!(
            ExpiryClass::Year.add_to(now).unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap()
        );
        assert_eq!(ExpiryClass::Hour.add_to(now).unwrap(), now + Duration::hours(1));
    }

    #[test]
    fn test_resolve_accepts_classes_inside_default_window() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();
        let policy = ApiKeyPolicy::default();
        for class in [ExpiryClass::Hour, ExpiryClass::Day, ExpiryClass::Month, ExpiryClass::Year] {
            assert!(class.resolve(now, &policy).is_ok(), "{:?} should be admissible", class);
        }
    }

    #[test]
    fn test_resolve_rejects_too_short_and_too_long() {
        let now = Utc::now();

        let short = ExpiryClass::Hour.resolve(now, &policy(24, 8784));
        assert!(matches!(short, Err(ApiKeyError::InvalidExpiry(_))));

        let long = ExpiryClass::Year.resolve(now, &policy(1, 24 * 30));
        assert!(matches!(long, Err(ApiKeyError::InvalidExpiry(_))));

        let ok = ExpiryClass::Day.resolve(now, &policy(1, 24 * 30)).unwrap();
        assert_eq!(ok, now + Duration::days(1));
    }

    #[test]
    fn test_resolve_with_unbounded_policy_errors_instead_of_panicking() {
        let result = ExpiryClass::Day.resolve(Utc::now(), &policy(1, i64::MAX));
        assert!(matches!(result, Err(ApiKeyError::InvalidExpiry(_))));
    }

    #[test]
    fn test_is_active_at() {
        let now = Utc::now();
        let mut key = ApiKey {
            id: Uuid::new_v4(),
            user_id: 1,
            key_prefix: "0a1b2c3d".to_string(),
            key_hash: "hash".to_string(),
            name: "ci".to_string(),
            permissions: PermissionSet::new([Permission::Read]),
            expires_at: now + Duration::hours(1),
            revoked: false,
            created_at: now,
            updated_at: now,
        };
        assert!(key.is_active_at(now));
        assert!(!key.is_active_at(now + Duration::hours(2)));
        key.revoked = true;
        assert!(!key.is_active_at(now));
    }
}
