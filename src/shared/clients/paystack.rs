use anyhow::{Context, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use crate::domains::wallet::models::DepositSession;
use crate::shared::config::PaystackConfig;
use crate::shared::errors::GatewayError;
use crate::shared::utils::to_minor_units;

type HmacSha512 = Hmac<Sha512>;

/// 웹훅 서명 헤더
/// Header carrying the webhook signature
pub const PAYSTACK_SIGNATURE_HEADER: &str = "x-paystack-signature";

/// 결제 게이트웨이 인터페이스
/// Payment gateway boundary
///
/// Service 계층은 이 trait만 참조함 (PaystackClient 또는 테스트용 구현체)
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// 결제 세션 생성 (입금 시작)
    /// Open a payment session for `reference` and `amount`
    ///
    /// 세션이 열리지 않았음이 확실할 때만 `GatewayError::Rejected` 반환
    async fn initialize_transaction(
        &self,
        email: &str,
        amount: Decimal,
        reference: &str,
    ) -> Result<DepositSession, GatewayError>;

    /// 원본 바이트에 대한 웹훅 서명 검증
    /// Verify the webhook signature over the exact raw body
    fn verify_signature(&self, signature: &str, body: &[u8]) -> bool;
}

/// 게이트웨이 웹훅 이벤트
/// Verified webhook event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    ChargeSuccess { reference: String },
    Other { event: String },
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    event: String,
    #[serde(default)]
    data: Option<RawEventData>,
}

#[derive(Debug, Deserialize)]
struct RawEventData {
    reference: Option<String>,
}

impl GatewayEvent {
    /// 웹훅 본문 파싱
    /// Parse a webhook body. Only `charge.success` needs a reference.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let raw: RawEvent = serde_json::from_slice(body).context("Webhook body is not a valid event")?;

        if raw.event != "charge.success" {
            return Ok(GatewayEvent::Other { event: raw.event });
        }

        let reference = raw
            .data
            .and_then(|d| d.reference)
            .filter(|r| !r.is_empty())
            .context("charge.success event without data.reference")?;

        Ok(GatewayEvent::ChargeSuccess { reference })
    }
}

/// HMAC-SHA512(secret, body) 를 hex로
/// Compute the hex signature Paystack sends for `body`
pub fn sign_payload(secret: &str, body: &[u8]) -> String {
    keyed_mac(secret, body)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
        .unwrap_or_default()
}

/// 상수 시간 서명 비교
/// Constant-time verification of a hex signature
pub fn verify_payload_signature(secret: &str, signature: &str, body: &[u8]) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    keyed_mac(secret, body).is_some_and(|mac| mac.verify_slice(&expected).is_ok())
}

fn keyed_mac(secret: &str, body: &[u8]) -> Option<HmacSha512> {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(mac)
}

#[derive(Debug, Serialize)]
struct InitializeRequest<'a> {
    email: &'a str,
    amount: i64,
    reference: &'a str,
}

#[derive(Debug, Deserialize)]
struct PaystackEnvelope<T> {
    status: bool,
    message: String,
    data: Option<T>,
}

// Paystack API 클라이언트
// Paystack API client for external calls
pub struct PaystackClient {
    http_client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl PaystackClient {
    // 클라이언트 생성
    // Create new Paystack client instance
    pub fn new(config: &PaystackConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for PaystackClient {
    async fn initialize_transaction(
        &self,
        email: &str,
        amount: Decimal,
        reference: &str,
    ) -> Result<DepositSession, GatewayError> {
        // Paystack은 최소 단위(kobo) 정수 금액을 요구
        let minor = to_minor_units(amount)
            .ok_or_else(|| GatewayError::Rejected(format!("Amount {} does not fit in minor units", amount)))?;
        let url = format!("{}/transaction/initialize", self.base_url);

        tracing::debug!(%reference, amount_minor = minor, "Requesting Paystack transaction initialization");

        // 전송 실패/타임아웃: 요청이 처리됐는지 알 수 없음
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&InitializeRequest { email, amount: minor, reference })
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(format!("Failed to send request to Paystack: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_failure(status, &body));
        }

        let envelope: PaystackEnvelope<DepositSession> = response
            .json()
            .await
            .map_err(|e| GatewayError::Unavailable(format!("Failed to parse Paystack response: {}", e)))?;

        if !envelope.status {
            return Err(GatewayError::Rejected(envelope.message));
        }

        envelope
            .data
            .ok_or_else(|| GatewayError::Unavailable("Paystack response missing data".to_string()))
    }

    fn verify_signature(&self, signature: &str, body: &[u8]) -> bool {
        verify_payload_signature(&self.secret_key, signature, body)
    }
}

/// 실패 응답 분류: 4xx는 거절, 그 외(5xx 등)는 결과 불명
fn classify_http_failure(status: reqwest::StatusCode, body: &str) -> GatewayError {
    let detail = format!("Paystack returned {} - {}", status, body);
    if status.is_client_error() {
        GatewayError::Rejected(detail)
    } else {
        GatewayError::Unavailable(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "sk_test_webhook_secret";

    #[test]
    fn test_signature_round_trip_over_raw_bytes() {
        let body = br#"{"event":"charge.success","data":{"reference":"deposit_abc"}}"#;
        let signature = sign_payload(SECRET, body);
        assert_eq!(signature.len(), 128);
        assert!(verify_payload_signature(SECRET, &signature, body));
    }

    #[test]
    fn test_signature_rejects_tampered_body_and_wrong_secret() {
        let body = br#"{"event":"charge.success","data":{"reference":"deposit_abc"}}"#;
        let signature = sign_payload(SECRET, body);

        // 공백 하나만 달라도 원본 바이트가 달라지므로 실패해야 함
        let reformatted = br#"{"event": "charge.success","data":{"reference":"deposit_abc"}}"#;
        assert!(!verify_payload_signature(SECRET, &signature, reformatted));
        assert!(!verify_payload_signature("other_secret", &signature, body));
        assert!(!verify_payload_signature(SECRET, "not-hex", body));
        assert!(!verify_payload_signature(SECRET, "", body));
    }

    #[test]
    fn test_parse_events() {
        let success = GatewayEvent::parse(br#"{"event":"charge.success","data":{"reference":"deposit_1","amount":500000}}"#).unwrap();
        assert_eq!(success, GatewayEvent::ChargeSuccess { reference: "deposit_1".to_string() });

        let other = GatewayEvent::parse(br#"{"event":"transfer.failed","data":{}}"#).unwrap();
        assert_eq!(other, GatewayEvent::Other { event: "transfer.failed".to_string() });

        assert!(GatewayEvent::parse(br#"{"event":"charge.success","data":{}}"#).is_err());
        assert!(GatewayEvent::parse(b"not json").is_err());
    }

    #[test]
    fn test_http_failures_split_into_rejected_and_unavailable() {
        let rejected = classify_http_failure(reqwest::StatusCode::BAD_REQUEST, r#"{"status":false}"#);
        assert!(matches!(rejected, GatewayError::Rejected(_)));
        let unauthorized = classify_http_failure(reqwest::StatusCode::UNAUTHORIZED, "");
        assert!(unauthorized.is_definitive());

        let outage = classify_http_failure(reqwest::StatusCode::BAD_GATEWAY, "upstream timeout");
        assert!(matches!(outage, GatewayError::Unavailable(_)));
        assert!(!classify_http_failure(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "").is_definitive());
    }

    #[test]
    fn test_paystack_client_verifies_with_configured_secret() {
        let client = PaystackClient::new(&PaystackConfig {
            secret_key: SECRET.to_string(),
            base_url: "https://api.paystack.co/".to_string(),
        })
        .unwrap();
        let body = br#"{"event":"charge.success"}"#;
        assert!(client.verify_signature(&sign_payload(SECRET, body), body));
        assert_eq!(client.base_url, "https://api.paystack.co");
    }
}
