use thiserror::Error;

/// 결제 게이트웨이 호출 에러
/// Payment gateway call failure
///
/// Rejected만 세션이 열리지 않았음이 확실함.
/// Unavailable은 게이트웨이가 요청을 처리했을 수도 있음 (타임아웃, 응답 유실).
#[derive(Error, Debug)]
pub enum GatewayError {
    /// 게이트웨이가 요청을 명시적으로 거절 (4xx 또는 status=false)
    /// Gateway explicitly refused the request
    #[error("Payment gateway rejected the request: {0}")]
    Rejected(String),

    /// 전송 실패, 타임아웃, 5xx, 해석 불가 응답
    /// Outcome unknown: transport error, timeout, 5xx or unreadable response
    #[error("Payment gateway unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    /// 결제 세션이 확실히 생성되지 않았는지 여부
    pub fn is_definitive(&self) -> bool {
        matches!(self, GatewayError::Rejected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_rejection_is_definitive() {
        assert!(GatewayError::Rejected("Invalid email".to_string()).is_definitive());
        assert!(!GatewayError::Unavailable("timed out".to_string()).is_definitive());
    }
}
