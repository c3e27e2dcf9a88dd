/// ID 생성기
/// Identifier generators
///
/// 역할:
/// - 공개 지갑 번호 생성 (10자리 숫자)
/// - 입금 참조값 생성 (게이트웨이 멱등성 키)
///
/// 두 값 모두 DB UNIQUE 제약이 최종 보호 역할을 하며,
/// 충돌 시 호출 측에서 재생성함

use rand::Rng;
use rand::RngCore;

/// 지갑 번호 범위 [1000000000, 9999999999]
const WALLET_NUMBER_MIN: u64 = 1_000_000_000;
const WALLET_NUMBER_MAX: u64 = 9_999_999_999;

/// 지갑 번호 생성기
/// Wallet number generator
pub struct WalletNumberGenerator;

impl WalletNumberGenerator {
    /// 다음 지갑 번호 생성 (항상 10자리, 앞자리 0 없음)
    /// Generate a random 10-digit wallet number
    pub fn next() -> String {
        rand::thread_rng()
            .gen_range(WALLET_NUMBER_MIN..=WALLET_NUMBER_MAX)
            .to_string()
    }
}

/// 입금 참조값 생성기
/// Deposit reference generator
pub struct ReferenceGenerator;

impl ReferenceGenerator {
    /// `deposit_<20 hex>` 형식
    pub fn next_deposit() -> String {
        let mut bytes = [0u8; 10];
        rand::thread_rng().fill_bytes(&mut bytes);
        format!("deposit_{}", hex::encode(bytes))
    }
}
