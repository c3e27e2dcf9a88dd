// Wallet server library
// 통합 테스트와 바이너리가 공유하는 모듈
pub mod domains;
pub mod shared;
pub mod routes;
