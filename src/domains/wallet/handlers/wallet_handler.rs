use crate::domains::auth::models::Principal;
use crate::domains::wallet::models::{
    BalanceResponse, DepositRequest, DepositSession, DepositStatusResponse, TransactionHistoryItem,
    TransferRequest, TransferResponse, WebhookAck,
};
use crate::shared::clients::PAYSTACK_SIGNATURE_HEADER;
use crate::shared::services::AppState;
use crate::shared::errors::WalletError;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

/// 입금 시작 핸들러 (Bearer 또는 API 키, deposit 권한)
/// Deposit initiation handler
pub async fn deposit(
    State(app_state): State<AppState>,
    principal: Principal,
    Json(request): Json<DepositRequest>,
) -> Result<(StatusCode, Json<DepositSession>), (StatusCode, Json<serde_json::Value>)> {
    let session = app_state
        .wallet_state
        .wallet_service
        .initiate_deposit(&principal, request.amount)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// Paystack 웹훅 핸들러 (인증 없음, 서명으로 검증)
/// Webhook handler. The body is taken as raw bytes so the signature covers exactly what was sent.
pub async fn paystack_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, (StatusCode, Json<serde_json::Value>)> {
    let signature = headers
        .get(PAYSTACK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let outcome = app_state
        .wallet_state
        .wallet_service
        .process_webhook(signature, &body)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    tracing::debug!(?outcome, "Webhook acknowledged");
    Ok(Json(WebhookAck { status: true }))
}

/// 송금 핸들러 (transfer 권한)
pub async fn transfer(
    State(app_state): State<AppState>,
    principal: Principal,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<TransferResponse>), (StatusCode, Json<serde_json::Value>)> {
    let response = app_state
        .wallet_state
        .wallet_service
        .transfer(&principal, request)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// 잔액 조회 핸들러 (read 권한)
pub async fn get_balance(
    State(app_state): State<AppState>,
    principal: Principal,
) -> Result<Json<BalanceResponse>, (StatusCode, Json<serde_json::Value>)> {
    let balance = app_state
        .wallet_state
        .wallet_service
        .get_balance(&principal)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(balance))
}

/// 거래 내역 핸들러 (read 권한)
pub async fn get_transactions(
    State(app_state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<TransactionHistoryItem>>, (StatusCode, Json<serde_json::Value>)> {
    let history = app_state
        .wallet_state
        .wallet_service
        .get_transactions(&principal)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(history))
}

/// 입금 상태 조회 핸들러 (read 권한)
pub async fn get_deposit_status(
    State(app_state): State<AppState>,
    principal: Principal,
    Path(reference): Path<String>,
) -> Result<Json<DepositStatusResponse>, (StatusCode, Json<serde_json::Value>)> {
    let status = app_state
        .wallet_state
        .wallet_service
        .get_deposit_status(&principal, &reference)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(status))
}
