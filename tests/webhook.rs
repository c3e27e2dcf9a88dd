// =====================================================
// 입금 / 웹훅 통합 테스트
// =====================================================
// 입금 시작 -> 서명 검증 -> 입금 확정 (멱등)
// =====================================================

mod common;
use common::*;

use rust_decimal::Decimal;
use serde_json::json;
use wallet_server::domains::wallet::models::{TransactionStatus, WebhookOutcome};
use wallet_server::shared::errors::WalletError;

#[tokio::test]
async fn test_deposit_is_credited_exactly_once() {
    let Some(ctx) = setup().await else { return };
    let user = ctx.create_user().await;
    let principal = ctx.principal_for(&user).await;
    let service = &ctx.state.wallet_state.wallet_service;

    let session = service
        .initiate_deposit(&principal, Decimal::new(5000, 0))
        .await
        .unwrap();
    assert!(session.reference.starts_with("deposit_"));
    assert_eq!(session.reference.len(), "deposit_".len() + 20);
    assert_eq!(ctx.transaction_status(&session.reference).await, "pending");
    // 입금 시작만으로는 잔액 변화 없음
    assert_eq!(ctx.balance_of(user.wallet.id).await, Decimal::ZERO);

    let body = charge_success_body(&session.reference);
    let signature = sign(&body);

    let first = service.process_webhook(Some(&signature), &body).await.unwrap();
    assert_eq!(first, WebhookOutcome::Credited { reference: session.reference.clone() });

    let replay = service.process_webhook(Some(&signature), &body).await.unwrap();
    assert_eq!(replay, WebhookOutcome::AlreadyProcessed { reference: session.reference.clone() });

    assert_eq!(ctx.balance_of(user.wallet.id).await, Decimal::new(5000, 0));

    let status = service
        .get_deposit_status(&principal, &session.reference)
        .await
        .unwrap();
    assert_eq!(status.status, TransactionStatus::Success);
    assert_eq!(status.amount, Decimal::new(5000, 0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_webhooks_credit_once() {
    let Some(ctx) = setup().await else { return };
    let user = ctx.create_user().await;
    let principal = ctx.principal_for(&user).await;

    let session = ctx
        .state
        .wallet_state
        .wallet_service
        .initiate_deposit(&principal, Decimal::new(250, 0))
        .await
        .unwrap();
    let body = charge_success_body(&session.reference);
    let signature = sign(&body);

    let mut handles = Vec::new();
    for _ in 0..5 {
        let service = ctx.state.wallet_state.wallet_service.clone();
        let body = body.clone();
        let signature = signature.clone();
        handles.push(tokio::spawn(async move {
            service.process_webhook(Some(&signature), &body).await
        }));
    }

    let mut credited = 0;
    for handle in handles {
        if let WebhookOutcome::Credited { .. } = handle.await.unwrap().unwrap() {
            credited += 1;
        }
    }
    assert_eq!(credited, 1);
    assert_eq!(ctx.balance_of(user.wallet.id).await, Decimal::new(250, 0));
}

#[tokio::test]
async fn test_invalid_signature_changes_nothing() {
    let Some(ctx) = setup().await else { return };
    let user = ctx.create_user().await;
    let principal = ctx.principal_for(&user).await;
    let service = &ctx.state.wallet_state.wallet_service;

    let session = service
        .initiate_deposit(&principal, Decimal::new(300, 0))
        .await
        .unwrap();
    let body = charge_success_body(&session.reference);

    let forged = wallet_server::shared::clients::sign_payload("wrong-secret", &body);
    assert!(matches!(
        service.process_webhook(Some(&forged), &body).await,
        Err(WalletError::InvalidSignature)
    ));
    assert!(matches!(
        service.process_webhook(None, &body).await,
        Err(WalletError::InvalidSignature)
    ));

    assert_eq!(ctx.transaction_status(&session.reference).await, "pending");
    assert_eq!(ctx.balance_of(user.wallet.id).await, Decimal::ZERO);
}

#[tokio::test]
async fn test_unknown_reference_and_other_events() {
    let Some(ctx) = setup().await else { return };
    let service = &ctx.state.wallet_state.wallet_service;

    let body = charge_success_body("deposit_does_not_exist");
    let result = service.process_webhook(Some(&sign(&body)), &body).await;
    assert!(matches!(result, Err(WalletError::UnknownReference { .. })));

    let other = serde_json::to_vec(&json!({ "event": "transfer.success", "data": {} })).unwrap();
    let outcome = service.process_webhook(Some(&sign(&other)), &other).await.unwrap();
    assert_eq!(outcome, WebhookOutcome::IgnoredEvent { event: "transfer.success".to_string() });

    let malformed = b"{not json".to_vec();
    assert!(matches!(
        service.process_webhook(Some(&sign(&malformed)), &malformed).await,
        Err(WalletError::MalformedEvent(_))
    ));
}

#[tokio::test]
async fn test_gateway_timeout_keeps_deposit_pending_and_paid_funds_land() {
    let Some(ctx) = setup().await else { return };
    let user = ctx.create_user().await;
    let principal = ctx.principal_for(&user).await;
    let service = &ctx.state.wallet_state.wallet_service;

    // 게이트웨이가 세션을 열었지만 응답이 유실된 경우
    ctx.gateway.time_out_next_calls(true);
    let result = service.initiate_deposit(&principal, Decimal::new(1000, 0)).await;
    ctx.gateway.time_out_next_calls(false);
    assert!(matches!(result, Err(WalletError::Gateway(_))));

    let reference = ctx.gateway.references().pop().unwrap();
    assert_eq!(ctx.transaction_status(&reference).await, "pending");

    // 고객이 결제하면 웹훅으로 반영되어야 함
    let body = charge_success_body(&reference);
    let outcome = service.process_webhook(Some(&sign(&body)), &body).await.unwrap();
    assert_eq!(outcome, WebhookOutcome::Credited { reference: reference.clone() });
    assert_eq!(ctx.transaction_status(&reference).await, "success");
    assert_eq!(ctx.balance_of(user.wallet.id).await, Decimal::new(1000, 0));
}

#[tokio::test]
async fn test_gateway_rejection_marks_deposit_failed_and_webhook_is_refused() {
    let Some(ctx) = setup().await else { return };
    let user = ctx.create_user().await;
    let principal = ctx.principal_for(&user).await;
    let service = &ctx.state.wallet_state.wallet_service;

    ctx.gateway.reject_next_calls(true);
    let result = service.initiate_deposit(&principal, Decimal::new(700, 0)).await;
    ctx.gateway.reject_next_calls(false);
    assert!(matches!(result, Err(WalletError::Gateway(_))));

    let reference = ctx.gateway.references().pop().unwrap();
    assert_eq!(ctx.transaction_status(&reference).await, "failed");

    // 실패 거래에 대한 성공 이벤트는 2xx로 확인하지 않음 (게이트웨이 재전송 + 수동 정산)
    let body = charge_success_body(&reference);
    let result = service.process_webhook(Some(&sign(&body)), &body).await;
    assert!(matches!(result, Err(WalletError::DepositFailed { .. })));
    let (status, _) = <(axum::http::StatusCode, axum::Json<serde_json::Value>)>::from(result.unwrap_err());
    assert!(!status.is_success());

    assert_eq!(ctx.transaction_status(&reference).await, "failed");
    assert_eq!(ctx.balance_of(user.wallet.id).await, Decimal::ZERO);
}

#[tokio::test]
async fn test_deposit_amount_rules() {
    let Some(ctx) = setup().await else { return };
    let user = ctx.create_user().await;
    let principal = ctx.principal_for(&user).await;
    let service = &ctx.state.wallet_state.wallet_service;

    assert!(matches!(
        service.initiate_deposit(&principal, Decimal::new(99, 0)).await,
        Err(WalletError::InvalidAmount(_))
    ));
    assert!(matches!(
        service.initiate_deposit(&principal, Decimal::new(-100, 0)).await,
        Err(WalletError::InvalidAmount(_))
    ));
}

#[tokio::test]
async fn test_deposit_status_is_scoped_to_owner() {
    let Some(ctx) = setup().await else { return };
    let owner = ctx.create_user().await;
    let other = ctx.create_user().await;
    let owner_principal = ctx.principal_for(&owner).await;
    let other_principal = ctx.principal_for(&other).await;
    let service = &ctx.state.wallet_state.wallet_service;

    let session = service
        .initiate_deposit(&owner_principal, Decimal::new(100, 0))
        .await
        .unwrap();

    assert!(matches!(
        service.get_deposit_status(&other_principal, &session.reference).await,
        Err(WalletError::DepositNotFound { .. })
    ));
    let status = service
        .get_deposit_status(&owner_principal, &session.reference)
        .await
        .unwrap();
    assert_eq!(status.status, TransactionStatus::Pending);
}
