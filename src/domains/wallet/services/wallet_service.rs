use std::sync::Arc;
use rust_decimal::Decimal;
use crate::shared::clients::{GatewayEvent, PaymentGateway};
use crate::shared::database::{Database, TransactionRepository, WalletRepository};
use crate::shared::utils::{validate_amount, ReferenceGenerator};
use crate::domains::auth::models::{Permission, Principal};
use crate::domains::wallet::models::{
    BalanceResponse, DepositSession, DepositStatusResponse, TransactionCreate, TransactionHistoryItem,
    TransactionStatus, TransactionType, TransferRequest, TransferResponse, WebhookOutcome,
};
use crate::shared::errors::WalletError;

/// 지갑 서비스 (원장 엔진)
/// Ledger engine: deposits, webhook confirmation, transfers and reads
///
/// 잔액 변경은 모두 하나의 DB 트랜잭션 안에서 거래 기록과 함께 커밋됨
#[derive(Clone)]
pub struct WalletService {
    db: Database,
    gateway: Arc<dyn PaymentGateway>,
    min_deposit_amount: Decimal,
}

impl WalletService {
    pub fn new(db: Database, gateway: Arc<dyn PaymentGateway>, min_deposit_amount: Decimal) -> Self {
        Self {
            db,
            gateway,
            min_deposit_amount,
        }
    }

    /// 입금 시작
    /// Write a pending deposit, then open a gateway session for it
    ///
    /// 잔액은 여기서 변경되지 않음 (웹훅 확인 시에만 반영)
    pub async fn initiate_deposit(
        &self,
        principal: &Principal,
        amount: Decimal,
    ) -> Result<DepositSession, WalletError> {
        principal.require(Permission::Deposit)?;

        let amount = validate_amount(amount).map_err(WalletError::InvalidAmount)?;
        if amount < self.min_deposit_amount {
            return Err(WalletError::InvalidAmount(format!(
                "minimum deposit is {}, got {}",
                self.min_deposit_amount, amount
            )));
        }

        // 1. 대기 상태 거래 기록
        let reference = ReferenceGenerator::next_deposit();
        let tx_repo = TransactionRepository::new(self.db.pool().clone());
        let pending = tx_repo
            .create(&TransactionCreate {
                wallet_id: principal.wallet.id,
                tx_type: TransactionType::Deposit,
                amount,
                status: TransactionStatus::Pending,
                reference: Some(reference.clone()),
                description: "Wallet deposit".to_string(),
            })
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to record deposit: {:#}", e)))?;

        // 2. 게이트웨이 결제 세션 생성
        match self
            .gateway
            .initialize_transaction(&principal.email, amount, &reference)
            .await
        {
            Ok(session) => {
                tracing::info!(
                    user_id = principal.user_id,
                    wallet_id = principal.wallet.id,
                    %reference,
                    %amount,
                    "Deposit initiated"
                );
                Ok(session)
            }
            Err(e) if e.is_definitive() => {
                tracing::warn!(%reference, error = %e, "Gateway rejected deposit initialization");
                // 세션이 열리지 않았으므로 대기 거래를 실패로 종료
                if let Err(mark_err) = tx_repo.mark_failed(pending.id).await {
                    tracing::error!(%reference, error = ?mark_err, "Failed to mark deposit as failed");
                }
                Err(WalletError::Gateway(e.to_string()))
            }
            Err(e) => {
                // 세션이 열렸을 수 있으므로 pending 유지 (웹훅이 오면 반영)
                tracing::error!(%reference, error = %e, "Gateway initialization outcome unknown, deposit left pending");
                Err(WalletError::Gateway(e.to_string()))
            }
        }
    }

    /// 웹훅 처리 (서명 검증 후 입금 확정)
    /// Verify and apply a gateway webhook delivered as raw bytes
    pub async fn process_webhook(
        &self,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<WebhookOutcome, WalletError> {
        // 1. 원본 바이트에 대한 서명 검증 (실패 시 상태 변경 없음)
        let signature = signature.unwrap_or_default();
        if !self.gateway.verify_signature(signature, body) {
            tracing::warn!("Rejected webhook with invalid signature");
            return Err(WalletError::InvalidSignature);
        }

        // 2. 이벤트 파싱
        let reference = match GatewayEvent::parse(body).map_err(|e| WalletError::MalformedEvent(e.to_string()))? {
            GatewayEvent::ChargeSuccess { reference } => reference,
            GatewayEvent::Other { event } => {
                tracing::info!(%event, "Webhook received for non-success event");
                return Ok(WebhookOutcome::IgnoredEvent { event });
            }
        };

        // 3. 거래 행 잠금 후 상태 전이
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to begin transaction: {:#}", e)))?;

        let transaction = TransactionRepository::find_by_reference_for_update(&mut tx, &reference)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to fetch transaction: {:#}", e)))?
            .ok_or_else(|| WalletError::UnknownReference { reference: reference.clone() })?;

        match transaction.status {
            TransactionStatus::Success => {
                tracing::info!(%reference, "Transaction has already been processed");
                return Ok(WebhookOutcome::AlreadyProcessed { reference });
            }
            // 거절로 종료된 입금에 결제가 들어옴: 수동 정산 대상, 게이트웨이가 재전송하도록 거부
            TransactionStatus::Failed => {
                tracing::error!(%reference, amount = %transaction.amount, "Success event for a failed deposit, needs reconciliation");
                return Err(WalletError::DepositFailed { reference });
            }
            TransactionStatus::Pending => {}
        }

        let settled = TransactionRepository::settle_pending(&mut tx, transaction.id, TransactionStatus::Success)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to settle transaction: {:#}", e)))?;
        if !settled {
            return Err(WalletError::Internal(format!(
                "Transaction {} left pending state under lock",
                reference
            )));
        }

        let new_balance = WalletRepository::apply_delta(&mut tx, transaction.wallet_id, transaction.amount)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to credit wallet: {:#}", e)))?;

        tx.commit()
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to commit deposit: {:#}", e)))?;

        tracing::info!(
            wallet_id = transaction.wallet_id,
            %reference,
            amount = %transaction.amount,
            %new_balance,
            "Wallet credited"
        );
        Ok(WebhookOutcome::Credited { reference })
    }

    /// 지갑 간 송금
    /// Move funds between wallets atomically
    ///
    /// 두 지갑 모두 ID 오름차순으로 잠근 뒤 잠금 하에서 송신자 잔액을 다시 읽음
    pub async fn transfer(
        &self,
        principal: &Principal,
        request: TransferRequest,
    ) -> Result<TransferResponse, WalletError> {
        principal.require(Permission::Transfer)?;

        let amount = validate_amount(request.amount).map_err(WalletError::InvalidAmount)?;
        let recipient_number = request.wallet_number.trim();

        if recipient_number == principal.wallet.wallet_number {
            return Err(WalletError::SelfTransfer);
        }

        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to begin transaction: {:#}", e)))?;

        // 1. 수신 지갑 확인
        let recipient_id = WalletRepository::find_id_by_number(&mut tx, recipient_number)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to resolve recipient: {:#}", e)))?
            .ok_or_else(|| WalletError::RecipientNotFound {
                wallet_number: recipient_number.to_string(),
            })?;
        let sender_id = principal.wallet.id;
        if recipient_id == sender_id {
            return Err(WalletError::SelfTransfer);
        }

        // 2. 고정 순서로 두 지갑 잠금
        let locked = WalletRepository::lock_many(&mut tx, &[sender_id, recipient_id])
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to lock wallets: {:#}", e)))?;
        let sender = locked
            .iter()
            .find(|w| w.id == sender_id)
            .cloned()
            .ok_or_else(|| WalletError::Internal(format!("Sender wallet {} vanished", sender_id)))?;
        let recipient = locked
            .iter()
            .find(|w| w.id == recipient_id)
            .cloned()
            .ok_or_else(|| WalletError::RecipientNotFound {
                wallet_number: recipient_number.to_string(),
            })?;

        // 3. 잠금 하의 잔액으로 검증
        if sender.balance < amount {
            return Err(WalletError::InsufficientFunds {
                required: amount,
                available: sender.balance,
            });
        }

        // 4. 잔액 이동 + 양쪽 거래 기록
        WalletRepository::apply_delta(&mut tx, sender.id, -amount)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to debit sender: {:#}", e)))?;
        WalletRepository::apply_delta(&mut tx, recipient.id, amount)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to credit recipient: {:#}", e)))?;

        let entries = [
            TransactionCreate {
                wallet_id: sender.id,
                tx_type: TransactionType::Transfer,
                amount,
                status: TransactionStatus::Success,
                reference: None,
                description: format!("Transfer to wallet {}", recipient.wallet_number),
            },
            TransactionCreate {
                wallet_id: recipient.id,
                tx_type: TransactionType::Transfer,
                amount,
                status: TransactionStatus::Success,
                reference: None,
                description: format!("Received from wallet {}", sender.wallet_number),
            },
        ];
        for entry in &entries {
            TransactionRepository::insert(&mut tx, entry)
                .await
                .map_err(|e| WalletError::DatabaseError(format!("Failed to record transfer: {:#}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to commit transfer: {:#}", e)))?;

        tracing::info!(
            from = %sender.wallet_number,
            to = %recipient.wallet_number,
            %amount,
            "Transfer completed"
        );

        Ok(TransferResponse {
            status: "success".to_string(),
            message: "Transfer completed".to_string(),
        })
    }

    /// 잔액 조회
    pub async fn get_balance(&self, principal: &Principal) -> Result<BalanceResponse, WalletError> {
        principal.require(Permission::Read)?;

        let wallet_repo = WalletRepository::new(self.db.pool().clone());
        let wallet = wallet_repo
            .get_by_user_id(principal.user_id)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to fetch wallet: {:#}", e)))?
            .ok_or_else(|| WalletError::Internal(format!("Wallet missing for user {}", principal.user_id)))?;

        Ok(BalanceResponse { balance: wallet.balance })
    }

    /// 거래 내역 (최신순)
    pub async fn get_transactions(
        &self,
        principal: &Principal,
    ) -> Result<Vec<TransactionHistoryItem>, WalletError> {
        principal.require(Permission::Read)?;

        let tx_repo = TransactionRepository::new(self.db.pool().clone());
        let transactions = tx_repo
            .list_by_wallet(principal.wallet.id)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to fetch transactions: {:#}", e)))?;

        Ok(transactions.into_iter().map(Into::into).collect())
    }

    /// 입금 상태 조회 (본인 지갑의 입금만)
    pub async fn get_deposit_status(
        &self,
        principal: &Principal,
        reference: &str,
    ) -> Result<DepositStatusResponse, WalletError> {
        principal.require(Permission::Read)?;

        let tx_repo = TransactionRepository::new(self.db.pool().clone());
        let deposit = tx_repo
            .find_deposit(principal.wallet.id, reference)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to fetch deposit: {:#}", e)))?
            .ok_or_else(|| WalletError::DepositNotFound { reference: reference.to_string() })?;

        Ok(DepositStatusResponse {
            reference: reference.to_string(),
            status: deposit.status,
            amount: deposit.amount,
        })
    }
}
