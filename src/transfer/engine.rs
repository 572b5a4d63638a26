//! The transfer engine.
//!
//! Each user action is an explicit asynchronous command returning a result;
//! the hosting UI layer invokes commands, there are no implicit
//! subscriptions. Every command checks for a connected wallet up front and
//! rejects with [`WalletError::NotConnected`] otherwise.
//!
//! Within one transfer flow, build, bind and submit are strictly
//! sequential. Concurrent commands never share mutable transfer state; the
//! injected wallet is a single shared resource and concurrent submissions
//! are not serialized here.

use std::sync::Arc;
use std::time::Duration;

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use solana_transaction_status::TransactionStatus;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

use crate::transfer::error::WalletError;
use crate::transfer::submit::TransferReceipt;
use crate::transfer::types::{EngineMetrics, MissingAccountPolicy, RefreshPolicy, WalletConfig};
use crate::transfer::wallet::WalletClient;
use crate::transfer::{address, balance, builder, derived, freshness, history, submit};
use crate::types::{HistoryItem, WalletSnapshot};

/// Orchestrates transfers and state reads against one RPC endpoint and one
/// injected wallet client.
pub struct TransferEngine {
    rpc: Arc<RpcClient>,
    config: WalletConfig,
    mint: Pubkey,
    wallet: RwLock<Option<Arc<dyn WalletClient>>>,
    metrics: Arc<RwLock<EngineMetrics>>,
}

impl TransferEngine {
    /// Create an engine from configuration. Fails when the configured mint
    /// address does not parse.
    pub fn new(config: WalletConfig) -> Result<Self, WalletError> {
        let mint = address::parse_address(&config.token.mint)?;
        let rpc = Arc::new(RpcClient::new_with_timeout(
            config.rpc_endpoint.clone(),
            Duration::from_secs(config.rpc_timeout_seconds),
        ));

        Ok(Self {
            rpc,
            config,
            mint,
            wallet: RwLock::new(None),
            metrics: Arc::new(RwLock::new(EngineMetrics::default())),
        })
    }

    /// The RPC client, shared so a local wallet can broadcast through the
    /// same endpoint.
    pub fn rpc(&self) -> Arc<RpcClient> {
        Arc::clone(&self.rpc)
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Inject the wallet produced by the hosting connection layer.
    pub async fn connect(&self, wallet: Arc<dyn WalletClient>) {
        info!(address = %wallet.address(), "wallet connected");
        *self.wallet.write().await = Some(wallet);
    }

    pub async fn disconnect(&self) {
        *self.wallet.write().await = None;
        info!("wallet disconnected");
    }

    async fn wallet(&self) -> Result<Arc<dyn WalletClient>, WalletError> {
        self.wallet
            .read()
            .await
            .clone()
            .ok_or(WalletError::NotConnected)
    }

    /// The connected account's address.
    pub async fn connected_address(&self) -> Result<Pubkey, WalletError> {
        Ok(self.wallet().await?.address())
    }

    /// Native balance of the connected account, in SOL.
    pub async fn native_balance(&self) -> Result<f64, WalletError> {
        let account = self.connected_address().await?;
        balance::native_balance(&self.rpc, &account).await
    }

    /// Token balance of the connected account, in whole token units. A
    /// missing derived account reads as 0.
    pub async fn token_balance(&self) -> Result<f64, WalletError> {
        let owner = self.connected_address().await?;
        balance::token_balance(
            &self.rpc,
            &owner,
            &self.mint,
            self.config.token.decimals,
            self.config.commitment,
        )
        .await
    }

    /// Send native currency to a recipient given as a base58 string.
    #[instrument(skip(self))]
    pub async fn send_native(
        &self,
        recipient: &str,
        amount_sol: f64,
    ) -> Result<TransferReceipt, WalletError> {
        let wallet = self.wallet().await?;
        let to = address::parse_address(recipient)?;
        let from = wallet.address();

        let result = async {
            let unsigned = builder::native_transfer(
                &from,
                &to,
                amount_sol,
                self.config.priority_fee_microlamports,
            )?;
            let bound = freshness::bind(&self.rpc, unsigned, self.config.commitment).await?;
            submit::submit(wallet.as_ref(), bound).await
        }
        .await;

        self.track_submission(&result).await;
        result
    }

    /// Send tokens of the configured mint to a recipient given as a base58
    /// string, creating the recipient's derived account when it is absent.
    #[instrument(skip(self))]
    pub async fn send_token(
        &self,
        recipient: &str,
        amount: f64,
    ) -> Result<TransferReceipt, WalletError> {
        let wallet = self.wallet().await?;
        let to = address::parse_address(recipient)?;
        let from = wallet.address();

        let result = async {
            let destination_exists = self.destination_account_exists(&to).await?;
            let unsigned = builder::token_transfer(
                &from,
                &to,
                &self.mint,
                self.config.token.decimals,
                amount,
                destination_exists,
                self.config.priority_fee_microlamports,
            )?;
            let bound = freshness::bind(&self.rpc, unsigned, self.config.commitment).await?;
            submit::submit(wallet.as_ref(), bound).await
        }
        .await;

        self.track_submission(&result).await;
        result
    }

    /// Sign an arbitrary byte payload with the connected wallet.
    pub async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
        let wallet = self.wallet().await?;
        let signature = wallet.sign_message(message).await?;
        self.metrics.write().await.messages_signed += 1;
        Ok(signature)
    }

    /// Recent submissions by the connected account, newest first.
    ///
    /// A failed fetch presents as an empty list; the failure is logged and
    /// counted rather than raised.
    pub async fn history(&self) -> Result<Vec<HistoryItem>, WalletError> {
        let account = self.connected_address().await?;
        Ok(self.history_or_empty(&account).await)
    }

    /// Read balances and history in one pass, downgrading read failures to
    /// absent values.
    pub async fn snapshot(&self) -> Result<WalletSnapshot, WalletError> {
        let account = self.connected_address().await?;

        let native_balance = match balance::native_balance(&self.rpc, &account).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "native balance read failed");
                self.metrics.write().await.balance_read_failures += 1;
                None
            }
        };

        let token_balance = match balance::token_balance(
            &self.rpc,
            &account,
            &self.mint,
            self.config.token.decimals,
            self.config.commitment,
        )
        .await
        {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "token balance read failed");
                self.metrics.write().await.balance_read_failures += 1;
                None
            }
        };

        let history = self.history_or_empty(&account).await;

        Ok(WalletSnapshot {
            native_balance,
            token_balance,
            history,
        })
    }

    /// Apply the configured refresh policy after a submission, then read a
    /// fresh snapshot. Neither policy waits for finality, so the snapshot
    /// may still reflect pre-transfer state.
    #[instrument(skip(self))]
    pub async fn refresh_after(&self, signature: &Signature) -> Result<WalletSnapshot, WalletError> {
        match self.config.refresh {
            RefreshPolicy::FixedDelay { delay_ms } => {
                sleep(Duration::from_millis(delay_ms)).await;
            }
            RefreshPolicy::PollUntilSeen {
                interval_ms,
                timeout_ms,
            } => {
                let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
                loop {
                    match self.rpc.get_signature_statuses(&[*signature]).await {
                        Ok(response) if signature_seen(&response.value) => {
                            info!(%signature, "submitted signature is visible");
                            break;
                        }
                        Ok(_) => {}
                        Err(e) => warn!(error = %e, "signature status poll failed"),
                    }
                    if tokio::time::Instant::now() >= deadline {
                        warn!(%signature, "signature not visible before refresh timeout");
                        break;
                    }
                    sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }

        self.snapshot().await
    }

    /// Current counter values.
    pub async fn metrics(&self) -> EngineMetrics {
        self.metrics.read().await.clone()
    }

    async fn destination_account_exists(&self, to: &Pubkey) -> Result<bool, WalletError> {
        let to_derived = derived::derived_token_address(to, &self.mint);
        match derived::account_exists(&self.rpc, &to_derived, self.config.commitment).await {
            Ok(exists) => Ok(exists),
            Err(e) => match self.config.missing_account_policy {
                MissingAccountPolicy::AssumeMissing => {
                    warn!(error = %e, "existence check failed, treating the account as missing");
                    self.metrics.write().await.existence_checks_assumed_missing += 1;
                    Ok(false)
                }
                MissingAccountPolicy::Abort => Err(e),
            },
        }
    }

    async fn history_or_empty(&self, account: &Pubkey) -> Vec<HistoryItem> {
        match history::recent_history(
            &self.rpc,
            account,
            self.config.history_limit,
            self.config.commitment,
        )
        .await
        {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "history fetch failed, presenting empty history");
                self.metrics.write().await.history_fetch_failures += 1;
                Vec::new()
            }
        }
    }

    async fn track_submission(&self, result: &Result<TransferReceipt, WalletError>) {
        let mut metrics = self.metrics.write().await;
        match result {
            Ok(_) => metrics.submissions += 1,
            Err(e) => {
                metrics.submission_failures += 1;
                warn!(error = %e, "transfer failed, nothing was submitted");
            }
        }
    }
}

fn signature_seen(statuses: &[Option<TransactionStatus>]) -> bool {
    statuses.first().map(|status| status.is_some()).unwrap_or(false)
}
