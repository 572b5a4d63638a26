//! The wallet-client seam.
//!
//! The engine treats the wallet as an opaque capability injected by the
//! hosting connection layer: it exposes the connected address, signs and
//! broadcasts transfers, and signs arbitrary message payloads. Discovery,
//! pairing and session lifecycle live outside this crate.

use std::sync::Arc;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    pubkey::Pubkey,
    signature::Signature,
    signer::{keypair::Keypair, Signer},
};
use tracing::{debug, warn};

use crate::transfer::error::WalletError;
use crate::transfer::freshness::BoundTransfer;

/// Capability surface of an injected wallet.
#[async_trait]
pub trait WalletClient: Send + Sync {
    /// The connected account's public identifier.
    fn address(&self) -> Pubkey;

    /// Sign and broadcast a bound transfer, returning the signature the
    /// transport layer accepted. Does not wait for finality.
    async fn send_transaction(&self, bound: BoundTransfer) -> Result<Signature, WalletError>;

    /// Sign an arbitrary byte payload. No ledger interaction.
    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError>;
}

/// Wallet backed by a locally held keypair, broadcasting through the same
/// RPC endpoint the engine reads from. Used by the demo binary and tests.
pub struct LocalWalletClient {
    keypair: Keypair,
    rpc: Arc<RpcClient>,
}

impl LocalWalletClient {
    pub fn new(keypair: Keypair, rpc: Arc<RpcClient>) -> Self {
        Self { keypair, rpc }
    }
}

#[async_trait]
impl WalletClient for LocalWalletClient {
    fn address(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn send_transaction(&self, bound: BoundTransfer) -> Result<Signature, WalletError> {
        let mut transaction = bound.transaction;
        let blockhash = transaction.message.recent_blockhash;

        transaction
            .try_sign(&[&self.keypair], blockhash)
            .map_err(|_| WalletError::SubmissionRejected)?;

        match self.rpc.send_transaction(&transaction).await {
            Ok(signature) => {
                debug!(%signature, "transaction accepted by transport layer");
                Ok(signature)
            }
            // The ledger reports an elapsed validity window as an unknown
            // blockhash; everything else is a transport failure.
            Err(e) if e.to_string().contains("Blockhash not found") => {
                warn!("bound blockhash no longer valid");
                Err(WalletError::Expired)
            }
            Err(e) => Err(WalletError::BroadcastFailed(e.to_string())),
        }
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
        Ok(self.keypair.sign_message(message))
    }
}
