//! Submission of a bound transfer through the wallet client.

use solana_sdk::signature::Signature;
use tracing::info;

use crate::transfer::error::WalletError;
use crate::transfer::freshness::BoundTransfer;
use crate::transfer::wallet::WalletClient;

/// Outcome of an accepted submission. The signature proves acceptance into
/// the transport layer only, not finality.
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    /// Opaque handle to the submitted transaction
    pub signature: Signature,
    /// Expiry height the transfer was bound to
    pub last_valid_block_height: u64,
}

/// Hand a bound transfer to the wallet for signing and broadcast.
///
/// Consumes the transfer; on failure the caller rebuilds from scratch with a
/// fresh existence check and checkpoint rather than resubmitting.
pub async fn submit(
    wallet: &dyn WalletClient,
    bound: BoundTransfer,
) -> Result<TransferReceipt, WalletError> {
    let last_valid_block_height = bound.last_valid_block_height;
    let signature = wallet.send_transaction(bound).await?;

    info!(%signature, last_valid_block_height, "transfer submitted");
    Ok(TransferReceipt {
        signature,
        last_valid_block_height,
    })
}
