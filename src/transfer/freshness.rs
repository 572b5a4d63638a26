//! Checkpoint binding.
//!
//! A transfer is bound to the current finalized blockhash immediately before
//! submission. The hash expires after a bounded number of blocks, so a
//! transfer built long before binding, or bound and then held, risks
//! rejection as expired.

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, transaction::Transaction};
use tracing::{debug, instrument};

use crate::transfer::builder::UnsignedTransfer;
use crate::transfer::error::WalletError;

/// A transfer bound to a recent checkpoint, ready for signing. Consumed by
/// value exactly once; a failed submission is rebuilt from scratch rather
/// than re-bound.
#[derive(Debug, Clone)]
pub struct BoundTransfer {
    /// The assembled transaction carrying fee payer and recent blockhash
    pub transaction: Transaction,
    /// Last block height at which the bound blockhash remains valid
    pub last_valid_block_height: u64,
}

/// Fetch the current checkpoint and bind it, along with the fee payer, to
/// the assembled instructions.
#[instrument(skip(rpc, unsigned))]
pub async fn bind(
    rpc: &RpcClient,
    unsigned: UnsignedTransfer,
    commitment: CommitmentConfig,
) -> Result<BoundTransfer, WalletError> {
    let (blockhash, last_valid_block_height) = rpc
        .get_latest_blockhash_with_commitment(commitment)
        .await
        .map_err(|e| WalletError::QueryUnavailable(e.to_string()))?;

    let mut transaction =
        Transaction::new_with_payer(&unsigned.instructions, Some(&unsigned.fee_payer));
    transaction.message.recent_blockhash = blockhash;

    debug!(%blockhash, last_valid_block_height, "bound transfer to checkpoint");
    Ok(BoundTransfer {
        transaction,
        last_valid_block_height,
    })
}
