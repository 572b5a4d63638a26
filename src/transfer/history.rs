//! Transaction-history query for the connected account.

use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_client::GetConfirmedSignaturesForAddress2Config,
    rpc_response::RpcConfirmedTransactionStatusWithSignature,
};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use tracing::{debug, instrument};

use crate::transfer::error::WalletError;
use crate::types::HistoryItem;

/// Fetch the most recent signatures for an account, newest first.
///
/// Fallible here; the engine boundary decides whether to surface or swallow
/// the failure.
#[instrument(skip(rpc), fields(account = %account))]
pub async fn recent_history(
    rpc: &RpcClient,
    account: &Pubkey,
    limit: usize,
    commitment: CommitmentConfig,
) -> Result<Vec<HistoryItem>, WalletError> {
    let config = GetConfirmedSignaturesForAddress2Config {
        limit: Some(limit),
        commitment: Some(commitment),
        ..Default::default()
    };

    let signatures = rpc
        .get_signatures_for_address_with_config(account, config)
        .await
        .map_err(|e| WalletError::QueryUnavailable(e.to_string()))?;

    debug!(count = signatures.len(), "fetched signature history");
    Ok(to_history_items(signatures, limit))
}

/// Map raw signature statuses to display items, preserving the newest-first
/// order the ledger returns and enforcing the window size.
fn to_history_items(
    raw: Vec<RpcConfirmedTransactionStatusWithSignature>,
    limit: usize,
) -> Vec<HistoryItem> {
    raw.into_iter()
        .take(limit)
        .map(|status| HistoryItem {
            signature: status.signature,
            block_time: status.block_time,
        })
        .collect()
}
