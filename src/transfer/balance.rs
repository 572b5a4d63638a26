//! Native and token balance reads for the connected account.

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig, native_token::LAMPORTS_PER_SOL,
    program_pack::Pack, pubkey::Pubkey,
};
use tracing::{debug, instrument};

use crate::transfer::derived::derived_token_address;
use crate::transfer::error::WalletError;

/// Fetch the native balance of an account, in SOL.
///
/// Every account implicitly has a zero native balance, so "no account" is
/// not an error here; only transport failures are.
#[instrument(skip(rpc), fields(account = %account))]
pub async fn native_balance(rpc: &RpcClient, account: &Pubkey) -> Result<f64, WalletError> {
    let lamports = rpc
        .get_balance(account)
        .await
        .map_err(|e| WalletError::QueryUnavailable(e.to_string()))?;

    debug!(lamports, "native balance");
    Ok(lamports as f64 / LAMPORTS_PER_SOL as f64)
}

/// Fetch the token balance of an owner for one mint, in whole token units.
///
/// A missing derived account is a valid "no balance" state and yields 0; a
/// present account that does not parse as token state, or a transport
/// failure, is an error.
#[instrument(skip(rpc), fields(owner = %owner, mint = %mint))]
pub async fn token_balance(
    rpc: &RpcClient,
    owner: &Pubkey,
    mint: &Pubkey,
    decimals: u8,
    commitment: CommitmentConfig,
) -> Result<f64, WalletError> {
    let derived = derived_token_address(owner, mint);

    let response = rpc
        .get_account_with_commitment(&derived, commitment)
        .await
        .map_err(|e| WalletError::QueryUnavailable(e.to_string()))?;

    token_amount_from_account(response.value, decimals)
}

/// Map a fetched derived account to a whole-unit token amount.
///
/// An absent account is a valid "no balance" state, not a failure.
fn token_amount_from_account(
    account: Option<solana_sdk::account::Account>,
    decimals: u8,
) -> Result<f64, WalletError> {
    let account = match account {
        Some(account) => account,
        None => {
            debug!("token account does not exist, balance is 0");
            return Ok(0.0);
        }
    };

    let state = spl_token::state::Account::unpack(&account.data)
        .map_err(|e| WalletError::QueryUnavailable(format!("token account state: {e}")))?;

    Ok(state.amount as f64 / 10f64.powi(decimals as i32))
}
