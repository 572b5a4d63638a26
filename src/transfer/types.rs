//! Configuration and policy types for the transfer engine.

use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;

/// USDC mint on mainnet-beta, the single token this wallet handles.
pub const DEFAULT_TOKEN_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// HTTP(S) address of the ledger RPC endpoint
    pub rpc_endpoint: String,
    /// Timeout applied to every RPC call
    pub rpc_timeout_seconds: u64,
    /// Commitment level for reads and the freshness fetch
    pub commitment: CommitmentConfig,
    /// Fixed per-compute-unit price attached to every transfer
    pub priority_fee_microlamports: u64,
    /// The single fungible token this wallet handles
    pub token: TokenMintConfig,
    /// Maximum number of history items fetched per query
    pub history_limit: usize,
    /// How displayed state is refreshed after a submission
    pub refresh: RefreshPolicy,
    /// What to do when the recipient-account existence check itself fails
    pub missing_account_policy: MissingAccountPolicy,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_endpoint: "https://api.mainnet-beta.solana.com".to_string(),
            rpc_timeout_seconds: 30,
            commitment: CommitmentConfig::finalized(),
            priority_fee_microlamports: 100_000,
            token: TokenMintConfig::default(),
            history_limit: 10,
            refresh: RefreshPolicy::default(),
            missing_account_policy: MissingAccountPolicy::default(),
        }
    }
}

/// A fungible-token type descriptor, fixed for the lifetime of the app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenMintConfig {
    /// Base58 mint address
    pub mint: String,
    /// Decimal precision of the token's smallest unit
    pub decimals: u8,
}

impl Default for TokenMintConfig {
    fn default() -> Self {
        Self {
            mint: DEFAULT_TOKEN_MINT.to_string(),
            decimals: 6,
        }
    }
}

/// Refresh strategy applied after a submission before re-reading state.
///
/// Neither variant waits for finality; the poll variant only waits until the
/// signature becomes visible to the RPC node, or gives up at the timeout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Sleep for a fixed delay, then re-read
    FixedDelay { delay_ms: u64 },
    /// Poll signature statuses until the submitted signature is visible or
    /// the timeout elapses, then re-read
    PollUntilSeen { interval_ms: u64, timeout_ms: u64 },
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        RefreshPolicy::FixedDelay { delay_ms: 5_000 }
    }
}

/// Policy for an existence check that fails at the transport layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MissingAccountPolicy {
    /// Treat the account as absent and emit a creation instruction. The
    /// creation may be rejected on-chain as a duplicate if the account
    /// actually exists.
    #[default]
    AssumeMissing,
    /// Abort the transfer with the underlying query error.
    Abort,
}

/// Counters for events the engine boundary otherwise hides, kept so that a
/// swallowed read failure is distinguishable from genuinely empty state.
#[derive(Debug, Default, Clone, Serialize)]
pub struct EngineMetrics {
    /// Transactions accepted by the transport layer
    pub submissions: u64,
    /// Write-path failures (build, bind, submit)
    pub submission_failures: u64,
    /// Balance reads downgraded to "unknown"
    pub balance_read_failures: u64,
    /// History fetches downgraded to an empty list
    pub history_fetch_failures: u64,
    /// Existence checks that failed and were treated as "missing"
    pub existence_checks_assumed_missing: u64,
    /// Message-signing requests completed
    pub messages_signed: u64,
}
