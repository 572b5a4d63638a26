//! Core display types for the sol-courier transfer system.

use serde::{Deserialize, Serialize};

/// A past submission by the connected account, as shown in the history view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryItem {
    /// Base58 transaction signature
    pub signature: String,
    /// Unix timestamp of the containing block, absent until the ledger
    /// records timing for the transaction
    pub block_time: Option<i64>,
}

/// Snapshot of the connected account's displayed state.
///
/// Read failures are downgraded at this boundary: an unreadable balance is
/// `None` (rendered as "unknown"), an unreadable history is empty.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WalletSnapshot {
    /// Native balance in SOL, `None` when the read failed
    pub native_balance: Option<f64>,
    /// Token balance in whole token units, `None` when the read failed
    pub token_balance: Option<f64>,
    /// Most recent submissions, newest first
    pub history: Vec<HistoryItem>,
}
