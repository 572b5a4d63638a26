//! sol-courier - transaction orchestration core for a Solana demo wallet
//!
//! This crate builds native and token transfers, resolves derived token
//! accounts, binds freshness metadata, submits through an injected wallet
//! client, and reconciles optimistic display state via history queries.

pub mod types;
pub mod transfer;

// Re-export main types for convenience
pub use transfer::{EngineBuilder, TransferEngine, WalletError};
pub use types::{HistoryItem, WalletSnapshot};
