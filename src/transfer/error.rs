//! Error taxonomy for the transfer core.
//!
//! Read-path errors (`QueryUnavailable`) are swallowed at the engine
//! boundary and downgraded to absent display values; write-path errors
//! propagate to the caller and are never retried.

use thiserror::Error;

/// Errors surfaced by the transfer core.
#[derive(Debug, Error)]
pub enum WalletError {
    /// An operation was invoked without a connected wallet.
    #[error("wallet is not connected")]
    NotConnected,

    /// Input did not decode to a valid 32-byte account address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Transfer amount was zero, negative, or not a finite number.
    #[error("invalid transfer amount: {0}")]
    InvalidAmount(f64),

    /// An instruction could not be encoded.
    #[error("instruction encoding failed: {0}")]
    InstructionEncoding(String),

    /// A ledger read (balance, existence check, checkpoint, history) failed
    /// at the transport layer.
    #[error("ledger query unavailable: {0}")]
    QueryUnavailable(String),

    /// The wallet declined to sign the transaction.
    #[error("wallet declined to sign the transaction")]
    SubmissionRejected,

    /// The signed transaction could not be handed to the transport layer.
    #[error("transaction broadcast failed: {0}")]
    BroadcastFailed(String),

    /// The bound checkpoint expired before the transaction was accepted.
    #[error("transaction expired before it reached the ledger")]
    Expired,

    /// The wallet declined to sign the message payload.
    #[error("wallet declined to sign the message")]
    SigningRejected,
}
