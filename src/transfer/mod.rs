//! Transfer module - transaction orchestration for the sol-courier wallet.
//!
//! Builds native and token transfers over an injected wallet client,
//! resolves derived token accounts, binds freshness metadata immediately
//! before submission, and reconciles displayed state through balance and
//! history reads.

pub mod address;
pub mod balance;
pub mod builder;
pub mod derived;
pub mod engine;
pub mod error;
pub mod freshness;
pub mod history;
pub mod submit;
pub mod types;
pub mod wallet;

// Re-export the primary engine and its surface
pub use engine::TransferEngine;
pub use error::WalletError;
pub use submit::TransferReceipt;
pub use types::{
    EngineMetrics, MissingAccountPolicy, RefreshPolicy, TokenMintConfig, WalletConfig,
};
pub use wallet::{LocalWalletClient, WalletClient};

/// Engine builder for convenient construction with sensible defaults.
pub struct EngineBuilder {
    config: WalletConfig,
}

impl EngineBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: WalletConfig::default(),
        }
    }

    /// Set the RPC endpoint.
    pub fn with_rpc_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.rpc_endpoint = endpoint.into();
        self
    }

    /// Set the RPC timeout in seconds.
    pub fn with_rpc_timeout(mut self, seconds: u64) -> Self {
        self.config.rpc_timeout_seconds = seconds;
        self
    }

    /// Set the fixed priority fee in microlamports per compute unit.
    pub fn with_priority_fee(mut self, microlamports: u64) -> Self {
        self.config.priority_fee_microlamports = microlamports;
        self
    }

    /// Set the handled token mint and its decimal precision.
    pub fn with_token_mint(mut self, mint: impl Into<String>, decimals: u8) -> Self {
        self.config.token = TokenMintConfig {
            mint: mint.into(),
            decimals,
        };
        self
    }

    /// Set the history window size.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Set the post-submission refresh policy.
    pub fn with_refresh_policy(mut self, refresh: RefreshPolicy) -> Self {
        self.config.refresh = refresh;
        self
    }

    /// Set the policy for failed recipient-account existence checks.
    pub fn with_missing_account_policy(mut self, policy: MissingAccountPolicy) -> Self {
        self.config.missing_account_policy = policy;
        self
    }

    /// Build the engine configuration.
    pub fn build_config(self) -> WalletConfig {
        self.config
    }

    /// Build the engine instance.
    pub fn build(self) -> Result<TransferEngine, WalletError> {
        TransferEngine::new(self.config)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
