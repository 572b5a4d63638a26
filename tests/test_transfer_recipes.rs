//! Scenario tests for transfer assembly and submission.

use async_trait::async_trait;
use sol_courier::transfer::builder::{self, UnsignedTransfer};
use sol_courier::transfer::derived::derived_token_address;
use sol_courier::transfer::freshness::BoundTransfer;
use sol_courier::transfer::submit;
use sol_courier::transfer::wallet::WalletClient;
use sol_courier::transfer::WalletError;
use solana_sdk::{
    compute_budget,
    pubkey::Pubkey,
    signature::Signature,
    signer::{keypair::Keypair, Signer},
    transaction::Transaction,
};
use std::str::FromStr;

/// Wallet that signs everything it is handed, without broadcasting.
struct ApprovingWallet {
    keypair: Keypair,
}

impl ApprovingWallet {
    fn new() -> Self {
        Self {
            keypair: Keypair::new(),
        }
    }
}

#[async_trait]
impl WalletClient for ApprovingWallet {
    fn address(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn send_transaction(&self, bound: BoundTransfer) -> Result<Signature, WalletError> {
        let mut transaction = bound.transaction;
        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_sign(&[&self.keypair], blockhash)
            .map_err(|_| WalletError::SubmissionRejected)?;
        Ok(transaction.signatures[0])
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
        Ok(self.keypair.sign_message(message))
    }
}

/// Wallet that declines every request.
struct DecliningWallet {
    address: Pubkey,
}

#[async_trait]
impl WalletClient for DecliningWallet {
    fn address(&self) -> Pubkey {
        self.address
    }

    async fn send_transaction(&self, _bound: BoundTransfer) -> Result<Signature, WalletError> {
        Err(WalletError::SubmissionRejected)
    }

    async fn sign_message(&self, _message: &[u8]) -> Result<Signature, WalletError> {
        Err(WalletError::SigningRejected)
    }
}

fn bind_offline(unsigned: UnsignedTransfer, last_valid_block_height: u64) -> BoundTransfer {
    let transaction =
        Transaction::new_with_payer(&unsigned.instructions, Some(&unsigned.fee_payer));
    BoundTransfer {
        transaction,
        last_valid_block_height,
    }
}

#[tokio::test]
async fn test_native_transfer_submits_two_instructions() {
    let wallet = ApprovingWallet::new();
    let from = wallet.address();
    let to = Pubkey::new_unique();

    let unsigned = builder::native_transfer(&from, &to, 0.0001, 100_000).expect("build");
    assert_eq!(unsigned.instructions.len(), 2);
    assert_eq!(unsigned.instructions[0].program_id, compute_budget::id());

    let receipt = submit::submit(&wallet, bind_offline(unsigned, 250_000_000))
        .await
        .expect("submission accepted");

    assert_eq!(receipt.last_valid_block_height, 250_000_000);
    // The signature round-trips through its canonical base58 form
    let text = receipt.signature.to_string();
    assert_eq!(Signature::from_str(&text).expect("well-formed"), receipt.signature);
}

#[tokio::test]
async fn test_token_transfer_creates_missing_destination_first() {
    let wallet = ApprovingWallet::new();
    let from = wallet.address();
    let to = Pubkey::new_unique();
    let mint = Pubkey::new_unique();

    let unsigned =
        builder::token_transfer(&from, &to, &mint, 6, 0.1, false, 100_000).expect("build");

    assert_eq!(unsigned.instructions.len(), 3);
    assert_eq!(unsigned.instructions[0].program_id, compute_budget::id());
    assert_eq!(
        unsigned.instructions[1].program_id,
        spl_associated_token_account::id()
    );
    assert_eq!(unsigned.instructions[2].program_id, spl_token::id());

    // The creation targets the recipient's derived account
    let to_derived = derived_token_address(&to, &mint);
    assert!(unsigned.instructions[1]
        .accounts
        .iter()
        .any(|m| m.pubkey == to_derived));

    let receipt = submit::submit(&wallet, bind_offline(unsigned, 1))
        .await
        .expect("submission accepted");
    assert_eq!(receipt.last_valid_block_height, 1);
}

#[tokio::test]
async fn test_declined_submission_produces_no_signature() {
    let wallet = DecliningWallet {
        address: Pubkey::new_unique(),
    };
    let from = wallet.address();
    let to = Pubkey::new_unique();

    let unsigned = builder::native_transfer(&from, &to, 0.0001, 100_000).expect("build");
    let result = submit::submit(&wallet, bind_offline(unsigned, 1)).await;

    assert!(matches!(result, Err(WalletError::SubmissionRejected)));
}
