//! Demo binary for the sol-courier transfer engine.
//!
//! Mirrors the actions of the hosting wallet UI as a command-line
//! walkthrough: connect a wallet, show balances and history, sign a
//! message, and optionally send a small native and token transfer.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::DateTime;
use sol_courier::transfer::{EngineBuilder, LocalWalletClient, TransferEngine};
use solana_sdk::signer::keypair::Keypair;
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let rpc_endpoint = std::env::var("SOLANA_RPC_URL")
        .context("SOLANA_RPC_URL environment variable is not set")?;

    let engine = EngineBuilder::new()
        .with_rpc_endpoint(rpc_endpoint)
        .build()
        .context("failed to build transfer engine")?;

    let keypair = load_keypair()?;
    let wallet = Arc::new(LocalWalletClient::new(keypair, engine.rpc()));
    engine.connect(wallet).await;

    let address = engine.connected_address().await?;
    info!("Connected as {}", address);

    show_snapshot(&engine).await?;

    // Message signing is independent of any transfer
    let signature = engine
        .sign_message(b"sol-courier signing a message")
        .await?;
    info!("Signed demo message: {}", signature);

    if let Ok(recipient) = std::env::var("COURIER_RECIPIENT") {
        send_demo_transfers(&engine, &recipient).await;
    } else {
        info!("COURIER_RECIPIENT not set, skipping transfer demo");
    }

    let metrics = engine.metrics().await;
    info!(
        "Engine metrics:\n{}",
        serde_json::to_string_pretty(&metrics)?
    );

    Ok(())
}

/// Load the wallet keypair from the file named by COURIER_KEYPAIR (solana
/// CLI JSON format), or generate an ephemeral one for read-only demos.
fn load_keypair() -> Result<Keypair> {
    match std::env::var("COURIER_KEYPAIR") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read keypair file {path}"))?;
            let bytes: Vec<u8> =
                serde_json::from_str(&raw).context("keypair file is not a JSON byte array")?;
            Keypair::from_bytes(&bytes).context("keypair bytes are invalid")
        }
        Err(_) => {
            info!("COURIER_KEYPAIR not set, using an ephemeral keypair");
            Ok(Keypair::new())
        }
    }
}

async fn show_snapshot(engine: &TransferEngine) -> Result<()> {
    let snapshot = engine.snapshot().await?;

    match snapshot.native_balance {
        Some(balance) => info!("Balance: {} SOL", balance),
        None => info!("Balance: unknown"),
    }
    match snapshot.token_balance {
        Some(balance) => info!("Token balance: {}", balance),
        None => info!("Token balance: unknown"),
    }

    if snapshot.history.is_empty() {
        info!("No transactions");
    }
    for item in &snapshot.history {
        let when = item
            .block_time
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| "pending".to_string());
        info!("  {} at {}", item.signature, when);
    }

    Ok(())
}

async fn send_demo_transfers(engine: &TransferEngine, recipient: &str) {
    info!("Sending 0.0001 SOL to {}", recipient);
    match engine.send_native(recipient, 0.0001).await {
        Ok(receipt) => {
            info!("SOL transfer signature: {}", receipt.signature);
            if let Ok(snapshot) = engine.refresh_after(&receipt.signature).await {
                info!("Balance after refresh: {:?} SOL", snapshot.native_balance);
            }
        }
        Err(e) => error!("SOL transfer failed: {}", e),
    }

    info!("Sending 0.1 tokens to {}", recipient);
    match engine.send_token(recipient, 0.1).await {
        Ok(receipt) => {
            info!("Token transfer signature: {}", receipt.signature);
            if let Ok(snapshot) = engine.refresh_after(&receipt.signature).await {
                info!("Token balance after refresh: {:?}", snapshot.token_balance);
            }
        }
        Err(e) => error!("Token transfer failed: {}", e),
    }
}
