//! Transfer assembly.
//!
//! Both recipes produce an [`UnsignedTransfer`] from already-resolved facts
//! and perform no I/O and no signing. Instruction order is semantically
//! significant: the priority-fee directive leads, and for token transfers
//! the creation of the recipient's derived account (when needed) must
//! precede the transfer itself or the ledger rejects it.

use solana_sdk::{
    compute_budget::ComputeBudgetInstruction, instruction::Instruction,
    native_token::LAMPORTS_PER_SOL, pubkey::Pubkey, system_instruction,
};
use tracing::debug;

use crate::transfer::derived::derived_token_address;
use crate::transfer::error::WalletError;

/// An ordered instruction list plus fee payer, not yet bound to a
/// checkpoint. Created fresh per user action and consumed exactly once.
#[derive(Debug, Clone)]
pub struct UnsignedTransfer {
    /// Instructions in execution order
    pub instructions: Vec<Instruction>,
    /// The sender, who pays fees and funds any account creation
    pub fee_payer: Pubkey,
}

/// Convert a SOL amount to lamports, truncating fractional lamports.
pub fn sol_to_lamports(amount_sol: f64) -> Result<u64, WalletError> {
    validate_amount(amount_sol)?;
    Ok((amount_sol * LAMPORTS_PER_SOL as f64) as u64)
}

/// Convert a whole-token amount to base units for a mint's precision,
/// truncating fractional base units.
pub fn token_to_base_units(amount: f64, decimals: u8) -> Result<u64, WalletError> {
    validate_amount(amount)?;
    Ok((amount * 10f64.powi(decimals as i32)) as u64)
}

fn validate_amount(amount: f64) -> Result<(), WalletError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(WalletError::InvalidAmount(amount));
    }
    Ok(())
}

/// Assemble a native-currency transfer.
///
/// Instruction list: priority-fee directive, then the system transfer.
pub fn native_transfer(
    from: &Pubkey,
    to: &Pubkey,
    amount_sol: f64,
    priority_fee_microlamports: u64,
) -> Result<UnsignedTransfer, WalletError> {
    let lamports = sol_to_lamports(amount_sol)?;

    let instructions = vec![
        ComputeBudgetInstruction::set_compute_unit_price(priority_fee_microlamports),
        system_instruction::transfer(from, to, lamports),
    ];

    debug!(%from, %to, lamports, "assembled native transfer");
    Ok(UnsignedTransfer {
        instructions,
        fee_payer: *from,
    })
}

/// Assemble a token transfer between the derived accounts of sender and
/// recipient.
///
/// `destination_account_exists` is the existence fact resolved immediately
/// before building; when it is false a creation instruction for the
/// recipient's derived account is placed before the transfer, funded by the
/// sender.
pub fn token_transfer(
    from: &Pubkey,
    to: &Pubkey,
    mint: &Pubkey,
    decimals: u8,
    amount: f64,
    destination_account_exists: bool,
    priority_fee_microlamports: u64,
) -> Result<UnsignedTransfer, WalletError> {
    let base_units = token_to_base_units(amount, decimals)?;

    let from_derived = derived_token_address(from, mint);
    let to_derived = derived_token_address(to, mint);

    let mut instructions = vec![ComputeBudgetInstruction::set_compute_unit_price(
        priority_fee_microlamports,
    )];

    if !destination_account_exists {
        instructions.push(
            spl_associated_token_account::instruction::create_associated_token_account(
                from,
                to,
                mint,
                &spl_token::id(),
            ),
        );
    }

    instructions.push(
        spl_token::instruction::transfer_checked(
            &spl_token::id(),
            &from_derived,
            mint,
            &to_derived,
            from,
            &[],
            base_units,
            decimals,
        )
        .map_err(|e| WalletError::InstructionEncoding(e.to_string()))?,
    );

    debug!(
        %from, %to, base_units,
        create_destination = !destination_account_exists,
        "assembled token transfer"
    );
    Ok(UnsignedTransfer {
        instructions,
        fee_payer: *from,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::compute_budget;

    #[test]
    fn test_sol_conversion_stays_within_one_lamport() {
        for amount in [0.0001, 0.1, 1.0, 12.345678901] {
            let lamports = sol_to_lamports(amount).unwrap();
            let back = lamports as f64 / LAMPORTS_PER_SOL as f64;
            assert!((back - amount).abs() * LAMPORTS_PER_SOL as f64 <= 1.0);
        }
    }

    #[test]
    fn test_sol_conversion_truncates() {
        // 1.5 lamports worth of SOL truncates down to 1 lamport
        let lamports = sol_to_lamports(1.5 / LAMPORTS_PER_SOL as f64).unwrap();
        assert_eq!(lamports, 1);
    }

    #[test]
    fn test_token_conversion_uses_mint_precision() {
        assert_eq!(token_to_base_units(0.1, 6).unwrap(), 100_000);
        assert_eq!(token_to_base_units(1.0, 6).unwrap(), 1_000_000);
        assert_eq!(token_to_base_units(2.5, 2).unwrap(), 250);
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        for amount in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                sol_to_lamports(amount),
                Err(WalletError::InvalidAmount(_))
            ));
            assert!(matches!(
                token_to_base_units(amount, 6),
                Err(WalletError::InvalidAmount(_))
            ));
        }
    }

    #[test]
    fn test_native_transfer_has_priority_fee_first() {
        let from = Pubkey::new_unique();
        let to = Pubkey::new_unique();

        let unsigned = native_transfer(&from, &to, 0.0001, 100_000).unwrap();

        assert_eq!(unsigned.instructions.len(), 2);
        assert_eq!(unsigned.instructions[0].program_id, compute_budget::id());
        assert_eq!(
            unsigned.instructions[1].program_id,
            solana_sdk::system_program::id()
        );
        assert_eq!(unsigned.fee_payer, from);
    }

    #[test]
    fn test_token_transfer_to_existing_account_skips_creation() {
        let from = Pubkey::new_unique();
        let to = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let unsigned = token_transfer(&from, &to, &mint, 6, 0.1, true, 100_000).unwrap();

        assert_eq!(unsigned.instructions.len(), 2);
        assert_eq!(unsigned.instructions[0].program_id, compute_budget::id());
        assert_eq!(unsigned.instructions[1].program_id, spl_token::id());
    }

    #[test]
    fn test_token_transfer_to_missing_account_creates_it_first() {
        let from = Pubkey::new_unique();
        let to = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let unsigned = token_transfer(&from, &to, &mint, 6, 0.1, false, 100_000).unwrap();

        assert_eq!(unsigned.instructions.len(), 3);
        assert_eq!(unsigned.instructions[0].program_id, compute_budget::id());
        assert_eq!(
            unsigned.instructions[1].program_id,
            spl_associated_token_account::id()
        );
        assert_eq!(unsigned.instructions[2].program_id, spl_token::id());
    }

    #[test]
    fn test_token_transfer_moves_between_derived_accounts() {
        let from = Pubkey::new_unique();
        let to = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let unsigned = token_transfer(&from, &to, &mint, 6, 0.1, true, 100_000).unwrap();
        let transfer = &unsigned.instructions[1];

        let from_derived = derived_token_address(&from, &mint);
        let to_derived = derived_token_address(&to, &mint);
        let accounts: Vec<Pubkey> = transfer.accounts.iter().map(|m| m.pubkey).collect();

        assert!(accounts.contains(&from_derived));
        assert!(accounts.contains(&to_derived));
        // The sender signs as authority over its derived account
        assert!(transfer
            .accounts
            .iter()
            .any(|m| m.pubkey == from && m.is_signer));
    }
}
