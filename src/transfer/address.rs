//! Address parsing and validation.
//!
//! Every externally supplied account identifier passes through here before
//! it is used as a transfer destination or query target.

use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

use crate::transfer::error::WalletError;

/// Parse a base58 string into a validated account address.
///
/// Fails with [`WalletError::InvalidAddress`] when the input does not decode
/// to a 32-byte key; input is never silently truncated.
pub fn parse_address(input: &str) -> Result<Pubkey, WalletError> {
    Pubkey::from_str(input.trim())
        .map_err(|_| WalletError::InvalidAddress(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_address_round_trips() {
        let original = Pubkey::new_unique().to_string();
        let parsed = parse_address(&original).expect("valid address");
        assert_eq!(parsed.to_string(), original);
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for input in ["", "not-an-address", "abc", "O0Il"] {
            let result = parse_address(input);
            assert!(matches!(result, Err(WalletError::InvalidAddress(_))));
        }
    }

    #[test]
    fn test_parse_rejects_truncated_key() {
        let mut address = Pubkey::new_unique().to_string();
        address.truncate(address.len() - 4);
        assert!(parse_address(&address).is_err());
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let original = Pubkey::new_unique().to_string();
        let padded = format!("  {original} ");
        assert_eq!(parse_address(&padded).unwrap().to_string(), original);
    }
}
