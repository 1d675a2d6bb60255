//! Account data

use meridian_primitives::{Nonce, H256, U256};

/// Empty code hash (keccak256 of empty bytes)
pub const EMPTY_CODE_HASH: H256 = H256::from_bytes([
    0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c,
    0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7, 0x03, 0xc0,
    0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b,
    0x7b, 0xfa, 0xd8, 0x04, 0x5d, 0x85, 0xa4, 0x70,
]);

/// Account record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    /// Account nonce
    pub nonce: Nonce,
    /// Account balance
    pub balance: U256,
    /// Code hash (keccak256 of code, or EMPTY_CODE_HASH if no code)
    pub code_hash: H256,
}

impl Default for Account {
    fn default() -> Self {
        Self::new()
    }
}

impl Account {
    /// Create a new empty account
    pub fn new() -> Self {
        Self {
            nonce: 0,
            balance: U256::zero(),
            code_hash: EMPTY_CODE_HASH,
        }
    }

    /// Empty account with the given balance
    pub fn with_balance(balance: U256) -> Self {
        Self {
            balance,
            ..Self::new()
        }
    }

    /// Check if account is empty (zero nonce, zero balance, no code)
    pub fn is_empty(&self) -> bool {
        self.nonce == 0 && self.balance.is_zero() && !self.has_code()
    }

    /// Check if account has code
    pub fn has_code(&self) -> bool {
        self.code_hash != EMPTY_CODE_HASH && !self.code_hash.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_crypto::keccak256;

    #[test]
    fn test_empty_code_hash_matches_keccak() {
        assert_eq!(EMPTY_CODE_HASH, keccak256(&[]));
    }

    #[test]
    fn test_new_account_is_empty() {
        let account = Account::new();
        assert!(account.is_empty());
        assert!(!account.has_code());
        assert_eq!(Account::default(), account);
    }

    #[test]
    fn test_account_with_balance_not_empty() {
        let account = Account::with_balance(U256::from(1u64));
        assert!(!account.is_empty());
        assert_eq!(account.nonce, 0);
    }

    #[test]
    fn test_account_with_nonce_not_empty() {
        let account = Account {
            nonce: 1,
            ..Account::new()
        };
        assert!(!account.is_empty());
    }

    #[test]
    fn test_account_with_code() {
        let account = Account {
            code_hash: keccak256(&[0x60, 0x00]),
            ..Account::new()
        };
        assert!(account.has_code());
        assert!(!account.is_empty());
    }
}
