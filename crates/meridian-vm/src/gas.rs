//! Dispatcher limits and native gas costs

use meridian_primitives::Gas;

/// Deepest allowed nesting of message calls and creations
pub const MAX_CALL_DEPTH: usize = 1024;

/// Largest deployable code once the size limit is active
pub const MAX_CODE_SIZE: usize = 24576;

/// Gas per byte of deployed code
pub const CREATE_DATA_GAS: Gas = 200;

/// Gas costs for the precompiled accounts
pub mod precompile {
    use meridian_primitives::Gas;

    /// ecrecover flat cost
    pub const ECRECOVER: Gas = 3000;
    /// sha256 base cost
    pub const SHA256_BASE: Gas = 60;
    /// sha256 per 32-byte word
    pub const SHA256_WORD: Gas = 12;
    /// ripemd160 base cost
    pub const RIPEMD160_BASE: Gas = 600;
    /// ripemd160 per 32-byte word
    pub const RIPEMD160_WORD: Gas = 120;
    /// identity base cost
    pub const IDENTITY_BASE: Gas = 15;
    /// identity per 32-byte word
    pub const IDENTITY_WORD: Gas = 3;
}

/// Number of 32-byte words needed to hold `len` bytes
pub fn words(len: usize) -> Gas {
    (len as Gas).div_ceil(32)
}

/// `base + per_word * words(len)`, saturating
pub fn linear_cost(len: usize, base: Gas, per_word: Gas) -> Gas {
    base.saturating_add(per_word.saturating_mul(words(len)))
}

/// Cost of storing `len` bytes of deployed code
pub fn code_deposit_cost(len: usize) -> Gas {
    (len as Gas).saturating_mul(CREATE_DATA_GAS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words() {
        assert_eq!(words(0), 0);
        assert_eq!(words(1), 1);
        assert_eq!(words(32), 1);
        assert_eq!(words(33), 2);
    }

    #[test]
    fn test_linear_cost() {
        assert_eq!(linear_cost(0, precompile::SHA256_BASE, precompile::SHA256_WORD), 60);
        assert_eq!(linear_cost(64, precompile::SHA256_BASE, precompile::SHA256_WORD), 84);
        assert_eq!(linear_cost(1, precompile::IDENTITY_BASE, precompile::IDENTITY_WORD), 18);
    }

    #[test]
    fn test_code_deposit_cost() {
        assert_eq!(code_deposit_cost(50), 10_000);
        assert_eq!(code_deposit_cost(0), 0);
        assert_eq!(code_deposit_cost(MAX_CODE_SIZE), 4_915_200);
    }
}
