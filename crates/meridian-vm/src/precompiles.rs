//! Precompiled accounts

use crate::error::VmResult;
use crate::gas::{self, precompile as cost};
use meridian_crypto::{recover_address, ripemd160, sha256, Signature};
use meridian_primitives::{Address, Gas, H256};
use std::collections::HashMap;

/// Natively implemented account
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Precompile {
    /// 0x01: signer recovery
    EcRecover,
    /// 0x02: SHA-256
    Sha256,
    /// 0x03: RIPEMD-160, left-padded to 32 bytes
    Ripemd160,
    /// 0x04: returns its input
    Identity,
}

/// Resolution of an address before execution
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountKind {
    /// Code is run by the interpreter
    Regular,
    /// Code is native
    Precompiled(Precompile),
}

impl Precompile {
    /// Gas charged for running on `input`
    pub fn required_gas(&self, input: &[u8]) -> Gas {
        match self {
            Precompile::EcRecover => cost::ECRECOVER,
            Precompile::Sha256 => gas::linear_cost(input.len(), cost::SHA256_BASE, cost::SHA256_WORD),
            Precompile::Ripemd160 => {
                gas::linear_cost(input.len(), cost::RIPEMD160_BASE, cost::RIPEMD160_WORD)
            }
            Precompile::Identity => {
                gas::linear_cost(input.len(), cost::IDENTITY_BASE, cost::IDENTITY_WORD)
            }
        }
    }

    /// Compute the output for `input`
    pub fn run(&self, input: &[u8]) -> VmResult<Vec<u8>> {
        match self {
            Precompile::EcRecover => Ok(ecrecover(input)),
            Precompile::Sha256 => Ok(sha256(input).as_bytes().to_vec()),
            Precompile::Ripemd160 => {
                let mut out = vec![0u8; 32];
                out[12..].copy_from_slice(&ripemd160(input));
                Ok(out)
            }
            Precompile::Identity => Ok(input.to_vec()),
        }
    }
}

/// Signer address left-padded to 32 bytes, or empty output when the input
/// does not hold a recoverable signature.
fn ecrecover(input: &[u8]) -> Vec<u8> {
    let mut padded = [0u8; 128];
    let len = input.len().min(128);
    padded[..len].copy_from_slice(&input[..len]);

    // v is a 32-byte word whose only non-zero byte may be the last
    if padded[32..63].iter().any(|b| *b != 0) {
        return Vec::new();
    }
    let v = padded[63];
    if v != 27 && v != 28 {
        return Vec::new();
    }

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&padded[64..96]);
    s.copy_from_slice(&padded[96..128]);

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&padded[..32]);

    match recover_address(&H256::from_bytes(hash), &Signature::new(r, s, v)) {
        Ok(address) => {
            let mut out = vec![0u8; 32];
            out[12..].copy_from_slice(address.as_bytes());
            out
        }
        Err(_) => Vec::new(),
    }
}

/// Address table of precompiled accounts
#[derive(Clone, Debug)]
pub struct PrecompileSet {
    table: HashMap<Address, Precompile>,
}

impl Default for PrecompileSet {
    fn default() -> Self {
        Self::frontier()
    }
}

impl PrecompileSet {
    /// The four original precompiles at 0x01 through 0x04
    pub fn frontier() -> Self {
        let table = [
            (1, Precompile::EcRecover),
            (2, Precompile::Sha256),
            (3, Precompile::Ripemd160),
            (4, Precompile::Identity),
        ]
        .into_iter()
        .map(|(n, p)| (Address::from_low_u64_be(n), p))
        .collect();
        Self { table }
    }

    /// Empty table
    pub fn none() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Resolve `address` once before running it
    pub fn resolve(&self, address: &Address) -> AccountKind {
        match self.table.get(address) {
            Some(p) => AccountKind::Precompiled(*p),
            None => AccountKind::Regular,
        }
    }

    /// Check if `address` is precompiled
    pub fn contains(&self, address: &Address) -> bool {
        self.table.contains_key(address)
    }
}
