//! # meridian-crypto
//!
//! Cryptographic primitives for the Meridian execution core.
//!
//! - Keccak-256, SHA-256 and RIPEMD-160 hashing
//! - Public key recovery (secp256k1)
//! - Address derivation for accounts and created contracts

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
mod signature;

pub use address::{create2_address, create_address};
pub use error::CryptoError;
pub use hash::{keccak256, ripemd160, sha256};
pub use signature::{public_key_to_address, recover_address, recover_public_key, PublicKey, Signature};
