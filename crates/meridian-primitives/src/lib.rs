//! # meridian-primitives
//!
//! Primitive types shared by the Meridian execution core.
//!
//! This crate provides the fixed-size byte types ([`Address`], [`H256`]) and
//! the scalar aliases used by the state, chain-spec and VM crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;

pub use address::{Address, AddressError};
pub use error::PrimitiveError;
pub use hash::{HashError, H256};

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Block number type
pub type BlockNumber = u64;

/// Account nonce type
pub type Nonce = u64;

/// Gas type
pub type Gas = u64;
