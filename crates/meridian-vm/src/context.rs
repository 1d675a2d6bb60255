//! Block and transaction environment visible to every frame

use meridian_primitives::{Address, BlockNumber, U256};

/// Block environment information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockContext {
    /// Block number; selects the active fork rules
    pub number: BlockNumber,
    /// Block timestamp
    pub timestamp: u64,
    /// Block gas limit
    pub gas_limit: u64,
    /// Block beneficiary
    pub coinbase: Address,
    /// Block difficulty
    pub difficulty: U256,
}

impl BlockContext {
    /// Context for block `number` with default other fields
    pub fn at(number: BlockNumber) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }
}

impl Default for BlockContext {
    fn default() -> Self {
        Self {
            number: 0,
            timestamp: 0,
            gas_limit: 8_000_000,
            coinbase: Address::ZERO,
            difficulty: U256::zero(),
        }
    }
}

/// Transaction environment information
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxContext {
    /// Transaction origin (original sender)
    pub origin: Address,
    /// Gas price
    pub gas_price: U256,
}

impl TxContext {
    /// Context for a transaction sent by `origin`
    pub fn new(origin: Address, gas_price: U256) -> Self {
        Self { origin, gas_price }
    }
}
