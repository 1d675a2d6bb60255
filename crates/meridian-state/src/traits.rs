//! State access trait consumed by the execution dispatcher

use crate::account::Account;
use bytes::Bytes;
use meridian_primitives::{Address, Nonce, H256, U256};

/// Opaque handle returned by [`AccountStore::snapshot`].
///
/// Handles are ordered: a snapshot taken later compares greater, and
/// reverting to a handle also discards every snapshot taken after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotId(usize);

impl SnapshotId {
    /// Wrap a store-specific position
    pub const fn new(index: usize) -> Self {
        SnapshotId(index)
    }

    /// Store-specific position of this snapshot
    pub const fn index(&self) -> usize {
        self.0
    }
}

/// Account-level state access.
///
/// Operations are infallible: a backing store that can fail is expected to
/// surface its errors when the transaction is committed, not in the middle
/// of execution.
pub trait AccountStore {
    /// Check if an account exists at `address`
    fn exists(&self, address: &Address) -> bool;

    /// Get account by address
    fn get_account(&self, address: &Address) -> Option<Account>;

    /// Create a fresh account at `address`.
    ///
    /// An existing balance at the address is carried over; nonce and code are
    /// reset.
    fn create_account(&mut self, address: Address);

    /// Get account balance (zero for missing accounts)
    fn balance(&self, address: &Address) -> U256 {
        self.get_account(address)
            .map(|a| a.balance)
            .unwrap_or_default()
    }

    /// Set account balance, creating the account if needed
    fn set_balance(&mut self, address: Address, balance: U256);

    /// Credit `amount`; a zero credit still touches the account
    fn add_balance(&mut self, address: Address, amount: U256) {
        let balance = self.balance(&address).saturating_add(amount);
        self.set_balance(address, balance);
    }

    /// Debit `amount`; callers check funds beforehand
    fn sub_balance(&mut self, address: Address, amount: U256) {
        let balance = self.balance(&address).saturating_sub(amount);
        self.set_balance(address, balance);
    }

    /// Get account nonce (zero for missing accounts)
    fn nonce(&self, address: &Address) -> Nonce {
        self.get_account(address).map(|a| a.nonce).unwrap_or(0)
    }

    /// Set account nonce, creating the account if needed
    fn set_nonce(&mut self, address: Address, nonce: Nonce);

    /// Get contract code (empty for missing accounts)
    fn code(&self, address: &Address) -> Bytes;

    /// Set contract code, creating the account if needed
    fn set_code(&mut self, address: Address, code: Bytes);

    /// Get code hash, `H256::ZERO` for missing accounts
    fn code_hash(&self, address: &Address) -> H256 {
        self.get_account(address)
            .map(|a| a.code_hash)
            .unwrap_or(H256::ZERO)
    }

    /// Get storage value
    fn storage(&self, address: &Address, key: &H256) -> H256;

    /// Set storage value
    fn set_storage(&mut self, address: Address, key: H256, value: H256);

    /// Mark an account as touched for the end-of-transaction empty sweep
    fn touch(&mut self, address: Address);

    /// Record the current state so it can be restored later
    fn snapshot(&mut self) -> SnapshotId;

    /// Restore the state recorded by `id`
    fn revert_to_snapshot(&mut self, id: SnapshotId);
}
