//! In-memory journaled state

use crate::account::{Account, EMPTY_CODE_HASH};
use crate::journal::{Journal, JournalEntry};
use crate::traits::{AccountStore, SnapshotId};
use bytes::Bytes;
use meridian_crypto::keccak256;
use meridian_primitives::{Address, Nonce, H256, U256};
use std::collections::{HashMap, HashSet};

/// In-memory [`AccountStore`] with nested snapshots.
///
/// Every mutation appends its inverse to a journal; a snapshot is the journal
/// length at the time it was taken. Code blobs are stored by hash and never
/// removed, so undoing a code change only restores the account's hash.
#[derive(Clone, Debug, Default)]
pub struct MemoryAccountStore {
    accounts: HashMap<Address, Account>,
    storage: HashMap<(Address, H256), H256>,
    code: HashMap<H256, Bytes>,
    touched: HashSet<Address>,
    journal: Journal,
}

impl MemoryAccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account directly, bypassing the journal.
    ///
    /// Intended for genesis allocation and test setup.
    pub fn insert_account(&mut self, address: Address, account: Account) {
        self.accounts.insert(address, account);
    }

    /// Insert an account with code, bypassing the journal.
    pub fn insert_contract(&mut self, address: Address, balance: U256, code: Bytes) {
        let code_hash = self.store_code(code);
        self.accounts.insert(
            address,
            Account {
                nonce: 0,
                balance,
                code_hash,
            },
        );
    }

    /// Number of accounts held
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Sum of all balances
    pub fn total_balance(&self) -> U256 {
        self.accounts
            .values()
            .fold(U256::zero(), |acc, a| acc.saturating_add(a.balance))
    }

    /// Accounts touched since the last sweep
    pub fn touched(&self) -> impl Iterator<Item = &Address> {
        self.touched.iter()
    }

    /// Check if `address` was touched since the last sweep
    pub fn is_touched(&self, address: &Address) -> bool {
        self.touched.contains(address)
    }

    /// Delete every touched account that is empty and return how many were
    /// removed. Ends the transaction: the journal is cleared, so snapshots
    /// taken earlier can no longer be reverted to.
    pub fn delete_empty_touched(&mut self) -> usize {
        let mut removed = 0;
        for address in self.touched.drain() {
            let empty = self.accounts.get(&address).is_some_and(Account::is_empty);
            if empty {
                self.accounts.remove(&address);
                self.storage.retain(|(owner, _), _| *owner != address);
                removed += 1;
            }
        }
        self.journal.clear();
        tracing::trace!("Swept {} empty touched accounts", removed);
        removed
    }

    /// Keep all changes and forget the journal without sweeping
    pub fn commit(&mut self) {
        self.journal.clear();
        self.touched.clear();
    }

    fn store_code(&mut self, code: Bytes) -> H256 {
        if code.is_empty() {
            return EMPTY_CODE_HASH;
        }
        let hash = keccak256(&code);
        self.code.entry(hash).or_insert(code);
        hash
    }

    fn mark_touched(&mut self, address: Address) {
        if self.touched.insert(address) {
            self.journal.push(JournalEntry::Touched { address });
        }
    }

    /// Account at `address`, created and journaled when missing
    fn account_mut(&mut self, address: Address) -> &mut Account {
        if !self.accounts.contains_key(&address) {
            self.journal
                .push(JournalEntry::AccountCreated { address, prev: None });
        }
        self.accounts.entry(address).or_default()
    }

    fn undo(&mut self, entry: JournalEntry) {
        match entry {
            JournalEntry::AccountCreated { address, prev } => match prev {
                Some(account) => {
                    self.accounts.insert(address, account);
                }
                None => {
                    self.accounts.remove(&address);
                }
            },
            JournalEntry::BalanceChanged { address, prev } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    account.balance = prev;
                }
            }
            JournalEntry::NonceChanged { address, prev } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    account.nonce = prev;
                }
            }
            JournalEntry::CodeChanged { address, prev_hash } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    account.code_hash = prev_hash;
                }
            }
            JournalEntry::StorageChanged { address, key, prev } => {
                if prev.is_zero() {
                    self.storage.remove(&(address, key));
                } else {
                    self.storage.insert((address, key), prev);
                }
            }
            JournalEntry::Touched { address } => {
                self.touched.remove(&address);
            }
        }
    }
}

impl AccountStore for MemoryAccountStore {
    fn exists(&self, address: &Address) -> bool {
        self.accounts.contains_key(address)
    }

    fn get_account(&self, address: &Address) -> Option<Account> {
        self.accounts.get(address).cloned()
    }

    fn create_account(&mut self, address: Address) {
        let prev = self.accounts.get(&address).cloned();
        let balance = prev.as_ref().map(|a| a.balance).unwrap_or_default();
        self.journal
            .push(JournalEntry::AccountCreated { address, prev });
        self.accounts.insert(address, Account::with_balance(balance));
    }

    fn set_balance(&mut self, address: Address, balance: U256) {
        let account = self.account_mut(address);
        let prev = std::mem::replace(&mut account.balance, balance);
        self.journal
            .push(JournalEntry::BalanceChanged { address, prev });
        self.mark_touched(address);
    }

    fn set_nonce(&mut self, address: Address, nonce: Nonce) {
        let account = self.account_mut(address);
        let prev = std::mem::replace(&mut account.nonce, nonce);
        self.journal.push(JournalEntry::NonceChanged { address, prev });
    }

    fn code(&self, address: &Address) -> Bytes {
        self.accounts
            .get(address)
            .and_then(|a| self.code.get(&a.code_hash))
            .cloned()
            .unwrap_or_default()
    }

    fn set_code(&mut self, address: Address, code: Bytes) {
        let code_hash = self.store_code(code);
        let account = self.account_mut(address);
        let prev_hash = std::mem::replace(&mut account.code_hash, code_hash);
        self.journal
            .push(JournalEntry::CodeChanged { address, prev_hash });
    }

    fn storage(&self, address: &Address, key: &H256) -> H256 {
        self.storage
            .get(&(*address, *key))
            .copied()
            .unwrap_or_default()
    }

    fn set_storage(&mut self, address: Address, key: H256, value: H256) {
        let prev = if value.is_zero() {
            self.storage.remove(&(address, key))
        } else {
            self.storage.insert((address, key), value)
        };
        self.journal.push(JournalEntry::StorageChanged {
            address,
            key,
            prev: prev.unwrap_or_default(),
        });
    }

    fn touch(&mut self, address: Address) {
        self.mark_touched(address);
    }

    fn snapshot(&mut self) -> SnapshotId {
        SnapshotId::new(self.journal.len())
    }

    fn revert_to_snapshot(&mut self, id: SnapshotId) {
        let undone: Vec<JournalEntry> = self.journal.drain_to(id.index()).collect();
        tracing::trace!("Reverting to snapshot {} ({} entries)", id.index(), undone.len());
        for entry in undone {
            self.undo(entry);
        }
    }
}
