//! Undo log backing snapshots

use crate::account::Account;
use meridian_primitives::{Address, Nonce, H256, U256};

/// One reversible state change, recording what it overwrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum JournalEntry {
    /// Account created or reset; `prev` is the record it replaced
    AccountCreated {
        address: Address,
        prev: Option<Account>,
    },
    BalanceChanged {
        address: Address,
        prev: U256,
    },
    NonceChanged {
        address: Address,
        prev: Nonce,
    },
    CodeChanged {
        address: Address,
        prev_hash: H256,
    },
    StorageChanged {
        address: Address,
        key: H256,
        prev: H256,
    },
    /// First touch since the last sweep
    Touched {
        address: Address,
    },
}

/// Append-only list of changes; snapshots are positions in it.
#[derive(Clone, Debug, Default)]
pub(crate) struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub(crate) fn push(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Pop entries newer than `position`, newest first.
    pub(crate) fn drain_to(&mut self, position: usize) -> impl Iterator<Item = JournalEntry> + '_ {
        let position = position.min(self.entries.len());
        self.entries.drain(position..).rev()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
