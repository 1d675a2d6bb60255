//! # meridian-state
//!
//! Account model and state access for the Meridian execution core.
//!
//! The dispatcher only talks to state through [`AccountStore`]; the
//! [`MemoryAccountStore`] implementation keeps everything in memory and
//! supports nested snapshots through an undo journal.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod account;
mod journal;
mod memory;
mod traits;

pub use account::{Account, EMPTY_CODE_HASH};
pub use memory::MemoryAccountStore;
pub use traits::{AccountStore, SnapshotId};
