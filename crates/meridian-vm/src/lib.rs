//! # meridian-vm
//!
//! Message-call and contract-creation dispatcher.
//!
//! This crate provides:
//! - The six entry points (`call`, `call_code`, `delegate_call`,
//!   `static_call`, `create`, `create2`) on [`Executive`]
//! - Contract frames and value transfer
//! - The native precompiled accounts
//! - The [`Interpreter`] seam a bytecode interpreter plugs into
//!
//! Fork-dependent behaviour is read from a
//! [`meridian_chainspec::ChainConfig`] passed in by reference.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod context;
mod contract;
mod error;
mod executive;
pub mod gas;
mod interpreter;
mod precompiles;
mod transfer;

pub use context::{BlockContext, TxContext};
pub use contract::Contract;
pub use error::{ExecutionResult, VmError, VmResult};
pub use executive::Executive;
pub use interpreter::Interpreter;
pub use precompiles::{AccountKind, Precompile, PrecompileSet};
pub use transfer::{can_transfer, transfer};
