//! Bytecode interpreter seam

use crate::contract::Contract;
use crate::error::VmResult;
use crate::executive::Executive;
use meridian_state::AccountStore;

/// Runs a frame's code.
///
/// The interpreter receives the dispatcher so that CALL-family and CREATE
/// instructions re-enter it on the same logical stack; `executive.depth()`
/// already counts the frame being run. Gas is charged on `contract`.
/// Returning `Err(VmError::Revert(data))` keeps the frame's remaining gas;
/// any other error forfeits it.
pub trait Interpreter<S: AccountStore>: Sized {
    /// Execute `contract.code` with `input` as call data.
    fn run(
        &self,
        executive: &mut Executive<'_, S, Self>,
        contract: &mut Contract,
        input: &[u8],
        read_only: bool,
    ) -> VmResult<Vec<u8>>;
}
