//! VM error types

use meridian_primitives::{Address, Gas};
use thiserror::Error;

/// Execution failure classes.
///
/// The dispatcher itself only distinguishes [`VmError::Revert`] from every
/// other failure: a revert returns the frame's remaining gas, anything else
/// consumes it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VmError {
    /// Call depth exceeded
    #[error("max call depth exceeded")]
    CallDepthExceeded,

    /// Insufficient balance for transfer
    #[error("insufficient balance for transfer")]
    InsufficientBalance,

    /// Contract creation collision
    #[error("contract address collision")]
    ContractAddressCollision,

    /// Deployed code over the size limit
    #[error("max code size exceeded")]
    MaxCodeSizeExceeded,

    /// Not enough gas left to pay for storing the deployed code
    #[error("contract creation code storage out of gas")]
    CodeStoreOutOfGas,

    /// Creator nonce cannot be incremented
    #[error("nonce overflow")]
    NonceOverflow,

    /// Execution reverted; carries the revert data
    #[error("execution reverted")]
    Revert(Vec<u8>),

    /// Out of gas
    #[error("out of gas")]
    OutOfGas,

    /// Invalid opcode
    #[error("invalid opcode: 0x{0:02x}")]
    InvalidOpcode(u8),

    /// Stack underflow
    #[error("stack underflow")]
    StackUnderflow,

    /// Stack overflow
    #[error("stack overflow (max 1024)")]
    StackOverflow,

    /// Invalid jump destination
    #[error("invalid jump destination: {0}")]
    InvalidJump(usize),

    /// Write in static context
    #[error("state modification in static context")]
    StaticCallViolation,
}

impl VmError {
    /// Check if this is the revert outcome
    pub fn is_revert(&self) -> bool {
        matches!(self, VmError::Revert(_))
    }
}

/// Result type for VM operations
pub type VmResult<T> = Result<T, VmError>;

/// Outcome of one dispatcher entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Return data, revert data, or the deployed code for creations
    pub output: Vec<u8>,
    /// Gas handed back to the caller
    pub gas_left: Gas,
    /// Derived address for creations that got far enough to derive one
    pub address: Option<Address>,
    /// Failure, if any
    pub error: Option<VmError>,
}

impl ExecutionResult {
    /// Create a successful result
    pub fn success(output: Vec<u8>, gas_left: Gas) -> Self {
        Self {
            output,
            gas_left,
            address: None,
            error: None,
        }
    }

    /// Create a failed result
    pub fn failure(error: VmError, output: Vec<u8>, gas_left: Gas) -> Self {
        Self {
            output,
            gas_left,
            address: None,
            error: Some(error),
        }
    }

    /// Attach the created address
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Whether execution succeeded
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Whether execution ended in a revert
    pub fn is_revert(&self) -> bool {
        self.error.as_ref().is_some_and(VmError::is_revert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(format!("{}", VmError::CallDepthExceeded), "max call depth exceeded");
        assert_eq!(
            format!("{}", VmError::InsufficientBalance),
            "insufficient balance for transfer"
        );
        assert_eq!(
            format!("{}", VmError::ContractAddressCollision),
            "contract address collision"
        );
        assert_eq!(format!("{}", VmError::MaxCodeSizeExceeded), "max code size exceeded");
        assert_eq!(
            format!("{}", VmError::CodeStoreOutOfGas),
            "contract creation code storage out of gas"
        );
        assert_eq!(format!("{}", VmError::Revert(vec![1])), "execution reverted");
        assert_eq!(format!("{}", VmError::InvalidOpcode(0xFE)), "invalid opcode: 0xfe");
        assert_eq!(format!("{}", VmError::InvalidJump(100)), "invalid jump destination: 100");
    }

    #[test]
    fn test_is_revert() {
        assert!(VmError::Revert(Vec::new()).is_revert());
        assert!(!VmError::OutOfGas.is_revert());
        assert!(!VmError::CodeStoreOutOfGas.is_revert());
    }

    #[test]
    fn test_result_constructors() {
        let ok = ExecutionResult::success(vec![1, 2], 50);
        assert!(ok.is_success());
        assert!(!ok.is_revert());
        assert_eq!(ok.address, None);

        let reverted = ExecutionResult::failure(VmError::Revert(vec![9]), vec![9], 10);
        assert!(!reverted.is_success());
        assert!(reverted.is_revert());

        let created = ExecutionResult::success(Vec::new(), 0).with_address(Address::ZERO);
        assert_eq!(created.address, Some(Address::ZERO));
    }
}
