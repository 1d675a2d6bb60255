//! Contract frame: the per-invocation record handed to the interpreter

use bytes::Bytes;
use meridian_primitives::{Address, Gas, H256, U256};

/// One invocation's execution record.
///
/// `address` is where storage reads and writes land; `code_address` is where
/// the running code was loaded from. They differ for CallCode and
/// DelegateCall frames.
#[derive(Clone, Debug)]
pub struct Contract {
    /// Address that invoked this frame
    pub caller: Address,
    /// Address whose state this frame operates on
    pub address: Address,
    /// Value carried by the call
    pub value: U256,
    /// Account the code was loaded from; `None` for init code
    pub code_address: Option<Address>,
    /// Hash of `code`
    pub code_hash: H256,
    /// Code being executed
    pub code: Bytes,
    /// Frame inherits caller and value from its parent
    pub is_delegate: bool,
    /// State modification is forbidden
    pub is_static: bool,
    gas: Gas,
}

impl Contract {
    /// New frame with no code attached
    pub fn new(caller: Address, address: Address, value: U256, gas: Gas) -> Self {
        Self {
            caller,
            address,
            value,
            code_address: None,
            code_hash: H256::ZERO,
            code: Bytes::new(),
            is_delegate: false,
            is_static: false,
            gas,
        }
    }

    /// Mark as a delegate of `parent`: caller and value come from the parent
    pub fn as_delegate(mut self, parent: &Contract) -> Self {
        self.caller = parent.caller;
        self.value = parent.value;
        self.is_delegate = true;
        self
    }

    /// Mark as read-only
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Attach the code to run
    pub fn set_call_code(&mut self, code_address: Option<Address>, code_hash: H256, code: Bytes) {
        self.code_address = code_address;
        self.code_hash = code_hash;
        self.code = code;
    }

    /// Remaining gas
    pub fn gas(&self) -> Gas {
        self.gas
    }

    /// Deduct `amount`; returns false and leaves the counter alone when short
    pub fn use_gas(&mut self, amount: Gas) -> bool {
        if self.gas < amount {
            return false;
        }
        self.gas -= amount;
        true
    }

    /// Hand back `amount`, e.g. unused gas from a nested call
    pub fn refund_gas(&mut self, amount: Gas) {
        self.gas = self.gas.saturating_add(amount);
    }

    /// Burn everything left
    pub fn consume_all(&mut self) {
        self.gas = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    #[test]
    fn test_contract_new() {
        let contract = Contract::new(addr(1), addr(2), U256::from(5u64), 1000);
        assert_eq!(contract.caller, addr(1));
        assert_eq!(contract.address, addr(2));
        assert_eq!(contract.value, U256::from(5u64));
        assert_eq!(contract.gas(), 1000);
        assert!(contract.code.is_empty());
        assert!(!contract.is_delegate);
        assert!(!contract.is_static);
    }

    #[test]
    fn test_use_gas() {
        let mut contract = Contract::new(addr(1), addr(2), U256::zero(), 100);
        assert!(contract.use_gas(60));
        assert_eq!(contract.gas(), 40);
        assert!(!contract.use_gas(41));
        assert_eq!(contract.gas(), 40);
        assert!(contract.use_gas(40));
        assert_eq!(contract.gas(), 0);
    }

    #[test]
    fn test_refund_and_consume() {
        let mut contract = Contract::new(addr(1), addr(2), U256::zero(), 10);
        contract.refund_gas(5);
        assert_eq!(contract.gas(), 15);
        contract.consume_all();
        assert_eq!(contract.gas(), 0);
    }

    #[test]
    fn test_as_delegate_inherits_parent() {
        let parent = Contract::new(addr(1), addr(2), U256::from(77u64), 1000);
        let child = Contract::new(addr(2), addr(2), U256::zero(), 500).as_delegate(&parent);
        assert_eq!(child.caller, addr(1));
        assert_eq!(child.address, addr(2));
        assert_eq!(child.value, U256::from(77u64));
        assert!(child.is_delegate);
        assert_eq!(child.gas(), 500);
    }

    #[test]
    fn test_set_call_code() {
        let mut contract = Contract::new(addr(1), addr(1), U256::zero(), 0);
        contract.set_call_code(Some(addr(3)), H256::from_bytes([7; 32]), Bytes::from_static(&[0x00]));
        assert_eq!(contract.code_address, Some(addr(3)));
        assert_eq!(contract.code.len(), 1);
    }
}
