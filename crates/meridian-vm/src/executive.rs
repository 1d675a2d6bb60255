//! Execution dispatcher: message calls and contract creation

use crate::context::{BlockContext, TxContext};
use crate::contract::Contract;
use crate::error::{ExecutionResult, VmError, VmResult};
use crate::gas::{code_deposit_cost, MAX_CALL_DEPTH, MAX_CODE_SIZE};
use crate::interpreter::Interpreter;
use crate::precompiles::{AccountKind, PrecompileSet};
use crate::transfer::{can_transfer, transfer};
use bytes::Bytes;
use meridian_chainspec::ChainConfig;
use meridian_crypto::{create2_address, create_address, keccak256};
use meridian_primitives::{Address, BlockNumber, Gas, H256, U256};
use meridian_state::{AccountStore, EMPTY_CODE_HASH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CallKind {
    Call,
    CallCode,
    DelegateCall,
    StaticCall,
}

#[derive(Clone, Copy, Debug)]
enum CreateScheme {
    Create,
    Create2 { salt: U256 },
}

/// Addresses and budget of one message call
struct Message {
    kind: CallKind,
    caller: Address,
    /// Account whose state the frame runs against
    target: Address,
    /// Account the code comes from
    code_address: Address,
    value: U256,
    gas: Gas,
}

/// Dispatcher for one transaction's call tree.
///
/// Owns the call depth and borrows the state store, the fork rules and the
/// interpreter. Interpreters re-enter through the public entry points while
/// a frame is running, so the depth seen by a nested call already counts
/// every frame above it.
pub struct Executive<'a, S, I> {
    store: &'a mut S,
    rules: &'a ChainConfig,
    interpreter: &'a I,
    precompiles: PrecompileSet,
    block: BlockContext,
    tx: TxContext,
    depth: usize,
    read_only: bool,
}

impl<'a, S: AccountStore, I: Interpreter<S>> Executive<'a, S, I> {
    /// New dispatcher at depth zero with the original precompile set
    pub fn new(
        store: &'a mut S,
        rules: &'a ChainConfig,
        interpreter: &'a I,
        block: BlockContext,
        tx: TxContext,
    ) -> Self {
        Self {
            store,
            rules,
            interpreter,
            precompiles: PrecompileSet::frontier(),
            block,
            tx,
            depth: 0,
            read_only: false,
        }
    }

    /// Replace the precompile table
    pub fn with_precompiles(mut self, precompiles: PrecompileSet) -> Self {
        self.precompiles = precompiles;
        self
    }

    /// Start from an existing call depth
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Number of frames currently running
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether a static frame is anywhere on the current stack
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Current block number
    pub fn block_number(&self) -> BlockNumber {
        self.block.number
    }

    /// Block environment
    pub fn block(&self) -> &BlockContext {
        &self.block
    }

    /// Transaction environment
    pub fn tx(&self) -> &TxContext {
        &self.tx
    }

    /// Transaction origin
    pub fn origin(&self) -> Address {
        self.tx.origin
    }

    /// Fork rules
    pub fn rules(&self) -> &ChainConfig {
        self.rules
    }

    /// Precompile table
    pub fn precompiles(&self) -> &PrecompileSet {
        &self.precompiles
    }

    /// State store
    pub fn store(&self) -> &S {
        &*self.store
    }

    /// Mutable state store, for interpreter writes
    pub fn store_mut(&mut self) -> &mut S {
        &mut *self.store
    }

    // ==================== Message calls ====================

    /// Run `address`'s code against its own state, moving `value` to it.
    pub fn call(
        &mut self,
        caller: Address,
        address: Address,
        input: &[u8],
        gas: Gas,
        value: U256,
    ) -> ExecutionResult {
        let message = Message {
            kind: CallKind::Call,
            caller,
            target: address,
            code_address: address,
            value,
            gas,
        };
        self.message_call(message, input, None)
    }

    /// Run `address`'s code against the caller's own state.
    pub fn call_code(
        &mut self,
        caller: Address,
        address: Address,
        input: &[u8],
        gas: Gas,
        value: U256,
    ) -> ExecutionResult {
        let message = Message {
            kind: CallKind::CallCode,
            caller,
            target: caller,
            code_address: address,
            value,
            gas,
        };
        self.message_call(message, input, None)
    }

    /// Run `address`'s code in `parent`'s context.
    ///
    /// The frame keeps the parent's address, caller and value; no balance is
    /// checked or moved.
    pub fn delegate_call(
        &mut self,
        parent: &Contract,
        address: Address,
        input: &[u8],
        gas: Gas,
    ) -> ExecutionResult {
        let message = Message {
            kind: CallKind::DelegateCall,
            caller: parent.address,
            target: parent.address,
            code_address: address,
            value: parent.value,
            gas,
        };
        self.message_call(message, input, Some(parent))
    }

    /// Run `address`'s code with state modification forbidden.
    pub fn static_call(
        &mut self,
        caller: Address,
        address: Address,
        input: &[u8],
        gas: Gas,
    ) -> ExecutionResult {
        let message = Message {
            kind: CallKind::StaticCall,
            caller,
            target: address,
            code_address: address,
            value: U256::zero(),
            gas,
        };
        self.message_call(message, input, None)
    }

    fn message_call(
        &mut self,
        message: Message,
        input: &[u8],
        parent: Option<&Contract>,
    ) -> ExecutionResult {
        if self.depth > MAX_CALL_DEPTH {
            tracing::debug!("{:?} to {} rejected at depth {}", message.kind, message.code_address, self.depth);
            return ExecutionResult::failure(VmError::CallDepthExceeded, Vec::new(), message.gas);
        }
        if message.kind != CallKind::DelegateCall
            && !can_transfer(&*self.store, &message.caller, message.value)
        {
            tracing::debug!("{:?} from {} cannot cover value {}", message.kind, message.caller, message.value);
            return ExecutionResult::failure(VmError::InsufficientBalance, Vec::new(), message.gas);
        }

        let snapshot = self.store.snapshot();
        let block = self.block.number;

        if !self.store.exists(&message.target) {
            let empty_touch = message.kind != CallKind::DelegateCall
                && !self.precompiles.contains(&message.target)
                && self.rules.is_atlantis(block)
                && message.value.is_zero();
            if empty_touch {
                tracing::trace!("Skipping zero-value call to empty account {}", message.target);
                return ExecutionResult::success(Vec::new(), message.gas);
            }
            self.store.create_account(message.target);
        }

        if message.kind != CallKind::DelegateCall {
            transfer(&mut *self.store, message.caller, message.target, message.value);
        }

        let mut contract = Contract::new(message.caller, message.target, message.value, message.gas);
        if let Some(parent) = parent {
            contract = contract.as_delegate(parent);
        }
        let read_only = self.read_only || message.kind == CallKind::StaticCall;
        if read_only {
            contract = contract.as_static();
        }
        contract.set_call_code(
            Some(message.code_address),
            self.store.code_hash(&message.code_address),
            self.store.code(&message.code_address),
        );
        tracing::trace!(
            "{:?} frame: caller={} address={} code={} gas={} depth={}",
            message.kind,
            contract.caller,
            contract.address,
            message.code_address,
            message.gas,
            self.depth
        );

        let kind = self.precompiles.resolve(&message.code_address);
        match self.run_frame(kind, &mut contract, input, read_only) {
            Ok(output) => ExecutionResult::success(output, contract.gas()),
            Err(err) => {
                self.store.revert_to_snapshot(snapshot);
                let output = self.settle_failure(&err, &mut contract);
                tracing::debug!("{:?} to {} failed: {}", message.kind, message.code_address, err);
                ExecutionResult::failure(err, output, contract.gas())
            }
        }
    }

    // ==================== Contract creation ====================

    /// Deploy `code` at the address derived from the caller's nonce.
    pub fn create(&mut self, caller: Address, code: &[u8], gas: Gas, value: U256) -> ExecutionResult {
        self.create_contract(caller, code, gas, value, CreateScheme::Create)
    }

    /// Deploy `code` at the address derived from `salt` and the code hash.
    pub fn create2(
        &mut self,
        caller: Address,
        code: &[u8],
        gas: Gas,
        salt: U256,
        value: U256,
    ) -> ExecutionResult {
        self.create_contract(caller, code, gas, value, CreateScheme::Create2 { salt })
    }

    fn create_contract(
        &mut self,
        caller: Address,
        code: &[u8],
        gas: Gas,
        value: U256,
        scheme: CreateScheme,
    ) -> ExecutionResult {
        if self.depth > MAX_CALL_DEPTH {
            tracing::debug!("Creation by {} rejected at depth {}", caller, self.depth);
            return ExecutionResult::failure(VmError::CallDepthExceeded, Vec::new(), gas);
        }
        if !can_transfer(&*self.store, &caller, value) {
            tracing::debug!("Creation by {} cannot cover value {}", caller, value);
            return ExecutionResult::failure(VmError::InsufficientBalance, Vec::new(), gas);
        }

        let snapshot = self.store.snapshot();
        let block = self.block.number;
        let nonce = self.store.nonce(&caller);
        let address = match scheme {
            CreateScheme::Create => create_address(&caller, nonce),
            CreateScheme::Create2 { salt } => {
                create2_address(&caller, &H256::from_uint(&salt), &keccak256(code))
            }
        };

        if self.is_occupied(&address) {
            tracing::debug!("Creation by {} collides at {}", caller, address);
            return ExecutionResult::failure(VmError::ContractAddressCollision, Vec::new(), gas)
                .with_address(address);
        }
        let Some(next_nonce) = nonce.checked_add(1) else {
            return ExecutionResult::failure(VmError::NonceOverflow, Vec::new(), gas);
        };

        self.store.set_nonce(caller, next_nonce);
        self.store.create_account(address);
        if self.rules.is_atlantis(block) {
            self.store.set_nonce(address, 1);
        }
        transfer(&mut *self.store, caller, address, value);

        let read_only = self.read_only;
        let mut contract = Contract::new(caller, address, value, gas);
        if read_only {
            contract = contract.as_static();
        }
        contract.set_call_code(None, keccak256(code), Bytes::copy_from_slice(code));
        tracing::trace!(
            "{:?} frame: caller={} address={} gas={} depth={}",
            scheme,
            caller,
            address,
            gas,
            self.depth
        );

        let result = self
            .run_frame(AccountKind::Regular, &mut contract, &[], read_only)
            .and_then(|output| self.deposit_code(&mut contract, output));

        match result {
            Ok(output) => ExecutionResult::success(output, contract.gas()).with_address(address),
            Err(err) => {
                // Before Homestead a short code deposit keeps both state and gas
                let keeps_state = err == VmError::CodeStoreOutOfGas && !self.rules.is_homestead(block);
                let output = if keeps_state {
                    Vec::new()
                } else {
                    self.store.revert_to_snapshot(snapshot);
                    self.settle_failure(&err, &mut contract)
                };
                tracing::debug!("Creation of {} failed: {}", address, err);
                ExecutionResult::failure(err, output, contract.gas()).with_address(address)
            }
        }
    }

    /// Enforce the size limit and charge for storing the returned code.
    fn deposit_code(&mut self, contract: &mut Contract, output: Vec<u8>) -> VmResult<Vec<u8>> {
        if output.len() > MAX_CODE_SIZE && self.rules.is_atlantis(self.block.number) {
            return Err(VmError::MaxCodeSizeExceeded);
        }
        if !contract.use_gas(code_deposit_cost(output.len())) {
            return Err(VmError::CodeStoreOutOfGas);
        }
        self.store.set_code(contract.address, Bytes::from(output.clone()));
        Ok(output)
    }

    /// Non-zero nonce, or any code hash other than zero or the empty hash
    fn is_occupied(&self, address: &Address) -> bool {
        let code_hash = self.store.code_hash(address);
        self.store.nonce(address) != 0 || (!code_hash.is_zero() && code_hash != EMPTY_CODE_HASH)
    }

    // ==================== Frame execution ====================

    fn run_frame(
        &mut self,
        kind: AccountKind,
        contract: &mut Contract,
        input: &[u8],
        read_only: bool,
    ) -> VmResult<Vec<u8>> {
        if let AccountKind::Precompiled(precompile) = kind {
            if !contract.use_gas(precompile.required_gas(input)) {
                return Err(VmError::OutOfGas);
            }
            return precompile.run(input);
        }
        if contract.code.is_empty() {
            return Ok(Vec::new());
        }

        let interpreter = self.interpreter;
        let outer_read_only = std::mem::replace(&mut self.read_only, read_only);
        self.depth += 1;
        let result = interpreter.run(self, contract, input, read_only);
        self.depth -= 1;
        self.read_only = outer_read_only;
        result
    }

    /// Revert data is returned with the remaining gas; any other
    /// failure burns the gas and returns nothing.
    fn settle_failure(&self, err: &VmError, contract: &mut Contract) -> Vec<u8> {
        match err {
            VmError::Revert(data) => data.clone(),
            _ => {
                contract.consume_all();
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_chainspec::Fork;
    use meridian_state::{Account, MemoryAccountStore};

    /// Returns the first byte of code as output length, all zeros.
    struct Echo;

    impl<S: AccountStore> Interpreter<S> for Echo {
        fn run(
            &self,
            _executive: &mut Executive<'_, S, Self>,
            contract: &mut Contract,
            _input: &[u8],
            _read_only: bool,
        ) -> VmResult<Vec<u8>> {
            let len = contract.code.first().copied().unwrap_or(0) as usize;
            Ok(vec![0u8; len])
        }
    }

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    fn rules() -> ChainConfig {
        ChainConfig::new(vec![Fork::new("Homestead", 0), Fork::new("Atlantis", 0)]).unwrap()
    }

    fn funded() -> MemoryAccountStore {
        let mut store = MemoryAccountStore::new();
        store.insert_account(addr(0xaa), Account::with_balance(U256::from(1_000u64)));
        store
    }

    #[test]
    fn test_depth_starts_at_zero() {
        let mut store = funded();
        let rules = rules();
        let executive = Executive::new(&mut store, &rules, &Echo, BlockContext::default(), TxContext::default());
        assert_eq!(executive.depth(), 0);
        assert!(!executive.is_read_only());
    }

    #[test]
    fn test_is_occupied() {
        let mut store = funded();
        store.insert_account(addr(1), Account { nonce: 1, ..Account::new() });
        store.insert_contract(addr(2), U256::zero(), Bytes::from_static(&[0x00]));
        store.insert_account(addr(3), Account::with_balance(U256::from(5u64)));
        let rules = rules();
        let executive = Executive::new(&mut store, &rules, &Echo, BlockContext::default(), TxContext::default());
        assert!(executive.is_occupied(&addr(1)));
        assert!(executive.is_occupied(&addr(2)));
        assert!(!executive.is_occupied(&addr(3)));
        assert!(!executive.is_occupied(&addr(4)));
    }

    #[test]
    fn test_create_returns_deployed_code() {
        let mut store = funded();
        let rules = rules();
        let mut executive = Executive::new(&mut store, &rules, &Echo, BlockContext::default(), TxContext::default());
        let result = executive.create(addr(0xaa), &[3], 100_000, U256::zero());
        assert!(result.is_success());
        assert_eq!(result.output, vec![0, 0, 0]);
        assert_eq!(result.gas_left, 100_000 - 600);
        let address = result.address.unwrap();
        assert_eq!(store.code(&address).len(), 3);
    }

    #[test]
    fn test_empty_code_call_skips_interpreter() {
        let mut store = funded();
        store.insert_account(addr(7), Account::new());
        let rules = rules();
        let mut executive = Executive::new(&mut store, &rules, &Echo, BlockContext::default(), TxContext::default());
        let result = executive.call(addr(0xaa), addr(7), &[], 5_000, U256::from(10u64));
        assert!(result.is_success());
        assert_eq!(result.gas_left, 5_000);
        assert_eq!(store.balance(&addr(7)), U256::from(10u64));
    }
}
