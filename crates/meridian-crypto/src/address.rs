//! Contract address derivation

use crate::keccak256;
use meridian_primitives::{Address, Nonce, H256};
use rlp::RlpStream;

fn address_from_hash(hash: &H256) -> Address {
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash.as_bytes()[12..]);
    Address::from_bytes(bytes)
}

/// Address of a contract created by `sender` with account nonce `nonce`:
/// `keccak256(rlp([sender, nonce]))[12..]`.
pub fn create_address(sender: &Address, nonce: Nonce) -> Address {
    let mut stream = RlpStream::new_list(2);
    stream.append(sender);
    stream.append(&nonce);
    address_from_hash(&keccak256(&stream.out()))
}

/// Address of a salted creation:
/// `keccak256(0xff ++ sender ++ salt ++ code_hash)[12..]`.
pub fn create2_address(sender: &Address, salt: &H256, code_hash: &H256) -> Address {
    let mut preimage = [0u8; 1 + 20 + 32 + 32];
    preimage[0] = 0xff;
    preimage[1..21].copy_from_slice(sender.as_bytes());
    preimage[21..53].copy_from_slice(salt.as_bytes());
    preimage[53..].copy_from_slice(code_hash.as_bytes());
    address_from_hash(&keccak256(&preimage))
}
