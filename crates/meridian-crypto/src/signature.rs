//! secp256k1 public key recovery

use crate::{keccak256, CryptoError};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};
use meridian_primitives::{Address, H256};
use std::cmp::Ordering;

/// Half of the secp256k1 curve order (n/2)
/// n/2 = 0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0
const SECP256K1_N_DIV_2: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D,
    0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Full secp256k1 curve order (n)
const SECP256K1_N: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B,
    0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Recoverable ECDSA signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// r component (32 bytes)
    pub r: [u8; 32],
    /// s component (32 bytes)
    pub s: [u8; 32],
    /// recovery id, either raw (0/1) or offset by 27
    pub v: u8,
}

/// Uncompressed secp256k1 public key
pub type PublicKey = VerifyingKey;

impl Signature {
    /// Create signature from r, s, v components
    pub fn new(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        Signature { r, s, v }
    }

    /// Get recovery ID (0 or 1 for well-formed signatures)
    pub fn recovery_id(&self) -> u8 {
        if self.v >= 27 {
            self.v - 27
        } else {
            self.v
        }
    }

    /// Check if signature has low-s value
    pub fn is_low_s(&self) -> bool {
        self.s.cmp(&SECP256K1_N_DIV_2) != Ordering::Greater
    }
}

/// n - s, used to move a high-s signature onto the low half of the curve order
fn subtract_from_n(s: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: u16 = 0;

    for i in (0..32).rev() {
        let diff = (SECP256K1_N[i] as u16)
            .wrapping_sub(s[i] as u16)
            .wrapping_sub(borrow);
        result[i] = diff as u8;
        borrow = if diff > 255 { 1 } else { 0 };
    }

    result
}

/// Recover the signer's public key from a signature over `message_hash`.
///
/// Both halves of the s range are accepted: a high-s signature is normalised
/// and its recovery parity flipped before recovery, which yields the same key.
pub fn recover_public_key(
    message_hash: &H256,
    signature: &Signature,
) -> Result<PublicKey, CryptoError> {
    let recovery = signature.recovery_id();
    if recovery > 1 {
        return Err(CryptoError::InvalidRecoveryId(signature.v));
    }

    let (s, recovery) = if signature.is_low_s() {
        (signature.s, recovery)
    } else {
        (subtract_from_n(&signature.s), recovery ^ 1)
    };

    let r: k256::FieldBytes = signature.r.into();
    let s: k256::FieldBytes = s.into();
    let k256_sig = K256Signature::from_scalars(r, s)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;

    let recovery_id =
        RecoveryId::try_from(recovery).map_err(|_| CryptoError::InvalidRecoveryId(signature.v))?;

    VerifyingKey::recover_from_prehash(message_hash.as_bytes(), &k256_sig, recovery_id)
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))
}

/// Derive the account address of a public key
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    // Uncompressed encoding: 0x04 || x || y
    let encoded = public_key.to_encoded_point(false);
    let hash = keccak256(&encoded.as_bytes()[1..]);

    let mut addr_bytes = [0u8; 20];
    addr_bytes.copy_from_slice(&hash.as_bytes()[12..]);
    Address::from_bytes(addr_bytes)
}

/// Recover the signer address of `message_hash`.
pub fn recover_address(message_hash: &H256, signature: &Signature) -> Result<Address, CryptoError> {
    recover_public_key(message_hash, signature).map(|key| public_key_to_address(&key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;
    use rand::rngs::OsRng;

    fn sign(message_hash: &H256, key: &SigningKey) -> Signature {
        let (sig, recovery_id) = key.sign_prehash_recoverable(message_hash.as_bytes()).unwrap();
        Signature::new(
            sig.r().to_bytes().into(),
            sig.s().to_bytes().into(),
            recovery_id.to_byte() + 27,
        )
    }

    #[test]
    fn test_recover_public_key() {
        let private_key = SigningKey::random(&mut OsRng);
        let message_hash = keccak256(b"test message");

        let signature = sign(&message_hash, &private_key);
        let recovered = recover_public_key(&message_hash, &signature).unwrap();

        assert_eq!(private_key.verifying_key(), &recovered);
    }

    #[test]
    fn test_recover_known_vector() {
        // ecrecover vector: hash 0x38d1..873e, v = 27
        let hash = H256::from_hex(
            "0x38d18acb67d25c8bb9942764b62f18e17054f66a817bd4295423adf9ed98873e",
        )
        .unwrap();
        let r = H256::from_hex(
            "0x38d18acb67d25c8bb9942764b62f18e17054f66a817bd4295423adf9ed98873e",
        )
        .unwrap();
        let s = H256::from_hex(
            "0x789d1dd423d25f0772d2748d60f7e4b81bb14d086eba8e8e8efb6dcff8a4ae02",
        )
        .unwrap();
        let signature = Signature::new(*r.as_bytes(), *s.as_bytes(), 27);

        let address = recover_address(&hash, &signature).unwrap();
        assert_eq!(address.to_hex(), "0xceaccac640adf55b2028469bd36ba501f28b699d");
    }

    #[test]
    fn test_recover_high_s_same_signer() {
        let private_key = SigningKey::random(&mut OsRng);
        let expected = public_key_to_address(private_key.verifying_key());
        let message_hash = keccak256(b"malleable");

        let low = sign(&message_hash, &private_key);
        let high = Signature::new(low.r, subtract_from_n(&low.s), 27 + (low.recovery_id() ^ 1));
        assert!(low.is_low_s());
        assert!(!high.is_low_s());

        assert_eq!(recover_address(&message_hash, &high).unwrap(), expected);
    }

    #[test]
    fn test_recover_rejects_bad_recovery_id() {
        let signature = Signature::new([1u8; 32], [1u8; 32], 29);
        assert_eq!(
            recover_address(&H256::ZERO, &signature),
            Err(CryptoError::InvalidRecoveryId(29))
        );
    }

    #[test]
    fn test_recover_rejects_zero_scalars() {
        let signature = Signature::new([0u8; 32], [0u8; 32], 27);
        assert!(matches!(
            recover_address(&H256::ZERO, &signature),
            Err(CryptoError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_subtract_from_n_round_trip() {
        let s = [0x11u8; 32];
        assert_eq!(subtract_from_n(&subtract_from_n(&s)), s);
    }
}
