//! Key derivation for the AES enctypes (RFC 3961 §5.1, RFC 3962 §5)
//!
//! ```text
//! base key ──┬── DK(usage || 0xAA) → Ke   (CTS encryption)
//!            ├── DK(usage || 0x55) → Ki   (HMAC-SHA1 integrity)
//!            └── DK(usage || 0x99) → Kc   (HMAC-SHA1 checksum)
//! ```

use std::fmt;

use zeroize::Zeroizing;

use super::nfold::n_fold;
use crate::{
    aes::{AesKeySchedule, BLOCK_LEN},
    error::CryptoError,
};

/// Largest key usage number accepted.
///
/// Covers the RFC 4120 assignments, the implementation-internal range
/// 512-1023 and the application range 1024-2047.
pub const MAX_KEY_USAGE: u32 = 2047;

/// A validated Kerberos key usage number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyUsage(u32);

impl KeyUsage {
    /// Validate a usage number.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyUsage`: negative or above [`MAX_KEY_USAGE`]
    pub fn new(usage: i64) -> Result<Self, CryptoError> {
        match u32::try_from(usage) {
            Ok(value) if value <= MAX_KEY_USAGE => Ok(Self(value)),
            _ => Err(CryptoError::InvalidKeyUsage { usage }),
        }
    }

    /// Usage number.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Which derived key a constant selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPurpose {
    /// `Ke`, encrypts the confounded plaintext
    Encryption,
    /// `Ki`, keys the HMAC appended to ciphertext
    Integrity,
    /// `Kc`, keys standalone checksums
    Checksum,
}

impl KeyPurpose {
    /// Trailing octet of the derivation constant.
    pub const fn octet(self) -> u8 {
        match self {
            Self::Encryption => 0xAA,
            Self::Integrity => 0x55,
            Self::Checksum => 0x99,
        }
    }
}

/// Derivation constant: usage as 4 bytes big-endian followed by the purpose
/// octet.
pub fn usage_constant(usage: KeyUsage, purpose: KeyPurpose) -> [u8; 5] {
    let mut constant = [0u8; 5];
    constant[..4].copy_from_slice(&usage.value().to_be_bytes());
    constant[4] = purpose.octet();
    constant
}

/// `DR(base_key, constant)`: n-fold the constant to one block, then encrypt
/// it repeatedly, each output feeding the next, until key-length bytes exist.
///
/// # Errors
///
/// - `InvalidKeyLength`: base key is not an AES key
pub fn derive_random(
    base_key: &[u8],
    constant: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let schedule = AesKeySchedule::new(base_key)?;
    let key_len = base_key.len();

    let mut block = [0u8; BLOCK_LEN];
    block.copy_from_slice(&n_fold(constant, BLOCK_LEN));

    let mut output = Zeroizing::new(Vec::with_capacity(key_len.next_multiple_of(BLOCK_LEN)));
    while output.len() < key_len {
        block = schedule.encrypt_block(&block);
        output.extend_from_slice(&block);
    }
    output.truncate(key_len);

    Ok(output)
}

/// `DK(base_key, constant) = random-to-key(DR(base_key, constant))`.
///
/// random-to-key is the identity for AES.
///
/// # Errors
///
/// - `InvalidKeyLength`: base key is not an AES key
pub fn derive_key(base_key: &[u8], constant: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    derive_random(base_key, constant)
}

/// Derive the `purpose` key for `usage`.
///
/// # Errors
///
/// - `InvalidKeyLength`: base key is not an AES key
pub fn derive_usage_key(
    base_key: &[u8],
    usage: KeyUsage,
    purpose: KeyPurpose,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    derive_key(base_key, &usage_constant(usage, purpose))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(value: i64) -> KeyUsage {
        KeyUsage::new(value).unwrap()
    }

    #[test]
    fn usage_range_validation() {
        assert!(KeyUsage::new(0).is_ok());
        assert!(KeyUsage::new(2047).is_ok());
        assert_eq!(KeyUsage::new(-1), Err(CryptoError::InvalidKeyUsage { usage: -1 }));
        assert_eq!(KeyUsage::new(2048), Err(CryptoError::InvalidKeyUsage { usage: 2048 }));
        assert!(KeyUsage::new(i64::MAX).is_err());
    }

    #[test]
    fn constant_layout() {
        assert_eq!(
            usage_constant(usage(0x0102), KeyPurpose::Encryption),
            [0x00, 0x00, 0x01, 0x02, 0xAA]
        );
        assert_eq!(usage_constant(usage(5), KeyPurpose::Integrity), [0, 0, 0, 5, 0x55]);
        assert_eq!(usage_constant(usage(5), KeyPurpose::Checksum), [0, 0, 0, 5, 0x99]);
    }

    #[test]
    fn encryption_key_known_answer() {
        let base: Vec<u8> = (0..32).collect();
        let ke = derive_usage_key(&base, usage(2), KeyPurpose::Encryption).unwrap();
        let hex: String = ke.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(hex, "90b18aa785bc5c8349d59b36d76f03a9b30e802a90fccd5da18ab39b64dc5c55");
    }

    #[test]
    fn derived_key_has_base_key_length() {
        let key128 = derive_key(&[0x11; 16], b"kerberos").unwrap();
        let key256 = derive_key(&[0x11; 32], b"kerberos").unwrap();
        assert_eq!(key128.len(), 16);
        assert_eq!(key256.len(), 32);
    }

    #[test]
    fn purposes_produce_separate_keys() {
        let base = [0x5c; 32];
        let ke = derive_usage_key(&base, usage(3), KeyPurpose::Encryption).unwrap();
        let ki = derive_usage_key(&base, usage(3), KeyPurpose::Integrity).unwrap();
        let kc = derive_usage_key(&base, usage(3), KeyPurpose::Checksum).unwrap();

        assert_ne!(*ke, *ki);
        assert_ne!(*ke, *kc);
        assert_ne!(*ki, *kc);
    }

    #[test]
    fn derivation_is_deterministic() {
        let base = [0x01; 16];
        let a = derive_usage_key(&base, usage(7), KeyPurpose::Encryption).unwrap();
        let b = derive_usage_key(&base, usage(7), KeyPurpose::Encryption).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn rejects_non_aes_key() {
        assert!(matches!(
            derive_key(&[0u8; 24], b"kerberos"),
            Err(CryptoError::InvalidKeyLength { actual: 24, .. })
        ));
    }
}
