//! Kerberos AES encryption types (RFC 3962)
//!
//! `aes128-cts-hmac-sha1-96` (etype 17) and `aes256-cts-hmac-sha1-96`
//! (etype 18). Both share the same construction and differ only in key size.
//!
//! ```text
//! base key + usage
//!        │
//!        ▼
//! DK → Ke, Ki
//!        │
//!        ▼
//! confounder ‖ plaintext ──CTS(Ke, IV=0)──► ciphertext
//!        │
//!        └──HMAC-SHA1(Ki)[..12]──────────► mac
//!
//! output = ciphertext ‖ mac
//! ```

pub mod derivation;
mod encryption;
pub mod nfold;
mod string_to_key;

use std::fmt;

pub use derivation::{KeyPurpose, KeyUsage, MAX_KEY_USAGE};
pub use encryption::{CONFOUNDER_LEN, MAC_LEN, checksum, decrypt, encrypt};
pub use string_to_key::{DEFAULT_ITERATIONS, string_to_key};

use crate::{aes::KeySize, error::CryptoError};

/// Kerberos AES encryption types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionType {
    /// `aes128-cts-hmac-sha1-96`
    Aes128CtsHmacSha196,
    /// `aes256-cts-hmac-sha1-96`
    Aes256CtsHmacSha196,
}

impl EncryptionType {
    /// AES key size used by this enctype.
    pub const fn key_size(self) -> KeySize {
        match self {
            Self::Aes128CtsHmacSha196 => KeySize::Aes128,
            Self::Aes256CtsHmacSha196 => KeySize::Aes256,
        }
    }

    /// Base key length in bytes.
    pub const fn key_len(self) -> usize {
        self.key_size().key_len()
    }

    /// IANA encryption type number.
    pub const fn etype_number(self) -> i32 {
        match self {
            Self::Aes128CtsHmacSha196 => 17,
            Self::Aes256CtsHmacSha196 => 18,
        }
    }

    /// IANA number of the matching `hmac-sha1-96-aes*` checksum type.
    pub const fn checksum_type_number(self) -> i32 {
        match self {
            Self::Aes128CtsHmacSha196 => 15,
            Self::Aes256CtsHmacSha196 => 16,
        }
    }

    /// Enctype name as registered.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aes128CtsHmacSha196 => "aes128-cts-hmac-sha1-96",
            Self::Aes256CtsHmacSha196 => "aes256-cts-hmac-sha1-96",
        }
    }

    /// Enctype for an IANA number.
    pub fn from_etype_number(number: i32) -> Option<Self> {
        match number {
            17 => Some(Self::Aes128CtsHmacSha196),
            18 => Some(Self::Aes256CtsHmacSha196),
            _ => None,
        }
    }

    /// Enctype whose keys a `hmac-sha1-96-aes*` checksum type number takes.
    pub fn from_checksum_type_number(number: i32) -> Option<Self> {
        [Self::Aes128CtsHmacSha196, Self::Aes256CtsHmacSha196]
            .into_iter()
            .find(|etype| etype.checksum_type_number() == number)
    }

    fn check_key(self, key: &[u8]) -> Result<(), CryptoError> {
        if key.len() != self.key_len() {
            return Err(CryptoError::InvalidKeyLength {
                expected: self.key_len(),
                actual: key.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for EncryptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
