//! Cryptohelper Cryptographic Primitives
//!
//! Self-contained hash, block cipher and Kerberos building blocks. Pure
//! functions with deterministic outputs. Callers provide random bytes
//! (confounders) for deterministic testing.
//!
//! # Layering
//!
//! ```text
//! hash (MD5, SHA-1, SHA-256, SHA-384, SHA-512)
//!        │
//!        ▼
//! hmac ─────────────────────┐
//!                           │
//! aes (block permutation)   │
//!        │                  │
//!        ▼                  ▼
//! cts (RFC 3962 CBC-CS3) ──► kerberos (DK, encrypt, checksum, string-to-key)
//! ```
//!
//! # Security
//!
//! Key material:
//! - AES round keys, HMAC pads and the keyed inner hash state are zeroized
//!   on drop
//! - Derived Kerberos keys are returned as `Zeroizing<Vec<u8>>`
//!
//! Side channels:
//! - The AES S-box is computed arithmetically, not looked up by secret index
//! - MAC comparison does not exit early on the first differing byte
//!
//! Integrity:
//! - Kerberos ciphertext always carries a 96-bit HMAC-SHA1 tag
//! - A failed tag check returns `IntegrityCheckFailed` and no plaintext

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod aes;
pub mod cts;
pub mod error;
pub mod hash;
pub mod hmac;
pub mod kerberos;

pub use aes::{AesKeySchedule, BLOCK_LEN, Block, KeySize};
pub use error::CryptoError;
pub use hash::{Digest, HashAlgorithm, hash};
pub use hmac::{constant_time_eq, hmac, hmac_sha1};
pub use kerberos::{EncryptionType, KeyUsage};
