//! Error types for primitive operations

use thiserror::Error;

/// Errors from hashing, block cipher and Kerberos operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Input is shorter than the operation accepts
    ///
    /// CTS needs at least one full block to steal from; Kerberos decryption
    /// needs at least a confounder and a checksum.
    #[error("invalid input length: need at least {minimum} bytes, got {actual}")]
    InvalidInputLength {
        /// Minimum accepted length
        minimum: usize,
        /// Actual input length
        actual: usize,
    },

    /// Key material has the wrong length for the cipher
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length
        expected: usize,
        /// Actual key length
        actual: usize,
    },

    /// Key usage number is outside the accepted range
    #[error("invalid key usage: {usage}")]
    InvalidKeyUsage {
        /// The rejected usage number
        usage: i64,
    },

    /// PBKDF2 iteration count of zero
    #[error("invalid iteration count: {iterations}")]
    InvalidIterationCount {
        /// The rejected iteration count
        iterations: u32,
    },

    /// Checksum over the decrypted data does not match the received one
    #[error("integrity check failed: checksum mismatch")]
    IntegrityCheckFailed,
}
