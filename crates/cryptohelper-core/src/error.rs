//! Error types for the cryptohelper boundary.
//!
//! Every failure is reported as a typed `HelperError`; no operation returns
//! partial output. Faults inside the primitives are mapped onto these kinds
//! per direction (encrypt or decrypt) so callers see one error enum.

use cryptohelper_crypto::CryptoError;
use thiserror::Error;

use crate::algorithm::AlgorithmKind;

/// Errors returned by the helper operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HelperError {
    /// Input too short for the requested operation
    #[error("invalid input length: need at least {minimum} bytes, got {actual}")]
    InvalidInputLength {
        /// Minimum accepted length
        minimum: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// Key does not have the size the algorithm requires
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Required key length
        expected: usize,
        /// Length of the supplied key
        actual: usize,
    },

    /// Algorithm name not recognised, or not applicable to the operation
    #[error("unsupported algorithm: {name}")]
    UnsupportedAlgorithm {
        /// Name as given by the caller
        name: String,
    },

    /// Key usage outside the accepted range
    #[error("unsupported key usage: {usage}")]
    UnsupportedKeyUsage {
        /// Usage number as given by the caller
        usage: i64,
    },

    /// Request lacks a parameter its algorithm needs
    #[error("{algorithm} requires a {parameter}")]
    MissingParameter {
        /// Algorithm of the request
        algorithm: AlgorithmKind,
        /// Name of the missing parameter
        parameter: &'static str,
    },

    /// A hex-encoded argument did not decode
    #[error("invalid hex in {field}: {reason}")]
    InvalidHex {
        /// Which argument was malformed
        field: &'static str,
        /// Decoder message
        reason: String,
    },

    /// PBKDF2 iteration count of zero
    #[error("invalid iteration count: {iterations}")]
    InvalidIterationCount {
        /// Count that was supplied
        iterations: u32,
    },

    /// Internal cipher or HMAC fault while encrypting
    #[error("encryption failed: {reason}")]
    EncryptionFailed {
        /// Underlying fault
        reason: String,
    },

    /// Ciphertext could not be decrypted or failed its integrity check
    #[error("decryption failed: {reason}")]
    DecryptionFailed {
        /// Underlying fault
        reason: String,
    },
}

impl HelperError {
    /// Returns true if the error was caused by the caller's input.
    ///
    /// Caller errors are fixed by changing the request. The remaining kinds
    /// are either internal faults or data that does not authenticate.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Self::EncryptionFailed { .. } | Self::DecryptionFailed { .. })
    }

    /// Map a primitive failure on the encrypt (or checksum) path.
    pub(crate) fn encrypting(err: CryptoError) -> Self {
        Self::from_shared(err)
            .unwrap_or_else(|err| Self::EncryptionFailed { reason: err.to_string() })
    }

    /// Map a primitive failure on the decrypt path.
    pub(crate) fn decrypting(err: CryptoError) -> Self {
        Self::from_shared(err)
            .unwrap_or_else(|err| Self::DecryptionFailed { reason: err.to_string() })
    }

    fn from_shared(err: CryptoError) -> Result<Self, CryptoError> {
        match err {
            CryptoError::InvalidInputLength { minimum, actual } => {
                Ok(Self::InvalidInputLength { minimum, actual })
            },
            CryptoError::InvalidKeyLength { expected, actual } => {
                Ok(Self::InvalidKeyLength { expected, actual })
            },
            CryptoError::InvalidKeyUsage { usage } => Ok(Self::UnsupportedKeyUsage { usage }),
            CryptoError::InvalidIterationCount { iterations } => {
                Ok(Self::InvalidIterationCount { iterations })
            },
            CryptoError::IntegrityCheckFailed => Err(err),
        }
    }
}
