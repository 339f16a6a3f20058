//! Cryptohelper boundary
//!
//! Hex-in, hex-out operations over `cryptohelper-crypto`. Callers name an
//! algorithm, pass text or raw bytes, and get a lower-case hex string back.
//!
//! ```text
//! name ──parse──► AlgorithmKind
//!                      │
//!                      ▼
//! Request ──► CryptoHelper::process ──► Output ──► hex
//!                      │
//!                      └── Environment (confounders)
//! ```
//!
//! The free functions use [`SystemEnv`]; [`CryptoHelper`] takes any
//! [`Environment`] so encryption can be made reproducible in tests.
//!
//! # Output convention
//!
//! Kerberos encryption output is `ciphertext ‖ mac` with the MAC always the
//! trailing 12 bytes. Slicing the last 24 characters off the hex string
//! separates the two.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod algorithm;
pub mod env;
pub mod error;
mod helper;
pub mod request;

pub use algorithm::AlgorithmKind;
use cryptohelper_crypto::{HashAlgorithm, hash, kerberos};
pub use env::{Environment, FixedEnv, SystemEnv};
pub use error::HelperError;
pub use helper::CryptoHelper;
pub use request::{KrbMode, Output, OutputKind, Request};

/// PBKDF2 iteration count used by [`string_to_key`] callers that have none
pub const DEFAULT_ITERATIONS: u32 = kerberos::DEFAULT_ITERATIONS;

/// MD5 of `input` as 32 hex characters.
///
/// For legacy fingerprints; MD5 offers no collision resistance.
pub fn md5(input: &[u8]) -> String {
    hex::encode(hash(HashAlgorithm::Md5, input))
}

/// SHA-1 of `input` as 40 hex characters.
pub fn sha1(input: &[u8]) -> String {
    hex::encode(hash(HashAlgorithm::Sha1, input))
}

/// SHA-256 of `input` as 64 hex characters.
pub fn sha256(input: &[u8]) -> String {
    hex::encode(hash(HashAlgorithm::Sha256, input))
}

/// SHA-384 of `input` as 96 hex characters.
pub fn sha384(input: &[u8]) -> String {
    hex::encode(hash(HashAlgorithm::Sha384, input))
}

/// SHA-512 of `input` as 128 hex characters.
pub fn sha512(input: &[u8]) -> String {
    hex::encode(hash(HashAlgorithm::Sha512, input))
}

/// HMAC-SHA256 of `payload` under a hex key, as used by JWT `HS256`.
///
/// # Errors
///
/// - `InvalidHex`: key is not hex
pub fn hmac_sha256(key_hex: &str, payload: &[u8]) -> Result<String, HelperError> {
    CryptoHelper::system().hmac_sha256(key_hex, payload)
}

/// HMAC-SHA512 of `payload` under a hex key, as used by JWT `HS512`.
///
/// # Errors
///
/// - `InvalidHex`: key is not hex
pub fn hmac_sha512(key_hex: &str, payload: &[u8]) -> Result<String, HelperError> {
    CryptoHelper::system().hmac_sha512(key_hex, payload)
}

/// Encrypt `payload` with `aes256-cts-hmac-sha1-96` under a hex key.
///
/// Output is hex of `ciphertext ‖ mac`, `2 * (16 + payload.len() + 12)`
/// characters. The confounder comes from the OS RNG.
///
/// # Errors
///
/// - `InvalidHex`: key is not hex
/// - `InvalidKeyLength`: key is not 32 bytes
/// - `UnsupportedKeyUsage`: usage outside `0..=2047`
pub fn aes256_cts_hmac_sha1_96_encrypt(
    key_hex: &str,
    usage: i64,
    payload: &[u8],
) -> Result<String, HelperError> {
    CryptoHelper::system().aes256_cts_hmac_sha1_96_encrypt(key_hex, usage, payload)
}

/// Encrypt `payload` with `aes128-cts-hmac-sha1-96` under a hex key.
///
/// # Errors
///
/// - `InvalidHex`: key is not hex
/// - `InvalidKeyLength`: key is not 16 bytes
/// - `UnsupportedKeyUsage`: usage outside `0..=2047`
pub fn aes128_cts_hmac_sha1_96_encrypt(
    key_hex: &str,
    usage: i64,
    payload: &[u8],
) -> Result<String, HelperError> {
    CryptoHelper::system().aes128_cts_hmac_sha1_96_encrypt(key_hex, usage, payload)
}

/// Decrypt hex `ciphertext ‖ mac` with `aes256-cts-hmac-sha1-96`.
///
/// # Errors
///
/// - `InvalidHex`: key or data is not hex
/// - `InvalidKeyLength`: key is not 32 bytes
/// - `InvalidInputLength`: data shorter than 28 bytes
/// - `DecryptionFailed`: integrity check failed
pub fn aes256_cts_hmac_sha1_96_decrypt(
    key_hex: &str,
    usage: i64,
    data_hex: &str,
) -> Result<String, HelperError> {
    CryptoHelper::system().aes256_cts_hmac_sha1_96_decrypt(key_hex, usage, data_hex)
}

/// Decrypt hex `ciphertext ‖ mac` with `aes128-cts-hmac-sha1-96`.
///
/// # Errors
///
/// - `InvalidHex`: key or data is not hex
/// - `InvalidKeyLength`: key is not 16 bytes
/// - `InvalidInputLength`: data shorter than 28 bytes
/// - `DecryptionFailed`: integrity check failed
pub fn aes128_cts_hmac_sha1_96_decrypt(
    key_hex: &str,
    usage: i64,
    data_hex: &str,
) -> Result<String, HelperError> {
    CryptoHelper::system().aes128_cts_hmac_sha1_96_decrypt(key_hex, usage, data_hex)
}

/// `hmac-sha1-96-aes256` checksum of `payload`, 24 hex characters.
///
/// # Errors
///
/// - `InvalidHex`: key is not hex
/// - `InvalidKeyLength`: key is not 32 bytes
/// - `UnsupportedKeyUsage`: usage outside `0..=2047`
pub fn hmac_sha1_96_aes256(
    key_hex: &str,
    usage: i64,
    payload: &[u8],
) -> Result<String, HelperError> {
    CryptoHelper::system().hmac_sha1_96_aes256(key_hex, usage, payload)
}

/// `hmac-sha1-96-aes128` checksum of `payload`, 24 hex characters.
///
/// # Errors
///
/// - `InvalidHex`: key is not hex
/// - `InvalidKeyLength`: key is not 16 bytes
/// - `UnsupportedKeyUsage`: usage outside `0..=2047`
pub fn hmac_sha1_96_aes128(
    key_hex: &str,
    usage: i64,
    payload: &[u8],
) -> Result<String, HelperError> {
    CryptoHelper::system().hmac_sha1_96_aes128(key_hex, usage, payload)
}

/// Derive a hex Kerberos key from a password and salt.
///
/// `algorithm` names either enctype or either checksum type; the key size
/// follows from it.
///
/// # Errors
///
/// - `UnsupportedAlgorithm`: `algorithm` is not a Kerberos kind
/// - `InvalidIterationCount`: `iterations` is zero
pub fn string_to_key(
    algorithm: AlgorithmKind,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<String, HelperError> {
    let Some(etype) = algorithm.encryption_type() else {
        tracing::warn!(algorithm = %algorithm, "string-to-key requested for a non-Kerberos kind");
        return Err(HelperError::UnsupportedAlgorithm { name: algorithm.to_string() });
    };

    tracing::debug!(algorithm = %algorithm, iterations, "Deriving key from password");
    let key = kerberos::string_to_key(etype, password, salt, iterations)
        .map_err(HelperError::encrypting)?;
    Ok(hex::encode(&*key))
}
