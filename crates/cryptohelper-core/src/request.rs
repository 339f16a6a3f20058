//! Request and result values for generic dispatch

use std::fmt;

use cryptohelper_crypto::kerberos::MAC_LEN;

use crate::algorithm::AlgorithmKind;

/// Direction of a Kerberos enctype request.
///
/// Ignored by digest and checksum kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KrbMode {
    /// Confound, encrypt and MAC
    #[default]
    Encrypt,
    /// Verify and decrypt
    Decrypt,
}

/// One operation for [`crate::CryptoHelper::process`].
///
/// `input` is raw bytes in every mode: plaintext for hashing, encryption and
/// checksums, `ciphertext ‖ mac` for decryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    /// Algorithm to run
    pub algorithm: AlgorithmKind,
    /// Direction for enctype kinds
    pub mode: KrbMode,
    /// Input bytes
    pub input: &'a [u8],
    /// Hex-encoded base key, required by keyed kinds
    pub key: Option<&'a str>,
    /// Kerberos key usage, required by keyed kinds
    pub usage: Option<i64>,
}

impl<'a> Request<'a> {
    /// Digest request.
    pub fn hash(algorithm: AlgorithmKind, input: &'a [u8]) -> Self {
        Self { algorithm, mode: KrbMode::Encrypt, input, key: None, usage: None }
    }

    /// Encrypt (or checksum) request.
    pub fn encrypt(algorithm: AlgorithmKind, key: &'a str, usage: i64, input: &'a [u8]) -> Self {
        Self { algorithm, mode: KrbMode::Encrypt, input, key: Some(key), usage: Some(usage) }
    }

    /// Raw-key HMAC request; no usage.
    pub fn mac(algorithm: AlgorithmKind, key: &'a str, input: &'a [u8]) -> Self {
        Self { algorithm, mode: KrbMode::Encrypt, input, key: Some(key), usage: None }
    }

    /// Decrypt request over `ciphertext ‖ mac`.
    pub fn decrypt(algorithm: AlgorithmKind, key: &'a str, usage: i64, data: &'a [u8]) -> Self {
        Self { algorithm, mode: KrbMode::Decrypt, input: data, key: Some(key), usage: Some(usage) }
    }
}

/// What an [`Output`] holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Hash digest
    Digest,
    /// Kerberos `ciphertext ‖ mac`
    Ciphertext,
    /// Recovered plaintext
    Plaintext,
    /// Truncated HMAC checksum
    Checksum,
    /// Full-length HMAC under a raw key
    Mac,
}

/// Result bytes of a dispatched request.
#[derive(Clone, PartialEq, Eq)]
pub struct Output {
    algorithm: AlgorithmKind,
    kind: OutputKind,
    bytes: Vec<u8>,
}

impl Output {
    pub(crate) fn new(algorithm: AlgorithmKind, kind: OutputKind, bytes: Vec<u8>) -> Self {
        Self { algorithm, kind, bytes }
    }

    /// Algorithm that produced this output.
    pub fn algorithm(&self) -> AlgorithmKind {
        self.algorithm
    }

    /// What the bytes are.
    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume into raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Lower-case hex, two characters per byte.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Split Kerberos ciphertext into `(ciphertext, mac)`.
    ///
    /// The MAC is always the trailing 12 bytes, so slicing the last 24 hex
    /// characters off [`Output::to_hex`] yields the same split. Returns
    /// `None` for anything but ciphertext.
    pub fn split_mac(&self) -> Option<(&[u8], &[u8])> {
        if self.kind != OutputKind::Ciphertext || self.bytes.len() < MAC_LEN {
            return None;
        }
        Some(self.bytes.split_at(self.bytes.len() - MAC_LEN))
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("algorithm", &self.algorithm)
            .field("kind", &self.kind)
            .field("len", &self.bytes.len())
            .finish()
    }
}
