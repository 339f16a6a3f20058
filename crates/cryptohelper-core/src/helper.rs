//! Dispatch over [`AlgorithmKind`] with confounders from an [`Environment`]

use cryptohelper_crypto::{
    EncryptionType, HashAlgorithm, KeyUsage, hash, hmac,
    kerberos::{self, CONFOUNDER_LEN, MAC_LEN},
};
use zeroize::Zeroizing;

use crate::{
    algorithm::AlgorithmKind,
    env::{Environment, SystemEnv},
    error::HelperError,
    request::{KrbMode, Output, OutputKind, Request},
};

/// Runs helper operations, drawing confounders from `E`.
///
/// Holds no state besides the environment; one instance can serve any number
/// of calls from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct CryptoHelper<E: Environment = SystemEnv> {
    env: E,
}

impl CryptoHelper<SystemEnv> {
    /// Helper using OS randomness.
    #[must_use]
    pub fn system() -> Self {
        Self::new(SystemEnv::new())
    }
}

impl<E: Environment> CryptoHelper<E> {
    /// Helper using `env` for confounders.
    pub fn new(env: E) -> Self {
        Self { env }
    }

    /// Dispatch `request` by its algorithm.
    ///
    /// # Errors
    ///
    /// - `MissingParameter`: keyed kind without key, or Kerberos kind without
    ///   usage
    /// - `InvalidHex`: key is not hex
    /// - `InvalidKeyLength`: key size does not match the algorithm
    /// - `UnsupportedKeyUsage`: usage outside `0..=2047`
    /// - `InvalidInputLength`: decrypt input shorter than 28 bytes
    /// - `DecryptionFailed`: integrity check failed
    pub fn process(&self, request: &Request<'_>) -> Result<Output, HelperError> {
        let algorithm = request.algorithm;
        tracing::debug!(
            algorithm = %algorithm,
            mode = ?request.mode,
            input_len = request.input.len(),
            "Dispatching request"
        );

        let result = self.dispatch(request);
        if let Err(e) = &result {
            tracing::warn!(algorithm = %algorithm, error = %e, "Request rejected");
        }
        result
    }

    fn dispatch(&self, request: &Request<'_>) -> Result<Output, HelperError> {
        let algorithm = request.algorithm;
        match algorithm {
            AlgorithmKind::Md5 => Ok(digest(algorithm, HashAlgorithm::Md5, request.input)),
            AlgorithmKind::Sha1 => Ok(digest(algorithm, HashAlgorithm::Sha1, request.input)),
            AlgorithmKind::Sha256 => Ok(digest(algorithm, HashAlgorithm::Sha256, request.input)),
            AlgorithmKind::Sha384 => Ok(digest(algorithm, HashAlgorithm::Sha384, request.input)),
            AlgorithmKind::Sha512 => Ok(digest(algorithm, HashAlgorithm::Sha512, request.input)),
            AlgorithmKind::HmacSha256 => mac(request, HashAlgorithm::Sha256),
            AlgorithmKind::HmacSha512 => mac(request, HashAlgorithm::Sha512),
            AlgorithmKind::Aes128CtsHmacSha196 | AlgorithmKind::Aes256CtsHmacSha196 => {
                let (etype, key, usage) = keyed_params(request)?;
                match request.mode {
                    KrbMode::Encrypt => {
                        let bytes = self.encrypt_bytes(etype, &key, usage, request.input)?;
                        Ok(Output::new(algorithm, OutputKind::Ciphertext, bytes))
                    },
                    KrbMode::Decrypt => {
                        let bytes = decrypt_bytes(etype, &key, usage, request.input)?;
                        Ok(Output::new(algorithm, OutputKind::Plaintext, bytes))
                    },
                }
            },
            AlgorithmKind::HmacSha196Aes128 | AlgorithmKind::HmacSha196Aes256 => {
                let (etype, key, usage) = keyed_params(request)?;
                let mac = kerberos::checksum(etype, &key, usage, request.input)
                    .map_err(HelperError::encrypting)?;
                Ok(Output::new(algorithm, OutputKind::Checksum, mac.to_vec()))
            },
        }
    }

    fn encrypt_bytes(
        &self,
        etype: EncryptionType,
        key: &[u8],
        usage: KeyUsage,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, HelperError> {
        let confounder = Zeroizing::new(self.env.confounder());
        let encrypted = kerberos::encrypt(etype, key, usage, plaintext, &confounder)
            .map_err(HelperError::encrypting)?;

        debug_assert_eq!(encrypted.len(), CONFOUNDER_LEN + plaintext.len() + MAC_LEN);
        Ok(encrypted)
    }

    /// HMAC-SHA256 of `payload` under a hex key of any length, 64 hex
    /// characters.
    ///
    /// # Errors
    ///
    /// - `InvalidHex`: key is not hex
    pub fn hmac_sha256(&self, key_hex: &str, payload: &[u8]) -> Result<String, HelperError> {
        self.process(&Request::mac(AlgorithmKind::HmacSha256, key_hex, payload))
            .map(|output| output.to_hex())
    }

    /// HMAC-SHA512 of `payload` under a hex key of any length, 128 hex
    /// characters.
    ///
    /// # Errors
    ///
    /// - `InvalidHex`: key is not hex
    pub fn hmac_sha512(&self, key_hex: &str, payload: &[u8]) -> Result<String, HelperError> {
        self.process(&Request::mac(AlgorithmKind::HmacSha512, key_hex, payload))
            .map(|output| output.to_hex())
    }

    /// `aes256-cts-hmac-sha1-96` encryption, hex in and hex out.
    ///
    /// # Errors
    ///
    /// - `InvalidHex`: key is not hex
    /// - `InvalidKeyLength`: key is not 32 bytes
    /// - `UnsupportedKeyUsage`: usage outside `0..=2047`
    pub fn aes256_cts_hmac_sha1_96_encrypt(
        &self,
        key_hex: &str,
        usage: i64,
        payload: &[u8],
    ) -> Result<String, HelperError> {
        self.process(&Request::encrypt(AlgorithmKind::Aes256CtsHmacSha196, key_hex, usage, payload))
            .map(|output| output.to_hex())
    }

    /// `aes128-cts-hmac-sha1-96` encryption, hex in and hex out.
    ///
    /// # Errors
    ///
    /// - `InvalidHex`: key is not hex
    /// - `InvalidKeyLength`: key is not 16 bytes
    /// - `UnsupportedKeyUsage`: usage outside `0..=2047`
    pub fn aes128_cts_hmac_sha1_96_encrypt(
        &self,
        key_hex: &str,
        usage: i64,
        payload: &[u8],
    ) -> Result<String, HelperError> {
        self.process(&Request::encrypt(AlgorithmKind::Aes128CtsHmacSha196, key_hex, usage, payload))
            .map(|output| output.to_hex())
    }

    /// `aes256-cts-hmac-sha1-96` decryption of hex `ciphertext ‖ mac`.
    ///
    /// Returns the plaintext as hex.
    ///
    /// # Errors
    ///
    /// - `InvalidHex`: key or data is not hex
    /// - `InvalidKeyLength`: key is not 32 bytes
    /// - `InvalidInputLength`: data shorter than 28 bytes
    /// - `DecryptionFailed`: integrity check failed
    pub fn aes256_cts_hmac_sha1_96_decrypt(
        &self,
        key_hex: &str,
        usage: i64,
        data_hex: &str,
    ) -> Result<String, HelperError> {
        self.decrypt_hex(AlgorithmKind::Aes256CtsHmacSha196, key_hex, usage, data_hex)
    }

    /// `aes128-cts-hmac-sha1-96` decryption of hex `ciphertext ‖ mac`.
    ///
    /// # Errors
    ///
    /// - `InvalidHex`: key or data is not hex
    /// - `InvalidKeyLength`: key is not 16 bytes
    /// - `InvalidInputLength`: data shorter than 28 bytes
    /// - `DecryptionFailed`: integrity check failed
    pub fn aes128_cts_hmac_sha1_96_decrypt(
        &self,
        key_hex: &str,
        usage: i64,
        data_hex: &str,
    ) -> Result<String, HelperError> {
        self.decrypt_hex(AlgorithmKind::Aes128CtsHmacSha196, key_hex, usage, data_hex)
    }

    /// `hmac-sha1-96-aes256` checksum of `payload` as hex.
    ///
    /// # Errors
    ///
    /// - `InvalidHex`: key is not hex
    /// - `InvalidKeyLength`: key is not 32 bytes
    /// - `UnsupportedKeyUsage`: usage outside `0..=2047`
    pub fn hmac_sha1_96_aes256(
        &self,
        key_hex: &str,
        usage: i64,
        payload: &[u8],
    ) -> Result<String, HelperError> {
        self.process(&Request::encrypt(AlgorithmKind::HmacSha196Aes256, key_hex, usage, payload))
            .map(|output| output.to_hex())
    }

    /// `hmac-sha1-96-aes128` checksum of `payload` as hex.
    ///
    /// # Errors
    ///
    /// - `InvalidHex`: key is not hex
    /// - `InvalidKeyLength`: key is not 16 bytes
    /// - `UnsupportedKeyUsage`: usage outside `0..=2047`
    pub fn hmac_sha1_96_aes128(
        &self,
        key_hex: &str,
        usage: i64,
        payload: &[u8],
    ) -> Result<String, HelperError> {
        self.process(&Request::encrypt(AlgorithmKind::HmacSha196Aes128, key_hex, usage, payload))
            .map(|output| output.to_hex())
    }

    fn decrypt_hex(
        &self,
        algorithm: AlgorithmKind,
        key_hex: &str,
        usage: i64,
        data_hex: &str,
    ) -> Result<String, HelperError> {
        let data = decode_hex("data", data_hex)?;
        self.process(&Request::decrypt(algorithm, key_hex, usage, &data))
            .map(|output| output.to_hex())
    }
}

fn digest(kind: AlgorithmKind, algorithm: HashAlgorithm, input: &[u8]) -> Output {
    Output::new(kind, OutputKind::Digest, hash(algorithm, input).to_vec())
}

/// Full-length HMAC of a raw-key request. Any key length is accepted,
/// including empty.
fn mac(request: &Request<'_>, algorithm: HashAlgorithm) -> Result<Output, HelperError> {
    let kind = request.algorithm;
    let key_hex =
        request.key.ok_or(HelperError::MissingParameter { algorithm: kind, parameter: "key" })?;
    let key = decode_key(key_hex)?;
    let tag = hmac(algorithm, &key, request.input);
    Ok(Output::new(kind, OutputKind::Mac, tag.to_vec()))
}

fn decrypt_bytes(
    etype: EncryptionType,
    key: &[u8],
    usage: KeyUsage,
    data: &[u8],
) -> Result<Vec<u8>, HelperError> {
    kerberos::decrypt(etype, key, usage, data).map_err(HelperError::decrypting)
}

/// Enctype, decoded key and validated usage of a keyed request.
fn keyed_params(
    request: &Request<'_>,
) -> Result<(EncryptionType, Zeroizing<Vec<u8>>, KeyUsage), HelperError> {
    let algorithm = request.algorithm;
    let Some(etype) = algorithm.encryption_type() else {
        return Err(HelperError::UnsupportedAlgorithm { name: algorithm.to_string() });
    };
    let key_hex =
        request.key.ok_or(HelperError::MissingParameter { algorithm, parameter: "key" })?;
    let usage =
        request.usage.ok_or(HelperError::MissingParameter { algorithm, parameter: "usage" })?;

    let key = decode_key(key_hex)?;
    if key.len() != etype.key_len() {
        return Err(HelperError::InvalidKeyLength { expected: etype.key_len(), actual: key.len() });
    }
    let usage = KeyUsage::new(usage).map_err(|_| HelperError::UnsupportedKeyUsage { usage })?;

    Ok((etype, key, usage))
}

/// Decode a hex key; surrounding whitespace is ignored.
fn decode_key(key_hex: &str) -> Result<Zeroizing<Vec<u8>>, HelperError> {
    decode_hex("key", key_hex).map(Zeroizing::new)
}

/// Decode hex for `field`; surrounding whitespace is ignored.
fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, HelperError> {
    hex::decode(value.trim())
        .map_err(|e| HelperError::InvalidHex { field, reason: e.to_string() })
}
