//! Encrypt, decrypt and checksum for the AES enctypes
//!
//! All functions are pure - the confounder must be provided by the caller.

use zeroize::Zeroizing;

use super::{
    EncryptionType,
    derivation::{KeyPurpose, KeyUsage, derive_usage_key},
};
use crate::{
    aes::{AesKeySchedule, BLOCK_LEN, Block},
    cts,
    error::CryptoError,
    hmac::{constant_time_eq, hmac_sha1},
};

/// Confounder length: one AES block
pub const CONFOUNDER_LEN: usize = BLOCK_LEN;

/// Truncated HMAC-SHA1 length (96 bits)
pub const MAC_LEN: usize = 12;

/// CTS runs with an all-zero initial cipher state
const ZERO_IV: Block = [0u8; BLOCK_LEN];

/// Encrypt `plaintext` for `usage`.
///
/// Returns `ciphertext ‖ mac`, `CONFOUNDER_LEN + plaintext.len() + MAC_LEN`
/// bytes long. The MAC is always the trailing [`MAC_LEN`] bytes.
///
/// # Security
///
/// - Caller MUST provide a cryptographically random confounder in production
/// - The MAC covers the confounded plaintext, not the ciphertext
///
/// # Errors
///
/// - `InvalidKeyLength`: key does not match the enctype
pub fn encrypt(
    etype: EncryptionType,
    key: &[u8],
    usage: KeyUsage,
    plaintext: &[u8],
    confounder: &[u8; CONFOUNDER_LEN],
) -> Result<Vec<u8>, CryptoError> {
    etype.check_key(key)?;

    let ke = derive_usage_key(key, usage, KeyPurpose::Encryption)?;
    let ki = derive_usage_key(key, usage, KeyPurpose::Integrity)?;

    let mut confounded = Zeroizing::new(Vec::with_capacity(CONFOUNDER_LEN + plaintext.len()));
    confounded.extend_from_slice(confounder);
    confounded.extend_from_slice(plaintext);

    let schedule = AesKeySchedule::with_size(etype.key_size(), &ke)?;
    let mut output = cts::encrypt(&schedule, &ZERO_IV, &confounded)?;

    let mac = hmac_sha1(&ki, &confounded);
    output.extend_from_slice(&mac[..MAC_LEN]);

    Ok(output)
}

/// Decrypt `data` (`ciphertext ‖ mac`) produced by [`encrypt`].
///
/// Returns the plaintext with the confounder removed.
///
/// # Errors
///
/// - `InvalidKeyLength`: key does not match the enctype
/// - `InvalidInputLength`: shorter than a confounder plus a MAC
/// - `IntegrityCheckFailed`: wrong key or usage, or tampered data
pub fn decrypt(
    etype: EncryptionType,
    key: &[u8],
    usage: KeyUsage,
    data: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    etype.check_key(key)?;

    let minimum = CONFOUNDER_LEN + MAC_LEN;
    if data.len() < minimum {
        return Err(CryptoError::InvalidInputLength { minimum, actual: data.len() });
    }

    let (ciphertext, mac) = data.split_at(data.len() - MAC_LEN);

    let ke = derive_usage_key(key, usage, KeyPurpose::Encryption)?;
    let ki = derive_usage_key(key, usage, KeyPurpose::Integrity)?;

    let schedule = AesKeySchedule::with_size(etype.key_size(), &ke)?;
    let confounded = Zeroizing::new(cts::decrypt(&schedule, &ZERO_IV, ciphertext)?);

    let expected = hmac_sha1(&ki, &confounded);
    if !constant_time_eq(&expected[..MAC_LEN], mac) {
        return Err(CryptoError::IntegrityCheckFailed);
    }

    Ok(confounded[CONFOUNDER_LEN..].to_vec())
}

/// `hmac-sha1-96-aes128` / `hmac-sha1-96-aes256` keyed checksum of `data`.
///
/// # Errors
///
/// - `InvalidKeyLength`: key does not match the enctype
pub fn checksum(
    etype: EncryptionType,
    key: &[u8],
    usage: KeyUsage,
    data: &[u8],
) -> Result<[u8; MAC_LEN], CryptoError> {
    etype.check_key(key)?;

    let kc = derive_usage_key(key, usage, KeyPurpose::Checksum)?;
    let mac = hmac_sha1(&kc, data);

    let mut out = [0u8; MAC_LEN];
    out.copy_from_slice(&mac[..MAC_LEN]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(data: &[u8]) -> String {
        data.iter().map(|b| format!("{b:02x}")).collect()
    }

    fn sequential_key(len: usize) -> Vec<u8> {
        (0..len).map(|i| i as u8).collect()
    }

    fn usage(value: i64) -> KeyUsage {
        KeyUsage::new(value).unwrap()
    }

    const CONFOUNDER: [u8; CONFOUNDER_LEN] = [0x42; CONFOUNDER_LEN];

    #[test]
    fn aes256_known_answer() {
        let key = sequential_key(32);
        let encrypted = encrypt(
            EncryptionType::Aes256CtsHmacSha196,
            &key,
            usage(2),
            b"aes256_cts_hmac_sha1_96",
            &CONFOUNDER,
        )
        .unwrap();

        assert_eq!(
            hex(&encrypted),
            "c5b4fe2bc628679b38f6ea8281850248809241d0c06984781a98beb70a965b2b\
             7549f04f86776aa64c3a0b81af1e4c71bf4cb6"
        );
    }

    #[test]
    fn aes256_empty_plaintext_known_answer() {
        let key = sequential_key(32);
        let encrypted =
            encrypt(EncryptionType::Aes256CtsHmacSha196, &key, usage(2), b"", &CONFOUNDER)
                .unwrap();

        assert_eq!(encrypted.len(), CONFOUNDER_LEN + MAC_LEN);
        assert_eq!(hex(&encrypted), "c5b4fe2bc628679b38f6ea82818502482c665c0a7e2a42922246cc08");
    }

    #[test]
    fn aes128_known_answer() {
        let key = sequential_key(16);
        let encrypted = encrypt(
            EncryptionType::Aes128CtsHmacSha196,
            &key,
            usage(3),
            b"hello kerberos",
            &CONFOUNDER,
        )
        .unwrap();

        assert_eq!(
            hex(&encrypted),
            "00e7b84021c3055e8fb0a64504690c2c96da850d303a58a7dec8688575c1e723\
             09ad1291153f528d6e91"
        );
    }

    #[test]
    fn checksum_known_answers() {
        let mac256 = checksum(
            EncryptionType::Aes256CtsHmacSha196,
            &sequential_key(32),
            usage(2),
            b"checksum me",
        )
        .unwrap();
        let mac128 = checksum(
            EncryptionType::Aes128CtsHmacSha196,
            &sequential_key(16),
            usage(2),
            b"checksum me",
        )
        .unwrap();

        assert_eq!(hex(&mac256), "cea6b73f9d931deca1c5f773");
        assert_eq!(hex(&mac128), "6db79ecb853241c4cafd0803");
    }

    #[test]
    fn decrypt_recovers_plaintext() {
        let key = sequential_key(32);
        let etype = EncryptionType::Aes256CtsHmacSha196;

        for len in [0usize, 1, 15, 16, 17, 31, 32, 100] {
            let plaintext = vec![0xa5; len];
            let encrypted = encrypt(etype, &key, usage(11), &plaintext, &CONFOUNDER).unwrap();
            let decrypted = decrypt(etype, &key, usage(11), &encrypted).unwrap();
            assert_eq!(decrypted, plaintext, "length {len}");
        }
    }

    #[test]
    fn tampered_ciphertext_fails_integrity() {
        let key = sequential_key(32);
        let etype = EncryptionType::Aes256CtsHmacSha196;
        let mut encrypted = encrypt(etype, &key, usage(1), b"ticket", &CONFOUNDER).unwrap();

        encrypted[3] ^= 0x01;

        assert_eq!(
            decrypt(etype, &key, usage(1), &encrypted),
            Err(CryptoError::IntegrityCheckFailed)
        );
    }

    #[test]
    fn wrong_usage_fails_integrity() {
        let key = sequential_key(16);
        let etype = EncryptionType::Aes128CtsHmacSha196;
        let encrypted = encrypt(etype, &key, usage(1), b"ticket", &CONFOUNDER).unwrap();

        assert_eq!(
            decrypt(etype, &key, usage(2), &encrypted),
            Err(CryptoError::IntegrityCheckFailed)
        );
    }

    #[test]
    fn short_input_rejected() {
        let key = sequential_key(32);
        assert_eq!(
            decrypt(EncryptionType::Aes256CtsHmacSha196, &key, usage(1), &[0u8; 27]),
            Err(CryptoError::InvalidInputLength { minimum: 28, actual: 27 })
        );
    }

    #[test]
    fn key_length_must_match_etype() {
        let result = encrypt(
            EncryptionType::Aes256CtsHmacSha196,
            &sequential_key(16),
            usage(1),
            b"data",
            &CONFOUNDER,
        );
        assert_eq!(result, Err(CryptoError::InvalidKeyLength { expected: 32, actual: 16 }));
    }

    #[test]
    fn mac_is_trailing_twelve_bytes() {
        let key = sequential_key(32);
        let etype = EncryptionType::Aes256CtsHmacSha196;
        let plaintext = b"split convention";
        let encrypted = encrypt(etype, &key, usage(4), plaintext, &CONFOUNDER).unwrap();

        let ki = derive_usage_key(&key, usage(4), KeyPurpose::Integrity).unwrap();
        let mut confounded = CONFOUNDER.to_vec();
        confounded.extend_from_slice(plaintext);
        let mac = hmac_sha1(&ki, &confounded);

        assert_eq!(&encrypted[encrypted.len() - MAC_LEN..], &mac[..MAC_LEN]);
    }
}
