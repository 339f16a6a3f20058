//! Fuzz target for Kerberos AES encryption
//!
//! Encrypts arbitrary plaintext under arbitrary keys and usages.
//!
//! # Strategy
//!
//! - Both key sizes, arbitrary key bytes
//! - Usage numbers across and beyond the accepted range
//! - Empty, block-aligned and ragged plaintext
//! - A single corrupted byte anywhere in the output
//!
//! # Invariants
//!
//! - Output length is confounder + plaintext + MAC
//! - Encrypt/decrypt roundtrip succeeds
//! - Corrupted output fails the integrity check
//! - Out-of-range usage is rejected, never panics

#![no_main]

use arbitrary::Arbitrary;
use cryptohelper_crypto::{
    CryptoError, EncryptionType, KeyUsage,
    kerberos::{CONFOUNDER_LEN, MAC_LEN, decrypt, encrypt},
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct EncryptScenario {
    /// Use the 256-bit enctype
    aes256: bool,
    /// Key seed, truncated to the enctype's key length
    key: [u8; 32],
    /// Raw usage number
    usage: i64,
    /// Plaintext
    plaintext: Vec<u8>,
    /// Confounder
    confounder: [u8; CONFOUNDER_LEN],
    /// Byte to corrupt, reduced modulo the output length
    corrupt_at: usize,
    /// Non-zero XOR mask for the corrupted byte
    corrupt_mask: u8,
}

fuzz_target!(|scenario: EncryptScenario| {
    let etype = if scenario.aes256 {
        EncryptionType::Aes256CtsHmacSha196
    } else {
        EncryptionType::Aes128CtsHmacSha196
    };
    let key = &scenario.key[..etype.key_len()];

    // INVARIANT 1: Usage validation never panics
    let usage = match KeyUsage::new(scenario.usage) {
        Ok(usage) => usage,
        Err(err) => {
            assert_eq!(err, CryptoError::InvalidKeyUsage { usage: scenario.usage });
            return;
        },
    };

    // INVARIANT 2: Encryption succeeds with a well-sized key
    let encrypted = encrypt(etype, key, usage, &scenario.plaintext, &scenario.confounder)
        .expect("encryption with valid key and usage must succeed");
    assert_eq!(encrypted.len(), CONFOUNDER_LEN + scenario.plaintext.len() + MAC_LEN);

    // INVARIANT 3: Roundtrip recovers the plaintext
    let decrypted = decrypt(etype, key, usage, &encrypted).expect("roundtrip must succeed");
    assert_eq!(decrypted, scenario.plaintext);

    // INVARIANT 4: Any corruption is detected
    if scenario.corrupt_mask != 0 {
        let mut corrupted = encrypted;
        let index = scenario.corrupt_at % corrupted.len();
        corrupted[index] ^= scenario.corrupt_mask;
        assert_eq!(
            decrypt(etype, key, usage, &corrupted),
            Err(CryptoError::IntegrityCheckFailed),
            "corrupted ciphertext must fail the integrity check"
        );
    }
});
