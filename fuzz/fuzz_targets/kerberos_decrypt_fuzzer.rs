//! Fuzz target for Kerberos decryption of untrusted input
//!
//! # Invariants
//!
//! - Decryption never panics on arbitrary bytes
//! - Inputs shorter than confounder + MAC report `InvalidInputLength`
//! - Random data never authenticates

#![no_main]

use arbitrary::Arbitrary;
use cryptohelper_crypto::{
    CryptoError, EncryptionType, KeyUsage,
    kerberos::{CONFOUNDER_LEN, MAC_LEN, decrypt},
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct DecryptScenario {
    aes256: bool,
    key: [u8; 32],
    usage: u16,
    data: Vec<u8>,
}

fuzz_target!(|scenario: DecryptScenario| {
    let etype = if scenario.aes256 {
        EncryptionType::Aes256CtsHmacSha196
    } else {
        EncryptionType::Aes128CtsHmacSha196
    };
    let key = &scenario.key[..etype.key_len()];
    let Ok(usage) = KeyUsage::new(i64::from(scenario.usage)) else {
        return;
    };

    match decrypt(etype, key, usage, &scenario.data) {
        Err(CryptoError::InvalidInputLength { minimum, actual }) => {
            assert_eq!(minimum, CONFOUNDER_LEN + MAC_LEN);
            assert_eq!(actual, scenario.data.len());
            assert!(actual < minimum);
        },
        Err(CryptoError::IntegrityCheckFailed) => {
            assert!(scenario.data.len() >= CONFOUNDER_LEN + MAC_LEN);
        },
        Err(other) => panic!("unexpected error: {other}"),
        // A forged 96-bit MAC; only reachable if the fuzzer found a valid ciphertext
        Ok(plaintext) => {
            assert_eq!(plaintext.len(), scenario.data.len() - CONFOUNDER_LEN - MAC_LEN);
        },
    }
});
