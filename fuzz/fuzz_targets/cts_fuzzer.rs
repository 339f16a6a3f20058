//! Fuzz target for RFC 3962 ciphertext stealing
//!
//! # Invariants
//!
//! - Output length equals input length
//! - Decrypt inverts encrypt for every length of at least one block
//! - Exactly one block equals a single CBC step
//! - Short input is rejected, never panics

#![no_main]

use arbitrary::Arbitrary;
use cryptohelper_crypto::{AesKeySchedule, BLOCK_LEN, CryptoError, cts};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct CtsScenario {
    aes256: bool,
    key: [u8; 32],
    iv: [u8; BLOCK_LEN],
    plaintext: Vec<u8>,
}

fuzz_target!(|scenario: CtsScenario| {
    let key_len = if scenario.aes256 { 32 } else { 16 };
    let schedule =
        AesKeySchedule::new(&scenario.key[..key_len]).expect("AES key sizes are accepted");

    if scenario.plaintext.len() < BLOCK_LEN {
        assert_eq!(
            cts::encrypt(&schedule, &scenario.iv, &scenario.plaintext),
            Err(CryptoError::InvalidInputLength {
                minimum: BLOCK_LEN,
                actual: scenario.plaintext.len()
            })
        );
        return;
    }

    let ciphertext =
        cts::encrypt(&schedule, &scenario.iv, &scenario.plaintext).expect("long enough");
    assert_eq!(ciphertext.len(), scenario.plaintext.len());

    if scenario.plaintext.len() == BLOCK_LEN {
        let mut block = [0u8; BLOCK_LEN];
        for (out, (p, iv)) in block.iter_mut().zip(scenario.plaintext.iter().zip(scenario.iv)) {
            *out = p ^ iv;
        }
        assert_eq!(ciphertext, schedule.encrypt_block(&block));
    }

    let decrypted = cts::decrypt(&schedule, &scenario.iv, &ciphertext).expect("long enough");
    assert_eq!(decrypted, scenario.plaintext);
});
