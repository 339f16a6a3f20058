//! Property-based tests for the Kerberos AES enctypes
//!
//! These tests verify the fundamental invariants of the encryption profile:
//!
//! 1. **Round-trip**: decrypt(encrypt(m)) == m for all messages
//! 2. **Length**: output is always confounder + plaintext + MAC bytes
//! 3. **Integrity**: any flipped bit is rejected
//! 4. **Isolation**: different usages produce unrelated ciphertext
//! 5. **CTS**: ciphertext stealing is length-preserving and invertible

use cryptohelper_crypto::{
    AesKeySchedule, CryptoError, EncryptionType, KeyUsage, cts,
    kerberos::{CONFOUNDER_LEN, MAC_LEN, checksum, decrypt, encrypt},
};
use proptest::prelude::*;

fn etype_strategy() -> impl Strategy<Value = EncryptionType> {
    prop_oneof![
        Just(EncryptionType::Aes128CtsHmacSha196),
        Just(EncryptionType::Aes256CtsHmacSha196),
    ]
}

fn key_for(etype: EncryptionType, seed: &[u8; 32]) -> Vec<u8> {
    seed[..etype.key_len()].to_vec()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_encrypt_decrypt_roundtrip(
        etype in etype_strategy(),
        seed in any::<[u8; 32]>(),
        usage in 0i64..=2047,
        plaintext in prop::collection::vec(any::<u8>(), 0..300),
        confounder in any::<[u8; 16]>(),
    ) {
        let key = key_for(etype, &seed);
        let usage = KeyUsage::new(usage).unwrap();

        let encrypted = encrypt(etype, &key, usage, &plaintext, &confounder).unwrap();
        prop_assert_eq!(encrypted.len(), CONFOUNDER_LEN + plaintext.len() + MAC_LEN);

        let decrypted = decrypt(etype, &key, usage, &encrypted).unwrap();
        prop_assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn prop_flipped_bit_rejected(
        etype in etype_strategy(),
        seed in any::<[u8; 32]>(),
        plaintext in prop::collection::vec(any::<u8>(), 0..100),
        confounder in any::<[u8; 16]>(),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let key = key_for(etype, &seed);
        let usage = KeyUsage::new(1).unwrap();

        let mut encrypted = encrypt(etype, &key, usage, &plaintext, &confounder).unwrap();
        let index = position.index(encrypted.len());
        encrypted[index] ^= 1 << bit;

        prop_assert_eq!(
            decrypt(etype, &key, usage, &encrypted),
            Err(CryptoError::IntegrityCheckFailed)
        );
    }

    #[test]
    fn prop_usages_are_isolated(
        seed in any::<[u8; 32]>(),
        first in 0i64..=2047,
        second in 0i64..=2047,
        plaintext in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        prop_assume!(first != second);
        let etype = EncryptionType::Aes256CtsHmacSha196;
        let confounder = [0u8; CONFOUNDER_LEN];
        let first = KeyUsage::new(first).unwrap();
        let second = KeyUsage::new(second).unwrap();

        let a = encrypt(etype, &seed, first, &plaintext, &confounder).unwrap();
        let b = encrypt(etype, &seed, second, &plaintext, &confounder).unwrap();
        prop_assert_ne!(&a, &b);

        prop_assert_ne!(
            checksum(etype, &seed, first, &plaintext).unwrap(),
            checksum(etype, &seed, second, &plaintext).unwrap()
        );
    }

    #[test]
    fn prop_encryption_is_deterministic_for_fixed_confounder(
        etype in etype_strategy(),
        seed in any::<[u8; 32]>(),
        plaintext in prop::collection::vec(any::<u8>(), 0..64),
        confounder in any::<[u8; 16]>(),
    ) {
        let key = key_for(etype, &seed);
        let usage = KeyUsage::new(2).unwrap();

        prop_assert_eq!(
            encrypt(etype, &key, usage, &plaintext, &confounder).unwrap(),
            encrypt(etype, &key, usage, &plaintext, &confounder).unwrap()
        );
    }

    #[test]
    fn prop_cts_roundtrip(
        seed in any::<[u8; 32]>(),
        iv in any::<[u8; 16]>(),
        plaintext in prop::collection::vec(any::<u8>(), 16..200),
    ) {
        let schedule = AesKeySchedule::new(&seed).unwrap();

        let ciphertext = cts::encrypt(&schedule, &iv, &plaintext).unwrap();
        prop_assert_eq!(ciphertext.len(), plaintext.len());

        let decrypted = cts::decrypt(&schedule, &iv, &ciphertext).unwrap();
        prop_assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn prop_short_input_rejected(
        etype in etype_strategy(),
        seed in any::<[u8; 32]>(),
        data in prop::collection::vec(any::<u8>(), 0..28),
    ) {
        let key = key_for(etype, &seed);
        let usage = KeyUsage::new(1).unwrap();

        let is_length_error = matches!(
            decrypt(etype, &key, usage, &data),
            Err(CryptoError::InvalidInputLength { minimum: 28, .. })
        );
        prop_assert!(is_length_error);
    }
}
