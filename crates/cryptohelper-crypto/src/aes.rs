//! AES block cipher (FIPS 197), AES-128 and AES-256
//!
//! Single-block encryption and decryption over an expanded key schedule.
//! Chaining modes live in [`crate::cts`].
//!
//! # Constant time
//!
//! The S-box is computed rather than looked up: multiplicative inverse in
//! GF(2^8) by exponentiation, then the affine map. No table is indexed by
//! secret data and no branch depends on it.

use zeroize::Zeroize;

use crate::error::CryptoError;

/// AES block size in bytes
pub const BLOCK_LEN: usize = 16;

/// A single AES block
pub type Block = [u8; BLOCK_LEN];

/// Round constants for key expansion
const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// Largest expanded key: 4 * (14 + 1) words for AES-256
const MAX_ROUND_KEY_WORDS: usize = 60;

/// AES key sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySize {
    /// 128-bit key, 10 rounds
    Aes128,
    /// 256-bit key, 14 rounds
    Aes256,
}

impl KeySize {
    /// Key length in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes256 => 32,
        }
    }

    /// Number of cipher rounds.
    pub const fn rounds(self) -> usize {
        match self {
            Self::Aes128 => 10,
            Self::Aes256 => 14,
        }
    }

    /// Key size matching a key of `len` bytes.
    pub fn from_key_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(Self::Aes128),
            32 => Some(Self::Aes256),
            _ => None,
        }
    }
}

/// Expanded AES round keys.
///
/// Created per operation and zeroized on drop.
pub struct AesKeySchedule {
    size: KeySize,
    round_keys: [u32; MAX_ROUND_KEY_WORDS],
}

impl AesKeySchedule {
    /// Expand `key` into the round key schedule.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: key is neither 16 nor 32 bytes. `expected` is
    ///   the nearer of the two sizes.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let Some(size) = KeySize::from_key_len(key.len()) else {
            let nearest = if key.len() < 24 { KeySize::Aes128 } else { KeySize::Aes256 };
            return Err(CryptoError::InvalidKeyLength {
                expected: nearest.key_len(),
                actual: key.len(),
            });
        };
        Ok(Self::expand(size, key))
    }

    /// Expand `key`, requiring it to be exactly `size` long.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: key length does not match `size`
    pub fn with_size(size: KeySize, key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != size.key_len() {
            return Err(CryptoError::InvalidKeyLength {
                expected: size.key_len(),
                actual: key.len(),
            });
        }
        Ok(Self::expand(size, key))
    }

    fn expand(size: KeySize, key: &[u8]) -> Self {
        let nk = size.key_len() / 4;
        let total_words = 4 * (size.rounds() + 1);
        let mut w = [0u32; MAX_ROUND_KEY_WORDS];

        for (word, chunk) in w.iter_mut().zip(key.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        for i in nk..total_words {
            let mut temp = w[i - 1];
            if i % nk == 0 {
                temp = sub_word(temp.rotate_left(8)) ^ (u32::from(RCON[i / nk - 1]) << 24);
            } else if nk > 6 && i % nk == 4 {
                temp = sub_word(temp);
            }
            w[i] = w[i - nk] ^ temp;
        }

        Self { size, round_keys: w }
    }

    /// Key size this schedule was expanded from.
    pub fn key_size(&self) -> KeySize {
        self.size
    }

    /// Encrypt one block.
    pub fn encrypt_block(&self, block: &Block) -> Block {
        let rounds = self.size.rounds();
        let mut state = *block;

        self.add_round_key(&mut state, 0);
        for round in 1..rounds {
            sub_bytes(&mut state);
            shift_rows(&mut state);
            mix_columns(&mut state);
            self.add_round_key(&mut state, round);
        }
        sub_bytes(&mut state);
        shift_rows(&mut state);
        self.add_round_key(&mut state, rounds);

        state
    }

    /// Decrypt one block.
    pub fn decrypt_block(&self, block: &Block) -> Block {
        let rounds = self.size.rounds();
        let mut state = *block;

        self.add_round_key(&mut state, rounds);
        for round in (1..rounds).rev() {
            inv_shift_rows(&mut state);
            inv_sub_bytes(&mut state);
            self.add_round_key(&mut state, round);
            inv_mix_columns(&mut state);
        }
        inv_shift_rows(&mut state);
        inv_sub_bytes(&mut state);
        self.add_round_key(&mut state, 0);

        state
    }

    fn add_round_key(&self, state: &mut Block, round: usize) {
        let words = &self.round_keys[round * 4..round * 4 + 4];
        for (column, word) in state.chunks_exact_mut(4).zip(words) {
            for (byte, key_byte) in column.iter_mut().zip(word.to_be_bytes()) {
                *byte ^= key_byte;
            }
        }
    }
}

impl Drop for AesKeySchedule {
    fn drop(&mut self) {
        self.round_keys.zeroize();
    }
}

/// Multiply in GF(2^8) modulo x^8 + x^4 + x^3 + x + 1, branch-free.
fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    for _ in 0..8 {
        product ^= a & (b & 1).wrapping_neg();
        let carry = (a >> 7).wrapping_neg();
        a = (a << 1) ^ (0x1b & carry);
        b >>= 1;
    }
    product
}

/// Multiplicative inverse as `x^254`; maps 0 to 0.
fn gf_inv(x: u8) -> u8 {
    let x2 = gf_mul(x, x);
    let x3 = gf_mul(x2, x);
    let x6 = gf_mul(x3, x3);
    let x12 = gf_mul(x6, x6);
    let x15 = gf_mul(x12, x3);
    let x30 = gf_mul(x15, x15);
    let x60 = gf_mul(x30, x30);
    let x120 = gf_mul(x60, x60);
    let x240 = gf_mul(x120, x120);
    let x252 = gf_mul(x240, x12);
    gf_mul(x252, x2)
}

fn sbox(x: u8) -> u8 {
    let b = gf_inv(x);
    b ^ b.rotate_left(1) ^ b.rotate_left(2) ^ b.rotate_left(3) ^ b.rotate_left(4) ^ 0x63
}

fn inv_sbox(x: u8) -> u8 {
    gf_inv(x.rotate_left(1) ^ x.rotate_left(3) ^ x.rotate_left(6) ^ 0x05)
}

fn sub_word(word: u32) -> u32 {
    u32::from_be_bytes(word.to_be_bytes().map(sbox))
}

fn sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = sbox(*byte);
    }
}

fn inv_sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = inv_sbox(*byte);
    }
}

// State is column-major: byte (row r, column c) lives at index 4c + r.

fn shift_rows(state: &mut Block) {
    let s = *state;
    for c in 0..4 {
        for r in 1..4 {
            state[4 * c + r] = s[4 * ((c + r) % 4) + r];
        }
    }
}

fn inv_shift_rows(state: &mut Block) {
    let s = *state;
    for c in 0..4 {
        for r in 1..4 {
            state[4 * ((c + r) % 4) + r] = s[4 * c + r];
        }
    }
}

fn mix_columns(state: &mut Block) {
    for column in state.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [column[0], column[1], column[2], column[3]];
        column[0] = gf_mul(a0, 2) ^ gf_mul(a1, 3) ^ a2 ^ a3;
        column[1] = a0 ^ gf_mul(a1, 2) ^ gf_mul(a2, 3) ^ a3;
        column[2] = a0 ^ a1 ^ gf_mul(a2, 2) ^ gf_mul(a3, 3);
        column[3] = gf_mul(a0, 3) ^ a1 ^ a2 ^ gf_mul(a3, 2);
    }
}

fn inv_mix_columns(state: &mut Block) {
    for column in state.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [column[0], column[1], column[2], column[3]];
        column[0] = gf_mul(a0, 14) ^ gf_mul(a1, 11) ^ gf_mul(a2, 13) ^ gf_mul(a3, 9);
        column[1] = gf_mul(a0, 9) ^ gf_mul(a1, 14) ^ gf_mul(a2, 11) ^ gf_mul(a3, 13);
        column[2] = gf_mul(a0, 13) ^ gf_mul(a1, 9) ^ gf_mul(a2, 14) ^ gf_mul(a3, 11);
        column[3] = gf_mul(a0, 11) ^ gf_mul(a1, 13) ^ gf_mul(a2, 9) ^ gf_mul(a3, 14);
    }
}

/// XOR `other` into `block`.
pub(crate) fn xor_block(block: &mut Block, other: &Block) {
    for (a, b) in block.iter_mut().zip(other) {
        *a ^= b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequential<const N: usize>() -> [u8; N] {
        let mut out = [0u8; N];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = i as u8;
        }
        out
    }

    const FIPS_PLAINTEXT: Block = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];

    #[test]
    fn sbox_known_values() {
        assert_eq!(sbox(0x00), 0x63);
        assert_eq!(sbox(0x01), 0x7c);
        assert_eq!(sbox(0x53), 0xed);
        assert_eq!(sbox(0xff), 0x16);
    }

    #[test]
    fn inv_sbox_inverts_sbox() {
        for x in 0..=255u8 {
            assert_eq!(inv_sbox(sbox(x)), x, "inverse failed for {x:#04x}");
        }
    }

    // FIPS 197 Appendix C.1
    #[test]
    fn aes128_fips197() {
        let schedule = AesKeySchedule::new(&sequential::<16>()).unwrap();
        let expected = [
            0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4,
            0xc5, 0x5a,
        ];

        assert_eq!(schedule.encrypt_block(&FIPS_PLAINTEXT), expected);
        assert_eq!(schedule.decrypt_block(&expected), FIPS_PLAINTEXT);
    }

    // FIPS 197 Appendix C.3
    #[test]
    fn aes256_fips197() {
        let schedule = AesKeySchedule::new(&sequential::<32>()).unwrap();
        let expected = [
            0x8e, 0xa2, 0xb7, 0xca, 0x51, 0x67, 0x45, 0xbf, 0xea, 0xfc, 0x49, 0x90, 0x4b, 0x49,
            0x60, 0x89,
        ];

        assert_eq!(schedule.key_size(), KeySize::Aes256);
        assert_eq!(schedule.encrypt_block(&FIPS_PLAINTEXT), expected);
        assert_eq!(schedule.decrypt_block(&expected), FIPS_PLAINTEXT);
    }

    // FIPS 197 Appendix A.3: last expanded word for the example AES-256 key
    #[test]
    fn aes256_key_expansion_last_word() {
        let key = [
            0x60, 0x3d, 0xeb, 0x10, 0x15, 0xca, 0x71, 0xbe, 0x2b, 0x73, 0xae, 0xf0, 0x85, 0x7d,
            0x77, 0x81, 0x1f, 0x35, 0x2c, 0x07, 0x3b, 0x61, 0x08, 0xd7, 0x2d, 0x98, 0x10, 0xa3,
            0x09, 0x14, 0xdf, 0xf4,
        ];
        let schedule = AesKeySchedule::new(&key).unwrap();
        assert_eq!(schedule.round_keys[59], 0x706c_631e);
    }

    #[test]
    fn rejects_bad_key_lengths() {
        for len in [0usize, 15, 17, 24, 31, 33] {
            let result = AesKeySchedule::new(&vec![0u8; len]);
            assert!(matches!(
                result,
                Err(CryptoError::InvalidKeyLength { actual, .. }) if actual == len
            ));
        }
    }

    #[test]
    fn bad_key_length_reports_nearest_size() {
        let cases = [(0usize, 16usize), (15, 16), (17, 16), (23, 16), (24, 32), (31, 32), (33, 32)];
        for (len, expected) in cases {
            assert_eq!(
                AesKeySchedule::new(&vec![0u8; len]).err(),
                Some(CryptoError::InvalidKeyLength { expected, actual: len })
            );
        }
    }

    #[test]
    fn with_size_requires_exact_length() {
        let result = AesKeySchedule::with_size(KeySize::Aes256, &[0u8; 16]);
        assert_eq!(
            result.err(),
            Some(CryptoError::InvalidKeyLength { expected: 32, actual: 16 })
        );
    }
}
