//! CBC with ciphertext stealing, RFC 3962 ordering
//!
//! Output length always equals input length. For more than one block the
//! plaintext is CBC-encrypted as if zero-padded to a block multiple, then the
//! last two ciphertext blocks are swapped and the (now final) block is
//! truncated to the length of the last plaintext block:
//!
//! ```text
//! CBC:     C1 .. C(n-2) | C(n-1)      | Cn
//! output:  C1 .. C(n-2) | Cn          | C(n-1)[..r]
//! ```
//!
//! The swap also happens when the input is block-aligned. A single block is
//! plain CBC.

use crate::{
    aes::{AesKeySchedule, BLOCK_LEN, Block, xor_block},
    error::CryptoError,
};

/// Encrypt `plaintext` (at least one block) under `schedule` with `iv`.
///
/// # Errors
///
/// - `InvalidInputLength`: plaintext shorter than 16 bytes
pub fn encrypt(
    schedule: &AesKeySchedule,
    iv: &Block,
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    check_len(plaintext)?;

    if plaintext.len() == BLOCK_LEN {
        let mut block = to_block(plaintext);
        xor_block(&mut block, iv);
        return Ok(schedule.encrypt_block(&block).to_vec());
    }

    let tail_len = last_block_len(plaintext.len());
    let full_len = plaintext.len() - tail_len;

    let mut output = Vec::with_capacity(plaintext.len());
    let mut chain = *iv;

    for chunk in plaintext[..full_len].chunks_exact(BLOCK_LEN) {
        let mut block = to_block(chunk);
        xor_block(&mut block, &chain);
        chain = schedule.encrypt_block(&block);
        output.extend_from_slice(&chain);
    }

    // Final block, zero-padded, chained off C(n-1)
    let mut last = [0u8; BLOCK_LEN];
    last[..tail_len].copy_from_slice(&plaintext[full_len..]);
    xor_block(&mut last, &chain);
    let final_block = schedule.encrypt_block(&last);

    // Swap: Cn takes C(n-1)'s slot, C(n-1) truncated goes last
    let second_to_last = full_len - BLOCK_LEN;
    output.truncate(second_to_last);
    output.extend_from_slice(&final_block);
    output.extend_from_slice(&chain[..tail_len]);

    Ok(output)
}

/// Decrypt `ciphertext` produced by [`encrypt`].
///
/// # Errors
///
/// - `InvalidInputLength`: ciphertext shorter than 16 bytes
pub fn decrypt(
    schedule: &AesKeySchedule,
    iv: &Block,
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    check_len(ciphertext)?;

    if ciphertext.len() == BLOCK_LEN {
        let mut block = schedule.decrypt_block(&to_block(ciphertext));
        xor_block(&mut block, iv);
        return Ok(block.to_vec());
    }

    let tail_len = last_block_len(ciphertext.len());
    // Start of the swapped pair: [Cn (full) | C(n-1) truncated]
    let pair_start = ciphertext.len() - tail_len - BLOCK_LEN;

    let mut output = Vec::with_capacity(ciphertext.len());
    let mut chain = *iv;

    for chunk in ciphertext[..pair_start].chunks_exact(BLOCK_LEN) {
        let block = to_block(chunk);
        let mut plain = schedule.decrypt_block(&block);
        xor_block(&mut plain, &chain);
        output.extend_from_slice(&plain);
        chain = block;
    }

    let final_block = to_block(&ciphertext[pair_start..pair_start + BLOCK_LEN]);
    let stolen = &ciphertext[pair_start + BLOCK_LEN..];

    // D(Cn) = (Pn || 0...) xor C(n-1). The tail of C(n-1) was stolen into the
    // padding, so it is recovered from D(Cn) directly.
    let padded = schedule.decrypt_block(&final_block);
    let mut second_to_last = padded;
    second_to_last[..tail_len].copy_from_slice(stolen);

    let mut last_plain = padded;
    xor_block(&mut last_plain, &second_to_last);

    let mut plain = schedule.decrypt_block(&second_to_last);
    xor_block(&mut plain, &chain);
    output.extend_from_slice(&plain);
    output.extend_from_slice(&last_plain[..tail_len]);

    Ok(output)
}

fn check_len(data: &[u8]) -> Result<(), CryptoError> {
    if data.len() < BLOCK_LEN {
        return Err(CryptoError::InvalidInputLength { minimum: BLOCK_LEN, actual: data.len() });
    }
    Ok(())
}

/// Length of the final block, in `1..=16`.
fn last_block_len(len: usize) -> usize {
    match len % BLOCK_LEN {
        0 => BLOCK_LEN,
        r => r,
    }
}

fn to_block(chunk: &[u8]) -> Block {
    let mut block = [0u8; BLOCK_LEN];
    block.copy_from_slice(chunk);
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> AesKeySchedule {
        AesKeySchedule::new(&[0x42; 32]).unwrap()
    }

    fn cbc_encrypt(schedule: &AesKeySchedule, iv: &Block, plaintext: &[u8]) -> Vec<u8> {
        let mut chain = *iv;
        let mut out = Vec::new();
        for chunk in plaintext.chunks_exact(BLOCK_LEN) {
            let mut block = to_block(chunk);
            xor_block(&mut block, &chain);
            chain = schedule.encrypt_block(&block);
            out.extend_from_slice(&chain);
        }
        out
    }

    #[test]
    fn single_block_is_plain_cbc() {
        let schedule = schedule();
        let iv = [0x07; BLOCK_LEN];
        let plaintext = *b"exactly 16 bytes";

        let ciphertext = encrypt(&schedule, &iv, &plaintext).unwrap();

        assert_eq!(ciphertext, cbc_encrypt(&schedule, &iv, &plaintext));
    }

    #[test]
    fn aligned_input_swaps_last_two_blocks() {
        let schedule = schedule();
        let iv = [0u8; BLOCK_LEN];
        let plaintext = [0x5a; 48];

        let ciphertext = encrypt(&schedule, &iv, &plaintext).unwrap();
        let cbc = cbc_encrypt(&schedule, &iv, &plaintext);

        assert_eq!(&ciphertext[..16], &cbc[..16]);
        assert_eq!(&ciphertext[16..32], &cbc[32..48]);
        assert_eq!(&ciphertext[32..48], &cbc[16..32]);
    }

    #[test]
    fn partial_block_swap_direction() {
        let schedule = schedule();
        let iv = [0u8; BLOCK_LEN];
        let plaintext: Vec<u8> = (0..21u8).collect();

        let ciphertext = encrypt(&schedule, &iv, &plaintext).unwrap();

        let mut padded = plaintext.clone();
        padded.resize(32, 0);
        let cbc = cbc_encrypt(&schedule, &iv, &padded);

        assert_eq!(ciphertext.len(), 21);
        // Full Cn first, then the first five bytes of C(n-1)
        assert_eq!(&ciphertext[..16], &cbc[16..32]);
        assert_eq!(&ciphertext[16..], &cbc[..5]);
    }

    #[test]
    fn roundtrip_lengths_16_to_64() {
        let schedule = schedule();
        let iv = [0x11; BLOCK_LEN];

        for len in 16..=64usize {
            let plaintext: Vec<u8> = (0..len).map(|i| (i * 7) as u8).collect();
            let ciphertext = encrypt(&schedule, &iv, &plaintext).unwrap();
            assert_eq!(ciphertext.len(), len);

            let decrypted = decrypt(&schedule, &iv, &ciphertext).unwrap();
            assert_eq!(decrypted, plaintext, "roundtrip failed at length {len}");
        }
    }

    #[test]
    fn short_input_rejected() {
        let schedule = schedule();
        let iv = [0u8; BLOCK_LEN];

        for len in 0..BLOCK_LEN {
            assert_eq!(
                encrypt(&schedule, &iv, &vec![0u8; len]),
                Err(CryptoError::InvalidInputLength { minimum: 16, actual: len })
            );
            assert_eq!(
                decrypt(&schedule, &iv, &vec![0u8; len]),
                Err(CryptoError::InvalidInputLength { minimum: 16, actual: len })
            );
        }
    }

    // RFC 3962 Appendix B, AES-128 key "chicken teriyaki", zero IV
    #[test]
    fn rfc3962_vectors() {
        let schedule = AesKeySchedule::new(b"chicken teriyaki").unwrap();
        let iv = [0u8; BLOCK_LEN];

        let plaintext = b"I would like the General Gau's Chicken, please, ";
        let cases: [(usize, [u8; 16], &[u8]); 2] = [
            (
                17,
                [
                    0xc6, 0x35, 0x35, 0x68, 0xf2, 0xbf, 0x8c, 0xb4, 0xd8, 0xa5, 0x80, 0x36, 0x2d,
                    0xa7, 0xff, 0x7f,
                ],
                &[0x97],
            ),
            (
                32,
                [
                    0x39, 0x31, 0x25, 0x23, 0xa7, 0x86, 0x62, 0xd5, 0xbe, 0x7f, 0xcb, 0xcc, 0x98,
                    0xeb, 0xf5, 0xa8,
                ],
                &[
                    0x97, 0x68, 0x72, 0x68, 0xd6, 0xec, 0xcc, 0xc0, 0xc0, 0x7b, 0x25, 0xe2, 0x5e,
                    0xcf, 0xe5, 0x84,
                ],
            ),
        ];

        for (len, first, rest) in cases {
            let ciphertext = encrypt(&schedule, &iv, &plaintext[..len]).unwrap();
            assert_eq!(&ciphertext[..16], &first);
            assert_eq!(&ciphertext[16..], rest);
        }
    }
}
