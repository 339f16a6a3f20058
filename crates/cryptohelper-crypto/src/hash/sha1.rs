//! SHA-1 (FIPS 180-4 §6.1)
//!
//! Still required by the Kerberos AES enctypes, which use HMAC-SHA1 for
//! integrity and PBKDF2-HMAC-SHA1 for string-to-key.

use zeroize::Zeroize;

use super::{BlockBuffer, Digest, HashAlgorithm, Hasher};

const H_INIT: [u32; 5] = [0x6745_2301, 0xEFCD_AB89, 0x98BA_DCFE, 0x1032_5476, 0xC3D2_E1F0];

/// Incremental SHA-1 hasher.
#[derive(Clone)]
pub(crate) struct Sha1 {
    state: [u32; 5],
    buffer: BlockBuffer<64>,
}

impl Default for Sha1 {
    fn default() -> Self {
        Self { state: H_INIT, buffer: BlockBuffer::default() }
    }
}

impl Zeroize for Sha1 {
    fn zeroize(&mut self) {
        self.state.zeroize();
        self.buffer.zeroize();
    }
}

impl Hasher for Sha1 {
    const ALGORITHM: HashAlgorithm = HashAlgorithm::Sha1;

    fn update(&mut self, data: &[u8]) {
        let state = &mut self.state;
        self.buffer.update(data, |block| compress(state, block));
    }

    fn finalize(self) -> Digest {
        let Self { mut state, buffer } = self;
        buffer.finalize(8, |block| compress(&mut state, block));

        let mut out = [0u8; 20];
        for (chunk, word) in out.chunks_exact_mut(4).zip(state) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        state.zeroize();
        Digest::new(Self::ALGORITHM, &out)
    }
}

fn compress(state: &mut [u32; 5], block: &[u8; 64]) {
    let mut w = [0u32; 80];
    for (word, chunk) in w.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    for t in 16..80 {
        w[t] = (w[t - 3] ^ w[t - 8] ^ w[t - 14] ^ w[t - 16]).rotate_left(1);
    }

    let [mut a, mut b, mut c, mut d, mut e] = *state;

    for (t, &wt) in w.iter().enumerate() {
        let (f, k) = match t {
            0..=19 => ((b & c) | (!b & d), 0x5A82_7999),
            20..=39 => (b ^ c ^ d, 0x6ED9_EBA1),
            40..=59 => ((b & c) | (b & d) | (c & d), 0x8F1B_BCDC),
            _ => (b ^ c ^ d, 0xCA62_C1D6),
        };

        let temp = a
            .rotate_left(5)
            .wrapping_add(f)
            .wrapping_add(e)
            .wrapping_add(k)
            .wrapping_add(wt);
        e = d;
        d = c;
        c = b.rotate_left(30);
        b = a;
        a = temp;
    }

    for (h, v) in state.iter_mut().zip([a, b, c, d, e]) {
        *h = h.wrapping_add(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn million_a() {
        let mut hasher = Sha1::default();
        let chunk = [b'a'; 1000];
        for _ in 0..1000 {
            hasher.update(&chunk);
        }
        let digest = hasher.finalize();

        let expected = [
            0x34, 0xaa, 0x97, 0x3c, 0xd4, 0xc4, 0xda, 0xa4, 0xf6, 0x1e, 0xeb, 0x2b, 0xdb, 0xad,
            0x27, 0x31, 0x65, 0x34, 0x01, 0x6f,
        ];
        assert_eq!(digest.as_bytes(), &expected);
    }
}
