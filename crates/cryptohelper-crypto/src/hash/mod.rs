//! MD5, SHA-1 and SHA-2 digests (RFC 1321, FIPS 180-4)
//!
//! One-shot hashing only. The incremental hashers are crate-private: HMAC and
//! PBKDF2 feed them piecewise, callers outside the crate never do.

mod md5;
mod sha1;
mod sha256;
mod sha512;

use std::fmt;

use zeroize::Zeroize;

pub(crate) use md5::Md5;
pub(crate) use sha1::Sha1;
pub(crate) use sha256::Sha256;
pub(crate) use sha512::{Sha384, Sha512};

/// Largest digest produced by any supported algorithm (SHA-512)
pub const MAX_DIGEST_LEN: usize = 64;

/// Supported hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// MD5, 16-byte digest. Legacy fingerprints only
    Md5,
    /// SHA-1, 20-byte digest
    Sha1,
    /// SHA-256, 32-byte digest
    Sha256,
    /// SHA-384, 48-byte digest
    Sha384,
    /// SHA-512, 64-byte digest
    Sha512,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    pub const fn output_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Compression function block length in bytes.
    pub const fn block_len(self) -> usize {
        match self {
            Self::Md5 | Self::Sha1 | Self::Sha256 => 64,
            Self::Sha384 | Self::Sha512 => 128,
        }
    }

    /// Lower-case algorithm name as used on the external boundary.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A finished digest. Its length is fixed by the algorithm that produced it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Digest {
    algorithm: HashAlgorithm,
    bytes: [u8; MAX_DIGEST_LEN],
}

impl Digest {
    fn new(algorithm: HashAlgorithm, output: &[u8]) -> Self {
        let mut bytes = [0u8; MAX_DIGEST_LEN];
        bytes[..output.len()].copy_from_slice(output);
        Self { algorithm, bytes }
    }

    /// Algorithm that produced this digest.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Digest bytes, exactly `algorithm().output_len()` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.algorithm.output_len()]
    }

    /// Copy of the digest bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({}:", self.algorithm)?;
        for byte in self.as_bytes() {
            write!(f, "{byte:02x}")?;
        }
        f.write_str(")")
    }
}

/// Hash `input` with `algorithm`.
///
/// Pure and deterministic; there is no failure mode for byte input.
pub fn hash(algorithm: HashAlgorithm, input: &[u8]) -> Digest {
    match algorithm {
        HashAlgorithm::Md5 => digest_with::<Md5>(input),
        HashAlgorithm::Sha1 => digest_with::<Sha1>(input),
        HashAlgorithm::Sha256 => digest_with::<Sha256>(input),
        HashAlgorithm::Sha384 => digest_with::<Sha384>(input),
        HashAlgorithm::Sha512 => digest_with::<Sha512>(input),
    }
}

fn digest_with<H: Hasher>(input: &[u8]) -> Digest {
    let mut hasher = H::default();
    hasher.update(input);
    hasher.finalize()
}

/// Incremental Merkle–Damgård hasher.
///
/// `zeroize` wipes the chaining state and any buffered input, so keyed
/// wrappers can clear what they absorbed.
pub(crate) trait Hasher: Default + Zeroize {
    /// Algorithm implemented by this hasher
    const ALGORITHM: HashAlgorithm;

    /// Absorb more input.
    fn update(&mut self, data: &[u8]);

    /// Pad, process the final block(s) and produce the digest.
    fn finalize(self) -> Digest;
}

/// Splits input into `N`-byte blocks for a compression function and applies
/// the final padding.
///
/// Tracks the total message length so the bit length can be appended.
#[derive(Clone)]
pub(crate) struct BlockBuffer<const N: usize> {
    buf: [u8; N],
    len: usize,
    total: u128,
}

impl<const N: usize> Default for BlockBuffer<N> {
    fn default() -> Self {
        Self { buf: [0u8; N], len: 0, total: 0 }
    }
}

impl<const N: usize> BlockBuffer<N> {
    /// Buffer `data`, calling `compress` on every completed block.
    ///
    /// Never leaves a full block buffered: `len < N` on return.
    pub(crate) fn update(&mut self, mut data: &[u8], mut compress: impl FnMut(&[u8; N])) {
        self.total = self.total.wrapping_add(data.len() as u128);

        if self.len > 0 {
            let take = (N - self.len).min(data.len());
            self.buf[self.len..self.len + take].copy_from_slice(&data[..take]);
            self.len += take;
            data = &data[take..];

            if self.len < N {
                return;
            }
            compress(&self.buf);
            self.len = 0;
        }

        let (blocks, rest) = data.as_chunks::<N>();
        for block in blocks {
            compress(block);
        }

        self.buf[..rest.len()].copy_from_slice(rest);
        self.len = rest.len();
    }

    /// Append `0x80`, zero-fill, and write the message bit length big-endian
    /// into the last `length_len` bytes (8 for SHA-1/256, 16 for SHA-384/512).
    pub(crate) fn finalize(self, length_len: usize, compress: impl FnMut(&[u8; N])) {
        let bit_len = self.total.wrapping_mul(8).to_be_bytes();
        self.pad(&bit_len[bit_len.len() - length_len..], compress);
    }

    /// MD5 padding: as [`BlockBuffer::finalize`] with a 64-bit little-endian
    /// bit length.
    pub(crate) fn finalize_le(self, compress: impl FnMut(&[u8; N])) {
        let bit_len = (self.total.wrapping_mul(8) as u64).to_le_bytes();
        self.pad(&bit_len, compress);
    }

    fn pad(mut self, length_field: &[u8], mut compress: impl FnMut(&[u8; N])) {
        let length_len = length_field.len();

        self.buf[self.len] = 0x80;
        self.len += 1;

        // No room left for the length field: flush an extra block
        if self.len > N - length_len {
            self.buf[self.len..].fill(0);
            compress(&self.buf);
            self.len = 0;
        }

        self.buf[self.len..N - length_len].fill(0);
        self.buf[N - length_len..].copy_from_slice(length_field);
        compress(&self.buf);
        self.zeroize();
    }
}

impl<const N: usize> Zeroize for BlockBuffer<N> {
    fn zeroize(&mut self) {
        self.buf.zeroize();
        self.len.zeroize();
        self.total.zeroize();
    }
}
