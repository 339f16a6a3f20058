//! HMAC (RFC 2104) over the crate's hash functions

use zeroize::Zeroize;

use crate::hash::{
    Digest, HashAlgorithm, Hasher, MAX_DIGEST_LEN, Md5, Sha1, Sha256, Sha384, Sha512,
};

/// Largest hash block length (SHA-384/512)
const MAX_BLOCK_LEN: usize = 128;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Keyed HMAC state.
///
/// Holds the inner hasher primed with `K' xor ipad` and the outer pad for
/// finalization. Both are key-dependent and zeroized on drop.
#[derive(Clone)]
pub(crate) struct Hmac<H: Hasher> {
    inner: H,
    outer_pad: [u8; MAX_BLOCK_LEN],
}

impl<H: Hasher> Hmac<H> {
    /// Create an HMAC instance keyed with `key`.
    ///
    /// Keys longer than the block length are hashed first; shorter keys are
    /// zero-padded.
    pub(crate) fn new(key: &[u8]) -> Self {
        let block_len = H::ALGORITHM.block_len();

        let mut key_block = [0u8; MAX_BLOCK_LEN];
        if key.len() > block_len {
            let mut hasher = H::default();
            hasher.update(key);
            let digest = hasher.finalize();
            key_block[..digest.as_bytes().len()].copy_from_slice(digest.as_bytes());
        } else {
            key_block[..key.len()].copy_from_slice(key);
        }

        let mut inner_pad = [0u8; MAX_BLOCK_LEN];
        let mut outer_pad = [0u8; MAX_BLOCK_LEN];
        for i in 0..block_len {
            inner_pad[i] = key_block[i] ^ IPAD;
            outer_pad[i] = key_block[i] ^ OPAD;
        }

        let mut inner = H::default();
        inner.update(&inner_pad[..block_len]);

        key_block.zeroize();
        inner_pad.zeroize();

        Self { inner, outer_pad }
    }

    /// Feed message data.
    pub(crate) fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Compute `H((K' xor opad) || H((K' xor ipad) || m))`.
    pub(crate) fn finalize(mut self) -> Digest {
        let inner = std::mem::take(&mut self.inner);
        let inner_digest = inner.finalize();

        let mut outer = H::default();
        outer.update(&self.outer_pad[..H::ALGORITHM.block_len()]);
        outer.update(inner_digest.as_bytes());
        outer.finalize()
    }
}

impl<H: Hasher> Drop for Hmac<H> {
    fn drop(&mut self) {
        self.inner.zeroize();
        self.outer_pad.zeroize();
    }
}

/// One-shot HMAC over `algorithm`.
pub fn hmac(algorithm: HashAlgorithm, key: &[u8], data: &[u8]) -> Digest {
    match algorithm {
        HashAlgorithm::Md5 => mac_with::<Md5>(key, data),
        HashAlgorithm::Sha1 => mac_with::<Sha1>(key, data),
        HashAlgorithm::Sha256 => mac_with::<Sha256>(key, data),
        HashAlgorithm::Sha384 => mac_with::<Sha384>(key, data),
        HashAlgorithm::Sha512 => mac_with::<Sha512>(key, data),
    }
}

/// One-shot HMAC-SHA1, the integrity function of the Kerberos AES enctypes.
pub fn hmac_sha1(key: &[u8], data: &[u8]) -> [u8; 20] {
    let digest = mac_with::<Sha1>(key, data);
    let mut out = [0u8; 20];
    out.copy_from_slice(digest.as_bytes());
    out
}

fn mac_with<H: Hasher>(key: &[u8], data: &[u8]) -> Digest {
    let mut mac = Hmac::<H>::new(key);
    mac.update(data);
    mac.finalize()
}

/// Compare two byte strings without early exit on the first difference.
///
/// Length mismatch returns false immediately; lengths are public.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let diff = a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0
}

// Digests never exceed a hash block, which the key-hashing branch relies on
const _: () = assert!(MAX_DIGEST_LEN <= MAX_BLOCK_LEN);
