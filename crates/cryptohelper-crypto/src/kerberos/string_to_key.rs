//! Password-based key generation (RFC 3962 §4)
//!
//! `tkey = PBKDF2-HMAC-SHA1(password, salt, iterations, key_len)`, then
//! `key = DK(tkey, "kerberos")`.

use zeroize::{Zeroize, Zeroizing};

use super::{EncryptionType, derivation::derive_key};
use crate::{
    error::CryptoError,
    hash::{HashAlgorithm, Sha1},
    hmac::Hmac,
};

/// Iteration count used when the KDC supplies no `s2kparams`
pub const DEFAULT_ITERATIONS: u32 = 4096;

/// Constant fed to `DK` after PBKDF2
const KERBEROS_CONSTANT: &[u8] = b"kerberos";

const SHA1_LEN: usize = HashAlgorithm::Sha1.output_len();

/// Derive an `etype` key from a password and salt.
///
/// The salt is conventionally the realm followed by the principal name
/// components.
///
/// # Errors
///
/// - `InvalidIterationCount`: `iterations` is zero
pub fn string_to_key(
    etype: EncryptionType,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if iterations == 0 {
        return Err(CryptoError::InvalidIterationCount { iterations });
    }

    let mut tkey = Zeroizing::new(vec![0u8; etype.key_len()]);
    pbkdf2_hmac_sha1(password, salt, iterations, &mut tkey);

    derive_key(&tkey, KERBEROS_CONSTANT)
}

/// PBKDF2 (RFC 8018 §5.2) with HMAC-SHA1 as the PRF, filling `out`.
pub(crate) fn pbkdf2_hmac_sha1(password: &[u8], salt: &[u8], iterations: u32, out: &mut [u8]) {
    let keyed = Hmac::<Sha1>::new(password);

    for (index, chunk) in out.chunks_mut(SHA1_LEN).enumerate() {
        let block_number = (index as u32).wrapping_add(1);

        let mut mac = keyed.clone();
        mac.update(salt);
        mac.update(&block_number.to_be_bytes());

        let mut u = [0u8; SHA1_LEN];
        u.copy_from_slice(mac.finalize().as_bytes());
        let mut t = u;

        for _ in 1..iterations {
            let mut mac = keyed.clone();
            mac.update(&u);
            u.copy_from_slice(mac.finalize().as_bytes());
            for (t_byte, u_byte) in t.iter_mut().zip(u) {
                *t_byte ^= u_byte;
            }
        }

        chunk.copy_from_slice(&t[..chunk.len()]);
        u.zeroize();
        t.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(data: &[u8]) -> String {
        data.iter().map(|b| format!("{b:02x}")).collect()
    }

    const SALT: &[u8] = b"ATHENA.MIT.EDUraeburn";

    // RFC 3962 Appendix B, iteration count 1
    #[test]
    fn rfc3962_single_iteration() {
        let mut tkey = [0u8; 16];
        pbkdf2_hmac_sha1(b"password", SALT, 1, &mut tkey);
        assert_eq!(hex(&tkey), "cdedb5281bb2f801565a1122b2563515");

        let key128 =
            string_to_key(EncryptionType::Aes128CtsHmacSha196, b"password", SALT, 1).unwrap();
        assert_eq!(hex(&key128), "42263c6e89f4fc28b8df68ee09799f15");

        let key256 =
            string_to_key(EncryptionType::Aes256CtsHmacSha196, b"password", SALT, 1).unwrap();
        assert_eq!(hex(&key256), "fe697b52bc0d3ce14432ba036a92e65bbb52280990a2fa27883998d72af30161");
    }

    // RFC 3962 Appendix B, iteration count 2
    #[test]
    fn rfc3962_two_iterations() {
        let key256 =
            string_to_key(EncryptionType::Aes256CtsHmacSha196, b"password", SALT, 2).unwrap();
        assert_eq!(hex(&key256), "a2e16d16b36069c135d5e9d2e25f896102685618b95914b467c67622225824ff");
    }

    // RFC 3962 Appendix B, iteration count 1200
    #[test]
    fn rfc3962_1200_iterations() {
        let key256 =
            string_to_key(EncryptionType::Aes256CtsHmacSha196, b"password", SALT, 1200).unwrap();
        assert_eq!(hex(&key256), "55a6ac740ad17b4846941051e1e8b0a7548d93b0ab30a8bc3ff16280382b8c2a");
    }

    #[test]
    fn zero_iterations_rejected() {
        let result = string_to_key(EncryptionType::Aes256CtsHmacSha196, b"pw", b"salt", 0);
        assert_eq!(result.err(), Some(CryptoError::InvalidIterationCount { iterations: 0 }));
    }
}
