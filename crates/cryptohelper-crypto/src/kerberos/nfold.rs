//! n-fold (RFC 3961 §5.1)
//!
//! Stretches or compresses a constant to `n` bytes: concatenate copies of the
//! input until the length reaches `lcm(k, n)`, rotating each successive copy
//! 13 bits further right, then sum the `n`-byte chunks with ones'-complement
//! addition.

/// n-fold `input` to `output_len` bytes.
///
/// Empty input or zero output length yields an all-zero result of
/// `output_len` bytes.
pub fn n_fold(input: &[u8], output_len: usize) -> Vec<u8> {
    let mut acc = vec![0u8; output_len];
    if input.is_empty() || output_len == 0 {
        return acc;
    }

    let total = lcm(input.len(), output_len);
    let mut buffer = Vec::with_capacity(total);
    for copy in 0..total / input.len() {
        buffer.extend_from_slice(&rotate_right_bits(input, 13 * copy));
    }

    for chunk in buffer.chunks_exact(output_len) {
        add_ones_complement(&mut acc, chunk);
    }
    acc
}

/// Rotate a big-endian bit string right by `shift` bits.
fn rotate_right_bits(input: &[u8], shift: usize) -> Vec<u8> {
    let bits = input.len() * 8;
    let shift = shift % bits;
    let mut out = vec![0u8; input.len()];

    for i in 0..bits {
        let src = (i + bits - shift) % bits;
        let bit = (input[src / 8] >> (7 - src % 8)) & 1;
        out[i / 8] |= bit << (7 - i % 8);
    }
    out
}

/// `acc += chunk` in ones'-complement arithmetic: carries out of the most
/// significant byte wrap around into the least significant one.
fn add_ones_complement(acc: &mut [u8], chunk: &[u8]) {
    let mut carry = 0u16;
    for (a, b) in acc.iter_mut().zip(chunk).rev() {
        let sum = u16::from(*a) + u16::from(*b) + carry;
        *a = sum as u8;
        carry = sum >> 8;
    }

    while carry != 0 {
        for a in acc.iter_mut().rev() {
            let sum = u16::from(*a) + carry;
            *a = sum as u8;
            carry = sum >> 8;
            if carry == 0 {
                break;
            }
        }
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn lcm(a: usize, b: usize) -> usize {
    a / gcd(a, b) * b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(data: &[u8]) -> String {
        data.iter().map(|b| format!("{b:02x}")).collect()
    }

    // RFC 3961 Appendix A.1
    #[test]
    fn rfc3961_vectors() {
        assert_eq!(hex(&n_fold(b"012345", 8)), "be072631276b1955");
        assert_eq!(hex(&n_fold(b"password", 7)), "78a07b6caf85fa");
        assert_eq!(hex(&n_fold(b"Rough Consensus, and Running Code", 8)), "bb6ed30870b7f0e0");
        assert_eq!(hex(&n_fold(b"password", 21)), "59e4a8ca7c0385c3c37b3f6d2000247cb6e6bd5b3e");
        assert_eq!(hex(&n_fold(b"kerberos", 16)), "6b65726265726f737b9b5b2b93132b93");
    }

    #[test]
    fn same_length_is_identity() {
        assert_eq!(n_fold(b"kerberos", 8), b"kerberos");
    }

    #[test]
    fn rotation_wraps_around() {
        assert_eq!(rotate_right_bits(&[0x01, 0x00], 1), [0x00, 0x80]);
        // Lowest bit of the last byte wraps into the highest bit of the first
        assert_eq!(rotate_right_bits(&[0x00, 0x01], 1), [0x80, 0x00]);
        assert_eq!(rotate_right_bits(&[0x00, 0x01], 17), [0x80, 0x00]);
        assert_eq!(rotate_right_bits(&[0x12, 0x34], 16), [0x12, 0x34]);
        assert_eq!(rotate_right_bits(&[0x12, 0x34], 8), [0x34, 0x12]);
    }

    #[test]
    fn ones_complement_end_around_carry() {
        let mut acc = [0xff, 0xff];
        add_ones_complement(&mut acc, &[0x00, 0x01]);
        assert_eq!(acc, [0x00, 0x01]);
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(n_fold(&[], 4), vec![0u8; 4]);
        assert!(n_fold(b"abc", 0).is_empty());
    }
}
