//! Octet/integer conversions and small number-theoretic helpers shared by
//! the modular, prime and padding layers.

use alloc::vec;
use alloc::vec::Vec;
use num_bigint_dig::{BigInt, BigUint, RandBigInt, Sign};
use num_traits::{One, Signed, Zero};
use rand_core::CryptoRngCore;

use crate::errors::{Error, Result};

/// Returns `(d, x, y)` with `d = gcd(a, b) = a*x + b*y`, `d >= 0`.
pub fn ext_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;
        let new_r = &old_r - &q * &r;
        old_r = core::mem::replace(&mut r, new_r);
        let new_s = &old_s - &q * &s;
        old_s = core::mem::replace(&mut s, new_s);
        let new_t = &old_t - &q * &t;
        old_t = core::mem::replace(&mut t, new_t);
    }

    if old_r.is_negative() {
        (-old_r, -old_s, -old_t)
    } else {
        (old_r, old_s, old_t)
    }
}

/// Classical binary GCD. Returns `|a|` when `b == 0`.
pub fn binary_gcd(a: &BigInt, b: &BigInt) -> BigUint {
    let mut a = a.abs().to_biguint().unwrap();
    let mut b = b.abs().to_biguint().unwrap();
    if a.is_zero() {
        return b;
    }
    if b.is_zero() {
        return a;
    }
    let shift = core::cmp::min(trailing_zeros_biguint(&a), trailing_zeros_biguint(&b));
    a >>= trailing_zeros_biguint(&a);
    loop {
        b >>= trailing_zeros_biguint(&b);
        if a > b {
            core::mem::swap(&mut a, &mut b);
        }
        b -= &a;
        if b.is_zero() {
            break;
        }
    }
    a << shift
}

fn trailing_zeros_biguint(a: &BigUint) -> u64 {
    if a.is_zero() {
        return 0;
    }
    a.trailing_zeros().unwrap_or(0)
}

/// Number of trailing zero bits of `a`. Zero when `a == 0`.
pub fn trailing_zeros(a: &BigInt) -> u64 {
    if a.is_zero() {
        return 0;
    }
    a.magnitude().trailing_zeros().unwrap_or(0)
}

/// Bit-length of a positive integer.
pub fn intlen(a: &BigInt) -> u64 {
    a.magnitude().bits()
}

/// Uniformly samples a `k`-bit integer with the top bit forced to 1, and
/// optionally the low bit forced to 1.
pub fn fixedrandbits(rng: &mut impl CryptoRngCore, k: u64, require_odd: bool) -> BigUint {
    assert!(k > 0, "fixedrandbits: k must be positive");
    let mut v = rng.gen_biguint(k);
    v.set_bit(k - 1, true);
    if require_odd {
        v.set_bit(0, true);
    }
    v
}

/// `ceil(sqrt(a))` via integer Newton iteration; returns `(root, is_perfect_square)`.
pub fn isqrt(a: &BigUint) -> (BigUint, bool) {
    if a.is_zero() {
        return (BigUint::zero(), true);
    }
    let mut x = BigUint::one() << ((a.bits() + 1) / 2 + 1);
    loop {
        let next = (&x + a / &x) >> 1u32;
        if next >= x {
            break;
        }
        x = next;
    }
    let is_sq = &x * &x == *a;
    (x, is_sq)
}

/// True iff `a` is a perfect square. Replaces the original source's
/// `isperfectsuqare`, which referenced an out-of-scope name `c`.
pub fn isperfectsquare(a: &BigUint) -> bool {
    isqrt(a).1
}

/// Signed big-endian octet encoding (`I2OSP` over signed integers).
///
/// Emits the shortest two's-complement octet string whose high bit encodes
/// the sign. When `len` is `Some(k)`, the result is zero/sign-padded (or
/// truncated, for non-negative values only) on the left to exactly `k`
/// octets.
pub fn i2osp(n: &BigInt, len: Option<usize>) -> Result<Vec<u8>> {
    let mut bytes = n.to_signed_bytes_be();
    if bytes.is_empty() {
        bytes.push(0);
    }
    match len {
        None => Ok(bytes),
        Some(k) => {
            if bytes.len() == k {
                Ok(bytes)
            } else if bytes.len() < k {
                let fill = if n.is_negative() { 0xffu8 } else { 0u8 };
                let mut out = vec![fill; k - bytes.len()];
                out.extend_from_slice(&bytes);
                Ok(out)
            } else {
                if n.is_negative() {
                    return Err(Error::InvalidArguments);
                }
                let drop = bytes.len() - k;
                if bytes[..drop].iter().any(|&b| b != 0) {
                    return Err(Error::InvalidArguments);
                }
                Ok(bytes.split_off(drop))
            }
        }
    }
}

/// Decodes a signed big-endian octet string, sign-extending from the top
/// bit of the first byte. Inverse of [`i2osp`].
pub fn os2ip(octets: &[u8]) -> BigInt {
    if octets.is_empty() {
        return BigInt::zero();
    }
    BigInt::from_signed_bytes_be(octets)
}

/// Decodes an unsigned big-endian octet string.
pub fn os2ui(octets: &[u8]) -> BigUint {
    BigUint::from_bytes_be(octets)
}

/// Unsigned big-endian octet encoding, optionally padded on the left to
/// exactly `len` octets. Used for fixed-width RSA payloads.
pub fn i2osp_unsigned(n: &BigUint, len: Option<usize>) -> Result<Vec<u8>> {
    let bytes = n.to_bytes_be();
    match len {
        None => Ok(bytes),
        Some(k) => {
            if bytes.len() > k {
                return Err(Error::InvalidArguments);
            }
            let mut out = vec![0u8; k - bytes.len()];
            out.extend_from_slice(&bytes);
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os2ip_i2osp_roundtrip_positive() {
        let n = BigInt::from(12345i64);
        let enc = i2osp(&n, None).unwrap();
        assert_eq!(os2ip(&enc), n);
    }

    #[test]
    fn os2ip_i2osp_roundtrip_negative() {
        let n = BigInt::from(-98765i64);
        let enc = i2osp(&n, None).unwrap();
        assert_eq!(os2ip(&enc), n);
    }

    #[test]
    fn os2ip_i2osp_roundtrip_zero() {
        let n = BigInt::zero();
        let enc = i2osp(&n, None).unwrap();
        assert_eq!(os2ip(&enc), n);
    }

    #[test]
    fn i2osp_fixed_length_pads() {
        let n = BigInt::from(5i64);
        let enc = i2osp(&n, Some(4)).unwrap();
        assert_eq!(enc.len(), 4);
        assert_eq!(os2ip(&enc), n);
    }

    #[test]
    fn i2osp_negative_fixed_length_rejects_truncation() {
        let n = BigInt::from(-5i64);
        assert!(i2osp(&n, Some(0)).is_err());
    }

    #[test]
    fn ext_gcd_basic() {
        let (d, x, y) = ext_gcd(&BigInt::from(240i64), &BigInt::from(46i64));
        assert_eq!(d, BigInt::from(2i64));
        assert_eq!(&BigInt::from(240i64) * &x + &BigInt::from(46i64) * &y, d);
    }

    #[test]
    fn binary_gcd_matches_euclid() {
        let a = BigInt::from(54i64);
        let b = BigInt::from(24i64);
        assert_eq!(binary_gcd(&a, &b), BigUint::from(6u64));
    }

    #[test]
    fn trailing_zeros_of_zero_is_zero() {
        assert_eq!(trailing_zeros(&BigInt::zero()), 0);
    }

    #[test]
    fn trailing_zeros_counts_low_bits() {
        assert_eq!(trailing_zeros(&BigInt::from(8i64)), 3);
    }

    #[test]
    fn isperfectsquare_detects_squares() {
        assert!(isperfectsquare(&BigUint::from(144u64)));
        assert!(!isperfectsquare(&BigUint::from(145u64)));
        assert!(isperfectsquare(&BigUint::zero()));
    }

    #[test]
    fn intlen_matches_bit_length() {
        assert_eq!(intlen(&BigInt::from(255i64)), 8);
        assert_eq!(intlen(&BigInt::from(256i64)), 9);
    }
}
