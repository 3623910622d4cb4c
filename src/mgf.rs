//! MGF1 mask generation function (PKCS#1 Appendix B.2).

use alloc::vec::Vec;
use digest::Digest;

use crate::errors::{Error, Result};

/// `mgf1(seed, masklen)` using digest `D`: concatenates
/// `D(seed || I2OSP(counter, 4))` for increasing counters, truncated to
/// `masklen`. Fails when `masklen > hlen * 2^32`.
pub fn mgf1<D: Digest>(seed: &[u8], masklen: usize) -> Result<Vec<u8>> {
    let hlen = D::output_size();
    let max_len = (hlen as u128) << 32;
    if masklen as u128 > max_len {
        return Err(Error::MessageTooLong);
    }

    let iterations = masklen.div_ceil(hlen);
    let mut out = Vec::with_capacity(iterations * hlen);
    for counter in 0..iterations as u32 {
        let mut hasher = D::new();
        hasher.update(seed);
        hasher.update(counter.to_be_bytes());
        out.extend_from_slice(&hasher.finalize());
    }
    out.truncate(masklen);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha1::Sha1;

    #[test]
    fn mgf1_produces_requested_length() {
        let mask = mgf1::<Sha1>(b"seed", 50).unwrap();
        assert_eq!(mask.len(), 50);
    }

    #[test]
    fn mgf1_is_deterministic() {
        let a = mgf1::<Sha1>(b"seed", 37).unwrap();
        let b = mgf1::<Sha1>(b"seed", 37).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn mgf1_prefix_stable_across_lengths() {
        let short = mgf1::<Sha1>(b"seed", 20).unwrap();
        let long = mgf1::<Sha1>(b"seed", 40).unwrap();
        assert_eq!(&long[..20], &short[..]);
    }
}
