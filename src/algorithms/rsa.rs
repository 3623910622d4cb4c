//! RSAEP/RSADP/RSASP/RSAVP primitives, with CRT-accelerated decryption.

use num_bigint_dig::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::Zero;
use subtle::{Choice, ConditionallySelectable};

use crate::errors::{Error, Result};
use crate::modular::{crt_combine, Mod};

/// `m^e mod n`. Requires `0 <= m < n`.
pub fn rsaep(n: &BigUint, e: &BigUint, m: &BigUint) -> Result<BigUint> {
    if m >= n {
        return Err(Error::MessageTooLong);
    }
    Ok(m.modpow(e, n))
}

/// `RSAVP ≡ RSAEP`.
pub fn rsavp(n: &BigUint, e: &BigUint, s: &BigUint) -> Result<BigUint> {
    rsaep(n, e, s)
}

/// Non-CRT decryption path, kept for testing against the CRT-accelerated one.
pub fn rsadp_plain(n: &BigUint, d: &BigUint, c: &BigUint) -> Result<BigUint> {
    if c >= n {
        return Err(Error::MessageTooLong);
    }
    Ok(c.modpow(d, n))
}

/// `RSASP ≡ RSADP`.
pub fn rsasp_plain(n: &BigUint, d: &BigUint, m: &BigUint) -> Result<BigUint> {
    rsadp_plain(n, d, m)
}

/// CRT-accelerated decryption/signing primitive.
///
/// Computes `mp = c^dp mod p`, `mq = c^dq mod q`, and recombines via
/// `m = mq + q * ((mp - mq) * qinv mod p)` — the composition mandated for
/// this crate (see the design notes on CRT argument order).
#[allow(clippy::too_many_arguments)]
pub fn rsadp_crt(
    n: &BigUint,
    p: &BigUint,
    q: &BigUint,
    dp: &BigUint,
    dq: &BigUint,
    qinv: &BigUint,
    c: &BigUint,
) -> Result<BigUint> {
    if c >= n {
        return Err(Error::MessageTooLong);
    }
    let c_int = BigInt::from(c.clone());
    let p_int = BigInt::from(p.clone());
    let q_int = BigInt::from(q.clone());

    let mp = Mod::new(c_int.modpow(&BigInt::from(dp.clone()), &p_int), p_int.clone());
    let mq = Mod::new(c_int.modpow(&BigInt::from(dq.clone()), &q_int), q_int.clone());

    let combined = crt_combine(&mq, &mp, Some(&BigInt::from(qinv.clone())))?;
    combined
        .value()
        .to_biguint()
        .ok_or(Error::Internal)
}

/// `RSASP ≡ RSADP` (CRT path).
#[allow(clippy::too_many_arguments)]
pub fn rsasp_crt(
    n: &BigUint,
    p: &BigUint,
    q: &BigUint,
    dp: &BigUint,
    dq: &BigUint,
    qinv: &BigUint,
    m: &BigUint,
) -> Result<BigUint> {
    rsadp_crt(n, p, q, dp, dq, qinv, m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crt_matches_plain_decryption() {
        // n = 3233 = 61 * 53, e = 17, d = 2753 (textbook RSA example).
        let p = BigUint::from(61u64);
        let q = BigUint::from(53u64);
        let n = &p * &q;
        let d = BigUint::from(2753u64);
        let dp = &d % (&p - BigUint::from(1u64));
        let dq = &d % (&q - BigUint::from(1u64));
        let qinv = Mod::new(BigInt::from(q.clone()), BigInt::from(p.clone()))
            .inv()
            .unwrap()
            .value()
            .to_biguint()
            .unwrap();

        let c = BigUint::from(855u64);
        let via_crt = rsadp_crt(&n, &p, &q, &dp, &dq, &qinv, &c).unwrap();
        let via_plain = rsadp_plain(&n, &d, &c).unwrap();
        assert_eq!(via_crt, via_plain);
    }

    #[test]
    fn rsaep_rejects_m_out_of_range() {
        let n = BigUint::from(3233u64);
        let e = BigUint::from(17u64);
        assert!(rsaep(&n, &e, &n).is_err());
    }
}
