//! RSA public/private key types and key generation.

use alloc::vec::Vec;
use num_bigint_dig::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithms::rsa::{rsadp_crt, rsaep};
use crate::arith::{i2osp_unsigned, intlen};
use crate::errors::{Error, Result};
use crate::modular::Mod;
use crate::primes::random_prime;

const MIN_PUBLIC_EXPONENT_BITS: u64 = 16;
const MAX_PUBLIC_EXPONENT_BITS: u64 = 256;

/// An RSA public key: modulus `n` and public exponent `e`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    n: BigUint,
    e: BigUint,
}

impl RsaPublicKey {
    /// Builds a public key from its raw components. Validates `e` is odd
    /// and in range, and that `n` is nontrivial.
    pub fn new(n: BigUint, e: BigUint) -> Result<Self> {
        if n.is_zero() || n.is_one() {
            return Err(Error::InvalidModulus);
        }
        if e.is_even() || e < BigUint::from(3u64) {
            return Err(Error::InvalidExponent);
        }
        Ok(RsaPublicKey { n, e })
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn e(&self) -> &BigUint {
        &self.e
    }

    /// Bit-length of the modulus.
    pub fn bit_len(&self) -> u64 {
        self.n.bits()
    }

    /// Octet-length of the modulus, `ceil(bit_len / 8)`.
    pub fn byte_len(&self) -> usize {
        self.bit_len().div_ceil(8) as usize
    }

    /// `RSAEP(self, m)`.
    pub fn encrypt_primitive(&self, m: &BigUint) -> Result<BigUint> {
        rsaep(&self.n, &self.e, m)
    }

    /// Fixed-width byte-level wrapper around [`RsaPublicKey::encrypt_primitive`].
    pub fn encrypt_basic(&self, m: &BigUint) -> Result<Vec<u8>> {
        let c = self.encrypt_primitive(m)?;
        i2osp_unsigned(&c, Some(self.byte_len()))
    }
}

/// An RSA private key in two-prime form, with CRT precomputation.
///
/// Invariants: `n = p*q`, `e*d ≡ 1 (mod lcm(p-1,q-1))`, `p` and `q` prime
/// and distinct. Immutable once constructed.
#[derive(Clone, ZeroizeOnDrop)]
pub struct RsaPrivateKey {
    #[zeroize(skip)]
    public: RsaPublicKey,
    d: BigUint,
    p: BigUint,
    q: BigUint,
    dp: BigUint,
    dq: BigUint,
    qinv: BigUint,
}

impl RsaPrivateKey {
    /// Generates a fresh keypair of the given modulus bit-length.
    ///
    /// Draws `p`, `q` each of `ceil((bitlen+1)/2)` bits until `n` is exactly
    /// `bitlen` bits, then draws `e` uniformly in `[2^16, 2^256)` until it is
    /// coprime with `lcm(p-1,q-1)`.
    pub fn generate(rng: &mut impl CryptoRngCore, bitlen: u64) -> Result<Self> {
        if bitlen < 1024 {
            #[cfg(feature = "log")]
            log::warn!("generating RSA key below 1024 bits, security strength < 80 bits");
        }
        let pbit = (bitlen + 1).div_ceil(2);

        let (p, q, n) = loop {
            let p = random_prime(rng, pbit);
            let q = random_prime(rng, pbit);
            if p == q {
                continue;
            }
            let n = &p * &q;
            if n.bits() == bitlen {
                break (p, q, n);
            }
        };

        let p_minus_1 = &p - BigUint::one();
        let q_minus_1 = &q - BigUint::one();
        let m = p_minus_1.lcm(&q_minus_1);

        let e = loop {
            let low = BigUint::one() << MIN_PUBLIC_EXPONENT_BITS;
            let high = BigUint::one() << MAX_PUBLIC_EXPONENT_BITS;
            let mut candidate = rng.gen_biguint_range(&low, &high);
            if candidate.is_even() {
                candidate += BigUint::one();
            }
            if candidate.gcd(&m) == BigUint::one() {
                break candidate;
            }
        };

        let d = Mod::new(BigInt::from(e.clone()), BigInt::from(m.clone())).inv_to_biguint()?;

        Self::from_components(n, e, d, p, q)
    }

    /// Builds a private key from already-known components, computing the
    /// CRT precomputation (`dp`, `dq`, `qinv`).
    pub fn from_components(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        p: BigUint,
        q: BigUint,
    ) -> Result<Self> {
        if p == q {
            return Err(Error::InvalidPrime);
        }
        if &p * &q != n {
            return Err(Error::InvalidModulus);
        }
        let public = RsaPublicKey::new(n, e)?;
        let dp = &d % (&p - BigUint::one());
        let dq = &d % (&q - BigUint::one());
        let qinv = Mod::new(BigInt::from(q.clone()), BigInt::from(p.clone())).inv_to_biguint()?;
        Ok(RsaPrivateKey {
            public,
            d,
            p,
            q,
            dp,
            dq,
            qinv,
        })
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    pub fn n(&self) -> &BigUint {
        &self.public.n
    }

    pub fn e(&self) -> &BigUint {
        &self.public.e
    }

    pub fn d(&self) -> &BigUint {
        &self.d
    }

    pub fn primes(&self) -> (&BigUint, &BigUint) {
        (&self.p, &self.q)
    }

    pub fn dp(&self) -> &BigUint {
        &self.dp
    }

    pub fn dq(&self) -> &BigUint {
        &self.dq
    }

    pub fn qinv(&self) -> &BigUint {
        &self.qinv
    }

    /// `RSADP(self, c)` via CRT.
    pub fn decrypt_primitive(&self, c: &BigUint) -> Result<BigUint> {
        rsadp_crt(
            &self.public.n,
            &self.p,
            &self.q,
            &self.dp,
            &self.dq,
            &self.qinv,
            c,
        )
    }

    /// Fixed-width byte-level wrapper around [`RsaPrivateKey::decrypt_primitive`].
    pub fn decrypt_basic(&self, c: &[u8]) -> Result<Vec<u8>> {
        let c = BigUint::from_bytes_be(c);
        let m = self.decrypt_primitive(&c)?;
        i2osp_unsigned(&m, Some(self.public.byte_len()))
    }
}

impl core::fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn keygen_511_bits_has_exact_bitlen() {
        let mut rng = ChaCha8Rng::from_seed([1u8; 32]);
        let key = RsaPrivateKey::generate(&mut rng, 511).unwrap();
        assert_eq!(intlen(&BigInt::from(key.n().clone())), 511);
        let (p, q) = key.primes();
        assert_eq!(p.bits(), 256);
        assert_eq!(q.bits(), 256);
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let mut rng = ChaCha8Rng::from_seed([2u8; 32]);
        let key = RsaPrivateKey::generate(&mut rng, 512).unwrap();
        let m = BigUint::from(424242u64);
        let c = key.public_key().encrypt_primitive(&m).unwrap();
        let recovered = key.decrypt_primitive(&c).unwrap();
        assert_eq!(recovered, m);
    }
}
