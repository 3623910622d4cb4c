//! DSA domain parameters, key generation, signing, and verification, built
//! on the same modular and prime primitives as RSA.

use alloc::vec::Vec;
use digest::Digest;
use num_bigint_dig::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;

use crate::errors::{Error, Result};
use crate::modular::Mod;
use crate::primes::st_random_prime;

/// Domain parameters `(L, N, p, q, g)`: `q | p-1`, `g` has order `q mod p`,
/// `g != 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsaDomainParams {
    p: BigUint,
    q: BigUint,
    g: BigUint,
}

/// A DSA keypair: public `y = g^x mod p`, private `x` in `[1, q-1]`.
#[derive(Debug, Clone)]
pub struct DsaPrivateKey {
    domain: DsaDomainParams,
    x: BigUint,
    y: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsaSignature {
    pub r: BigUint,
    pub s: BigUint,
}

/// Minimum SP 800-57-style `(L, N)` strength this crate will generate
/// without an advisory warning.
const MIN_L: u64 = 2048;
const MIN_N: u64 = 224;

impl DsaDomainParams {
    /// Generates domain parameters of the given `(L, N)` sizing.
    ///
    /// `q` is an `N`-bit Shawe-Taylor provable prime; `p` is an `L`-bit
    /// Shawe-Taylor provable prime constrained to have `q` as a factor of
    /// `p-1`; `g` is found by picking `h` in `[2, p-2]` and retrying
    /// `g = h^((p-1)/q) mod p` while `g == 1`.
    pub fn generate(rng: &mut impl CryptoRngCore, l: u64, n: u64) -> Result<Self> {
        if l < MIN_L || n < MIN_N {
            #[cfg(feature = "log")]
            log::warn!("generating DSA domain parameters below SP 800-57 minimums");
        }
        let q = st_random_prime(rng, n, None)?;
        let p = st_random_prime(rng, l, Some(&q))?;

        let e = (&p - BigUint::one()) / &q;
        let g = loop {
            let h = rng.gen_biguint_range(&BigUint::from(2u64), &(&p - BigUint::one()));
            let g = h.modpow(&e, &p);
            if g != BigUint::one() {
                break g;
            }
        };

        Ok(DsaDomainParams { p, q, g })
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }
    pub fn q(&self) -> &BigUint {
        &self.q
    }
    pub fn g(&self) -> &BigUint {
        &self.g
    }
}

impl DsaPrivateKey {
    /// Draws `x` uniformly from `[1, q-1]` and computes `y = g^x mod p`.
    pub fn generate(rng: &mut impl CryptoRngCore, domain: DsaDomainParams) -> Self {
        let x = rng.gen_biguint_range(&BigUint::one(), domain.q());
        let y = domain.g.modpow(&x, &domain.p);
        DsaPrivateKey { domain, x, y }
    }

    pub fn domain(&self) -> &DsaDomainParams {
        &self.domain
    }

    pub fn x(&self) -> &BigUint {
        &self.x
    }

    pub fn y(&self) -> &BigUint {
        &self.y
    }

    /// Signs `message` under hash `D`, retrying when `r == 0` or `s == 0`.
    pub fn sign<D: Digest>(&self, rng: &mut impl CryptoRngCore, message: &[u8]) -> DsaSignature {
        let q = self.domain.q();
        let n_bytes = (q.bits() as usize).div_ceil(8);
        let h = leftmost_bits::<D>(message, n_bytes);

        loop {
            let k = rng.gen_biguint_range(&BigUint::one(), q);
            let r = self.domain.g.modpow(&k, &self.domain.p) % q;
            if r.is_zero() {
                continue;
            }
            let k_inv = match Mod::new(BigInt::from(k), BigInt::from(q.clone())).inv_to_biguint() {
                Ok(v) => v,
                Err(_) => continue,
            };
            let s = (&k_inv * (&self.x * &r + &h)) % q;
            if s.is_zero() {
                continue;
            }
            return DsaSignature { r, s };
        }
    }
}

/// Verifies `signature` over `message` under domain `params` and public key `y`.
pub fn verify<D: Digest>(
    params: &DsaDomainParams,
    y: &BigUint,
    message: &[u8],
    signature: &DsaSignature,
) -> Result<bool> {
    let q = params.q();
    if signature.r.is_zero() || &signature.r >= q || signature.s.is_zero() || &signature.s >= q {
        return Ok(false);
    }
    let n_bytes = (q.bits() as usize).div_ceil(8);
    let h = leftmost_bits::<D>(message, n_bytes);

    let w = Mod::new(BigInt::from(signature.s.clone()), BigInt::from(q.clone()))
        .inv_to_biguint()
        .map_err(|_| Error::InvalidSignature)?;

    let u1 = (&h * &w) % q;
    let u2 = (&signature.r * &w) % q;

    let v = (params.g.modpow(&u1, &params.p) * y.modpow(&u2, &params.p)) % &params.p % q;
    Ok(v == signature.r)
}

/// `H(m)` truncated from the left to `min(n_bytes, hlen)` bytes, interpreted
/// as a big-endian integer.
fn leftmost_bits<D: Digest>(message: &[u8], n_bytes: usize) -> BigUint {
    let digest = D::digest(message);
    let take = core::cmp::min(n_bytes, digest.len());
    BigUint::from_bytes_be(&digest[..take])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sha2::Sha256;

    #[test]
    fn domain_params_satisfy_divisibility() {
        let mut rng = ChaCha8Rng::from_seed([50u8; 32]);
        let domain = DsaDomainParams::generate(&mut rng, 256, 64).unwrap();
        assert!((domain.p() - BigUint::one()).is_multiple_of(domain.q()));
        assert_ne!(domain.g(), &BigUint::one());
    }

    #[test]
    fn sign_verify_roundtrip() {
        let mut rng = ChaCha8Rng::from_seed([51u8; 32]);
        let domain = DsaDomainParams::generate(&mut rng, 256, 64).unwrap();
        let key = DsaPrivateKey::generate(&mut rng, domain.clone());
        let sig = key.sign::<Sha256>(&mut rng, b"hello dsa");
        assert!(verify::<Sha256>(&domain, key.y(), b"hello dsa", &sig).unwrap());
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let mut rng = ChaCha8Rng::from_seed([52u8; 32]);
        let domain = DsaDomainParams::generate(&mut rng, 256, 64).unwrap();
        let key = DsaPrivateKey::generate(&mut rng, domain.clone());
        let sig = key.sign::<Sha256>(&mut rng, b"hello dsa");
        assert!(!verify::<Sha256>(&domain, key.y(), b"goodbye dsa", &sig).unwrap());
    }
}
