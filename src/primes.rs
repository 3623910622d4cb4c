//! Sieve, trial division, Miller–Rabin, strong Lucas, Baillie–PSW, and
//! Shawe–Taylor provable-prime construction.

use alloc::vec;
use alloc::vec::Vec;
use num_bigint_dig::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand_core::CryptoRngCore;

use crate::arith::{fixedrandbits, intlen, isperfectsquare};
use crate::errors::{Error, Result};
use crate::modular::{jacobi_symbol, Mod};

const SMALL_PRIME_BOUND: u64 = 1 << 16;

/// Linear Euler sieve of all primes `< n`. Each composite is emitted once
/// at its smallest prime factor.
pub fn prime_sieve(n: usize) -> Vec<u32> {
    let mut is_composite = vec![false; n];
    let mut primes = Vec::new();
    for i in 2..n {
        if !is_composite[i] {
            primes.push(i as u32);
        }
        for &p in &primes {
            let pi = p as usize * i;
            if pi >= n {
                break;
            }
            is_composite[pi] = true;
            if i % p as usize == 0 {
                break;
            }
        }
    }
    primes
}

fn small_sieve() -> Vec<u32> {
    prime_sieve(SMALL_PRIME_BOUND as usize)
}

/// Primality test dispatching on magnitude: binary search the sieve below
/// 2^16, trial division below 2^32, Miller–Rabin with small fixed bases
/// above that.
pub fn isprime(n: &BigUint) -> bool {
    if n < &BigUint::from(2u64) {
        return false;
    }
    if let Some(small) = n.to_u64() {
        if small < SMALL_PRIME_BOUND {
            return small_sieve().binary_search(&(small as u32)).is_ok();
        }
        if small < (1u64 << 32) {
            for p in small_sieve() {
                let p = p as u64;
                if p * p > small {
                    return true;
                }
                if small % p == 0 {
                    return false;
                }
            }
            return true;
        }
    }
    miller_rabin_quick(n)
}

/// Miller–Rabin with a fixed witness set, adequate for a quick
/// compositeness filter on arbitrarily large `n`.
pub fn miller_rabin_quick(n: &BigUint) -> bool {
    const BASES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
    for base in BASES {
        let base = BigUint::from(base);
        if &base >= n {
            continue;
        }
        if !miller_rabin_witness(n, &base) {
            return false;
        }
    }
    true
}

/// Miller–Rabin with `iters` random bases.
pub fn miller_rabin(rng: &mut impl CryptoRngCore, n: &BigUint, iters: u32) -> bool {
    if n < &BigUint::from(3u64) {
        return n == &BigUint::from(2u64);
    }
    if n.is_even() {
        return false;
    }
    let upper = n - BigUint::from(3u64);
    for _ in 0..iters {
        let base = rng.gen_biguint_below(&upper) + BigUint::from(2u64);
        if !miller_rabin_witness(n, &base) {
            return false;
        }
    }
    true
}

fn miller_rabin_witness(n: &BigUint, base: &BigUint) -> bool {
    if n == &BigUint::from(2u64) {
        return true;
    }
    if n.is_even() || n < &BigUint::from(3u64) {
        return false;
    }
    let n_minus_1 = n - BigUint::one();
    let r = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> r;

    let mut x = base.modpow(&d, n);
    if x.is_one() || x == n_minus_1 {
        return true;
    }
    for _ in 1..r {
        x = &x * &x % n;
        if x == n_minus_1 {
            return true;
        }
    }
    false
}

/// Strong Lucas pseudoprime test with Selfridge's parameter search
/// (D = 5, -7, 9, -11, ... ), P = 1, Q = (1-D)/4.
pub fn general_lucas_test(n: &BigUint) -> bool {
    if n.is_even() {
        return n == &BigUint::from(2u64);
    }
    if isperfectsquare(n) {
        return false;
    }
    let n_int = BigInt::from(n.clone());

    let mut d: i64 = 5;
    let q;
    loop {
        let jac = jacobi_symbol(&BigInt::from(d), &n_int);
        if jac == -1 {
            q = (1 - d) / 4;
            break;
        }
        if jac == 0 {
            let g = BigUint::from(d.unsigned_abs()).gcd(n);
            if &g != n && g > BigUint::one() {
                return false;
            }
        }
        d = if d > 0 { -(d + 2) } else { -(d - 2) };
    }

    let d_big = BigInt::from(d);
    let q_big = BigInt::from(q);

    // Lucas sequences U_k, V_k mod n via MSB-first bit walk over n+1.
    let n_plus_1 = n + BigUint::one();
    let bits = n_plus_1.bits();

    let inv2 = match Mod::new(BigInt::from(2i64), n_int.clone()).inv() {
        Ok(v) => v.value().clone(),
        Err(_) => return false,
    };

    let (mut u, mut v) = (BigInt::zero(), BigInt::from(2i64));
    let mut qk = BigInt::one();

    for i in (0..bits).rev() {
        // double: U_{2k} = U_k V_k, V_{2k} = V_k^2 - 2 Q^k
        u = (&u * &v).mod_floor(&n_int);
        v = (&v * &v - BigInt::from(2i64) * &qk).mod_floor(&n_int);
        qk = (&qk * &qk).mod_floor(&n_int);

        if n_plus_1.bit(i) {
            // step: U_{k+1} = (P*U_k + V_k)/2, V_{k+1} = (D*U_k + P*V_k)/2
            let new_u = (&u + &v).mod_floor(&n_int) * &inv2 % &n_int;
            let new_v = (&d_big * &u + &v).mod_floor(&n_int) * &inv2 % &n_int;
            u = new_u.mod_floor(&n_int);
            v = new_v.mod_floor(&n_int);
            qk = (&qk * &q_big).mod_floor(&n_int);
        }
    }

    u.mod_floor(&n_int).is_zero()
}

/// Baillie–PSW: small-prime trial division, Miller–Rabin base 2, then the
/// strong Lucas test. No known composite passes.
pub fn baillie_psw(n: &BigUint) -> bool {
    if n < &BigUint::from(2u64) {
        return false;
    }
    for &p in small_sieve().iter().take(64) {
        let p = BigUint::from(p);
        if n == &p {
            return true;
        }
        if n.is_multiple_of(&p) {
            return false;
        }
    }
    if !miller_rabin_witness(n, &BigUint::from(2u64)) {
        return false;
    }
    general_lucas_test(n)
}

/// Smallest odd probable prime `>= max(3, a | 1)`.
pub fn to_next_prime(a: &BigUint) -> BigUint {
    let mut candidate = if a < &BigUint::from(3u64) {
        BigUint::from(3u64)
    } else if a.is_even() {
        a + BigUint::one()
    } else {
        a.clone()
    };
    loop {
        if baillie_psw(&candidate) {
            return candidate;
        }
        candidate += BigUint::from(2u64);
    }
}

/// Draws a fixed-width odd candidate and advances to the next probable
/// prime, retrying if the bit-length drifted.
pub fn random_prime(rng: &mut impl CryptoRngCore, bitlen: u64) -> BigUint {
    loop {
        let candidate = fixedrandbits(rng, bitlen, true);
        let p = to_next_prime(&candidate);
        if p.bits() == bitlen {
            return p;
        }
    }
}

/// Shawe–Taylor provable-prime construction (FIPS 186-4 Appendix C.6).
///
/// When `factor` is supplied, the constructed prime `p` satisfies
/// `(p - 1) % factor == 0`.
pub fn st_random_prime(
    rng: &mut impl CryptoRngCore,
    bitlen: u64,
    factor: Option<&BigUint>,
) -> Result<BigUint> {
    if bitlen < 2 {
        return Err(Error::InvalidArguments);
    }
    if bitlen < 33 {
        let max_tries = bitlen * 4 + 16;
        for _ in 0..max_tries {
            let candidate = fixedrandbits(rng, bitlen, true);
            if baillie_psw(&candidate) {
                if let Some(f) = factor {
                    if !(&candidate - BigUint::one()).is_multiple_of(f) {
                        continue;
                    }
                }
                return Ok(candidate);
            }
        }
        return Err(Error::PrimeSearchExhausted);
    }

    let seed_bitlen = (bitlen + 3) / 2;
    let p0 = st_random_prime(rng, seed_bitlen, None)?;

    let p2 = match factor {
        Some(f) => BigUint::from(2u64) * &p0 * f,
        None => BigUint::from(2u64) * &p0,
    };

    let max_tries = bitlen * 4 + 16;
    for _ in 0..max_tries {
        let x = fixedrandbits(rng, bitlen, false);
        let mut t = (&x + &p2 - BigUint::one()) / &p2;
        let mut p = &t * &p2 + BigUint::one();
        while p.bits() > bitlen {
            t -= BigUint::one();
            p = &t * &p2 + BigUint::one();
        }
        if p.bits() != bitlen {
            continue;
        }

        let a = rng.gen_biguint_range(&BigUint::from(2u64), &(&p - BigUint::one()));
        let exponent = match factor {
            Some(f) => BigUint::from(2u64) * &t * f,
            None => BigUint::from(2u64) * &t,
        };
        let z = a.modpow(&exponent, &p);

        let gcd_check = (&z - BigUint::one()).gcd(&p);
        if gcd_check != BigUint::one() {
            continue;
        }
        let z_p0 = z.modpow(&p0, &p);
        if z_p0.is_one() {
            return Ok(p);
        }
    }
    Err(Error::PrimeSearchExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn sieve_matches_small_known_primes() {
        let primes = prime_sieve(30);
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn isprime_small_cases() {
        assert!(isprime(&BigUint::from(2u64)));
        assert!(isprime(&BigUint::from(97u64)));
        assert!(!isprime(&BigUint::from(1u64)));
        assert!(!isprime(&BigUint::from(100u64)));
    }

    #[test]
    fn miller_rabin_quick_accepts_known_prime() {
        assert!(miller_rabin_quick(&BigUint::from(3439601197u64)));
    }

    #[test]
    fn baillie_psw_rejects_composites_up_to_bound() {
        for n in 4u64..100_000 {
            let is_prime_ref = isprime(&BigUint::from(n));
            assert_eq!(baillie_psw(&BigUint::from(n)), is_prime_ref, "n={n}");
        }
    }

    #[test]
    fn to_next_prime_finds_next() {
        assert_eq!(to_next_prime(&BigUint::from(8u64)), BigUint::from(11u64));
    }

    #[test]
    fn st_random_prime_has_exact_bitlen() {
        let mut rng = ChaCha8Rng::from_seed([42u8; 32]);
        let p = st_random_prime(&mut rng, 64, None).unwrap();
        assert_eq!(p.bits(), 64);
        assert!(baillie_psw(&p));
    }

    #[test]
    fn st_random_prime_respects_required_factor() {
        let mut rng = ChaCha8Rng::from_seed([7u8; 32]);
        let q = st_random_prime(&mut rng, 40, None).unwrap();
        let p = st_random_prime(&mut rng, 96, Some(&q)).unwrap();
        assert!((&p - BigUint::one()).is_multiple_of(&q));
    }
}
