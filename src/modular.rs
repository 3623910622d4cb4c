//! Modular residues: a value paired with its modulus, with arithmetic that
//! keeps the pairing explicit instead of folding the modulus into a type
//! parameter — division can narrow the modulus, so the modulus has to be a
//! runtime field, not a compile-time one.

use num_bigint_dig::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::arith::ext_gcd;
use crate::errors::{Error, Result};

/// A residue `value (mod modulus)`, always kept reduced to `0 <= value < modulus`.
///
/// Ordering compares `(value, modulus)` lexicographically — it exists so
/// residues can sit in a `BTreeSet`/`sort`, not because one modulus is
/// "greater" than another in any number-theoretic sense.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mod {
    value: BigInt,
    modulus: BigInt,
}

impl Mod {
    /// Builds a residue, reducing `value` into `[0, modulus)`.
    ///
    /// # Panics
    /// Panics if `modulus == 0`.
    pub fn new(value: BigInt, modulus: BigInt) -> Self {
        assert!(!modulus.is_zero(), "Mod::new: modulus is zero");
        let value = value.mod_floor(&modulus);
        Mod { value, modulus }
    }

    pub fn value(&self) -> &BigInt {
        &self.value
    }

    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    /// `self == Mod(0, _)`.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    fn check_same_modulus(&self, other: &Mod) -> Result<()> {
        if self.modulus != other.modulus {
            Err(Error::InvalidModulus)
        } else {
            Ok(())
        }
    }

    pub fn neg(&self) -> Mod {
        Mod::new(-&self.value, self.modulus.clone())
    }

    pub fn add_mod(&self, other: &Mod) -> Result<Mod> {
        self.check_same_modulus(other)?;
        Ok(Mod::new(&self.value + &other.value, self.modulus.clone()))
    }

    pub fn add_int(&self, other: &BigInt) -> Mod {
        Mod::new(&self.value + other, self.modulus.clone())
    }

    pub fn sub_mod(&self, other: &Mod) -> Result<Mod> {
        self.check_same_modulus(other)?;
        Ok(Mod::new(&self.value - &other.value, self.modulus.clone()))
    }

    pub fn mul_mod(&self, other: &Mod) -> Result<Mod> {
        self.check_same_modulus(other)?;
        Ok(Mod::new(&self.value * &other.value, self.modulus.clone()))
    }

    pub fn mul_int(&self, other: &BigInt) -> Mod {
        Mod::new(&self.value * other, self.modulus.clone())
    }

    /// `gcd(value, modulus) == 1`.
    pub fn invertible(&self) -> bool {
        self.value.gcd(&self.modulus) == BigInt::one()
    }

    /// Modular inverse via extended Euclid. Fails when `value` and
    /// `modulus` are not coprime.
    pub fn inv(&self) -> Result<Mod> {
        let (d, x, _y) = ext_gcd(&self.value, &self.modulus);
        if d != BigInt::one() {
            return Err(Error::InvalidArguments);
        }
        Ok(Mod::new(x, self.modulus.clone()))
    }

    /// `self.inv()`, unwrapped into an unsigned value. The result is always
    /// in `[0, modulus)`, so this never discards sign information.
    pub fn inv_to_biguint(&self) -> Result<BigUint> {
        self.inv()?.value.to_biguint().ok_or(Error::Internal)
    }

    /// `self / other (mod n)`. Defined only when `gcd(int(other), n) | value`.
    /// The result's modulus is `n / gcd(int(other), n)` — it may be smaller
    /// than `self.modulus`.
    pub fn div_int(&self, other: &BigInt) -> Result<Mod> {
        let d = other.gcd(&self.modulus);
        let (q, r) = self.value.div_rem(&d);
        if !r.is_zero() {
            return Err(Error::InvalidArguments);
        }
        let narrowed_modulus = &self.modulus / &d;
        let narrowed_divisor = other / &d;
        let inv = Mod::new(narrowed_divisor, narrowed_modulus.clone()).inv()?;
        Ok(inv.mul_int(&q))
    }

    pub fn div_mod(&self, other: &Mod) -> Result<Mod> {
        self.check_same_modulus(other)?;
        self.div_int(&other.value)
    }

    /// Modular exponentiation; `exp` may be negative (composes with [`Mod::inv`]).
    pub fn pow(&self, exp: &BigInt) -> Result<Mod> {
        if exp.is_negative() {
            let base = self.inv()?;
            let pos_exp = (-exp).to_biguint().unwrap();
            Ok(Mod::new(
                base.value.modpow(&BigInt::from(pos_exp), &base.modulus),
                base.modulus,
            ))
        } else {
            let exp = exp.to_biguint().ok_or(Error::InvalidArguments)?;
            Ok(Mod::new(
                self.value.modpow(&BigInt::from(exp), &self.modulus),
                self.modulus.clone(),
            ))
        }
    }

    /// Returns `r` with `2*r == self`.
    ///
    /// When `modulus` is odd, `modulus` is unchanged. When `modulus` is
    /// even and `value` is even, both are halved. Fails when `modulus` is
    /// even and `value` is odd.
    pub fn half(&self) -> Result<Mod> {
        if self.modulus.is_odd() {
            let half_mod = (&self.modulus + BigInt::one()) >> 1u32;
            let v = if self.value.is_even() {
                &self.value >> 1u32
            } else {
                (&self.value + &self.modulus) >> 1u32
            };
            Ok(Mod::new(v, self.modulus.clone()))
        } else if self.value.is_even() {
            Ok(Mod::new(&self.value >> 1u32, &self.modulus >> 1u32))
        } else {
            Err(Error::InvalidArguments)
        }
    }

    /// Jacobi symbol `(value / modulus)`. `modulus` must be odd and positive;
    /// callers should treat an even modulus result of `0` as undefined per
    /// the standard caveat, not as a genuine symbol value.
    pub fn jacobi(&self) -> i8 {
        jacobi_symbol(&self.value, &self.modulus)
    }
}

/// Jacobi symbol `(a / n)` for odd `n > 0`. Returns 0 for even `n` (by
/// convention here, documented as undefined rather than meaningful).
pub fn jacobi_symbol(a: &BigInt, n: &BigInt) -> i8 {
    if n.is_even() || !n.is_positive() {
        return 0;
    }
    let mut a = a.mod_floor(n);
    let mut n = n.clone();
    let mut result = 1i8;

    while !a.is_zero() {
        while a.is_even() {
            a >>= 1u32;
            let r = (&n % BigInt::from(8i64)).to_i64().unwrap_or(0);
            if r == 3 || r == 5 {
                result = -result;
            }
        }
        core::mem::swap(&mut a, &mut n);
        let a_mod4 = (&a % BigInt::from(4i64)).to_i64().unwrap_or(0);
        let n_mod4 = (&n % BigInt::from(4i64)).to_i64().unwrap_or(0);
        if a_mod4 == 3 && n_mod4 == 3 {
            result = -result;
        }
        a = a.mod_floor(&n);
    }

    if n.is_one() {
        result
    } else {
        0
    }
}

use num_traits::ToPrimitive;

/// CRT combiner: given `r1 (mod n1)` and `r2 (mod n2)` with `gcd(n1, n2) = 1`,
/// produces the unique residue mod `n1*n2` congruent to both. `n1_inv_mod_n2`
/// may be supplied precomputed (as RSA decryption does with `qinv`).
pub fn crt_combine(r1: &Mod, r2: &Mod, n1_inv_mod_n2: Option<&BigInt>) -> Result<Mod> {
    let n1 = r1.modulus();
    let n2 = r2.modulus();
    let inv = match n1_inv_mod_n2 {
        Some(v) => v.clone(),
        None => Mod::new(n1.clone(), n2.clone()).inv()?.value().clone(),
    };
    let diff = Mod::new(r2.value() - r1.value(), n2.clone());
    let h = diff.mul_int(&inv);
    let combined_modulus = n1 * n2;
    Ok(Mod::new(r1.value() + n1 * h.value(), combined_modulus))
}
