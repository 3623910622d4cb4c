//! ⚠️ Raw RSA primitives, exposed with no padding or scheme-level error
//! checking.
//!
//! # ☢️️ WARNING: HAZARDOUS API ☢️
//!
//! Everything in this module operates directly on RSAEP/RSADP with no
//! padding scheme. Raw RSA is not semantically secure and must never be
//! used on attacker-influenced input without [`crate::oaep`], [`crate::pss`]
//! or [`crate::pkcs1v15`] wrapped around it. This module exists for
//! interoperability testing and for callers building a new scheme on top of
//! the primitive, not for application use.

use num_bigint_dig::BigUint;

use crate::algorithms::rsa::{rsadp_plain, rsaep};
use crate::errors::Result;
use crate::key::{RsaPrivateKey, RsaPublicKey};

/// ⚠️ `RSAEP(pub_key, m)` — raw modular exponentiation, no padding.
pub fn rsa_encrypt(pub_key: &RsaPublicKey, m: &BigUint) -> Result<BigUint> {
    rsaep(pub_key.n(), pub_key.e(), m)
}

/// ⚠️ `RSADP(priv_key, c)` via the non-CRT path — raw modular exponentiation
/// with the full private exponent `d`, no padding, no CRT acceleration.
///
/// Exists for testing the CRT-accelerated path in [`RsaPrivateKey::decrypt_primitive`]
/// against a reference computation, per spec's note that a plain non-CRT
/// decryption path exists for testing.
pub fn rsa_decrypt_plain(priv_key: &RsaPrivateKey, d: &BigUint, c: &BigUint) -> Result<BigUint> {
    rsadp_plain(priv_key.n(), d, c)
}
