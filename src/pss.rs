//! RSASSA-PSS signatures (PKCS#1 Appendix A.2.3 / RFC 8017 §8.1).

use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;

use digest::Digest;
use num_bigint_dig::BigUint;
use rand_core::CryptoRngCore;
use subtle::{Choice, ConstantTimeEq};

use crate::errors::{Error, Result};
use crate::key::{RsaPrivateKey, RsaPublicKey};
use crate::mgf::mgf1;

const TRAILER_FIELD: u8 = 0xbc;

/// Default salt length in octets, per PKCS#1 Appendix A.2.3 / RFC 8017 §8.1.
const DEFAULT_SALT_LEN: usize = 20;

/// RSASSA-PSS, parameterized by hash `D` (used both to hash the message and
/// as the default MGF1 hash), with a configurable salt length (default 20,
/// independent of `D`'s output size).
pub struct Pss<D: Digest> {
    pub salt_len: usize,
    _hash: PhantomData<D>,
}

impl<D: Digest> Pss<D> {
    pub fn new() -> Self {
        Pss {
            salt_len: DEFAULT_SALT_LEN,
            _hash: PhantomData,
        }
    }

    pub fn new_with_salt_len(salt_len: usize) -> Self {
        Pss {
            salt_len,
            _hash: PhantomData,
        }
    }

    fn hlen() -> usize {
        D::output_size()
    }

    /// Signs the already-computed digest `m_hash` of the message.
    pub fn sign(
        &self,
        rng: &mut impl CryptoRngCore,
        priv_key: &RsaPrivateKey,
        m_hash: &[u8],
    ) -> Result<Vec<u8>> {
        let hlen = Self::hlen();
        if m_hash.len() != hlen {
            return Err(Error::InputNotHashed);
        }
        let em_bits = priv_key.public_key().bit_len() - 1;
        let em_len = em_bits.div_ceil(8) as usize;
        if em_len < hlen + self.salt_len + 2 {
            return Err(Error::MessageTooLong);
        }

        let mut salt = vec![0u8; self.salt_len];
        rng.fill_bytes(&mut salt);

        let em = emsa_pss_encode::<D>(m_hash, em_bits, &salt)?;
        let m = BigUint::from_bytes_be(&em);
        let s = priv_key.decrypt_primitive(&m)?;
        crate::arith::i2osp_unsigned(&s, Some(priv_key.public_key().byte_len()))
    }

    /// Verifies a signature over `m_hash`. Never errors on a bad signature;
    /// only an RSA-range violation on the underlying primitive propagates.
    pub fn verify(
        &self,
        pub_key: &RsaPublicKey,
        m_hash: &[u8],
        signature: &[u8],
    ) -> Result<bool> {
        let hlen = Self::hlen();
        if m_hash.len() != hlen || signature.len() != pub_key.byte_len() {
            return Ok(false);
        }
        let s = BigUint::from_bytes_be(signature);
        let m = pub_key.encrypt_primitive(&s)?;

        let em_bits = pub_key.bit_len() - 1;
        let em_len = em_bits.div_ceil(8) as usize;
        let mut em = match crate::arith::i2osp_unsigned(&m, Some(em_len)) {
            Ok(bytes) => bytes,
            Err(_) => {
                // modulus wasn't a clean multiple of 8 bits: the primitive's
                // full-width encoding has one extra leading octet.
                match crate::arith::i2osp_unsigned(&m, Some(em_len + 1)) {
                    Ok(bytes) if bytes[0] == 0 => bytes[1..].to_vec(),
                    _ => return Ok(false),
                }
            }
        };

        Ok(emsa_pss_verify::<D>(m_hash, &mut em, em_bits, self.salt_len))
    }
}

impl<D: Digest> Default for Pss<D> {
    fn default() -> Self {
        Self::new()
    }
}

fn emsa_pss_encode<D: Digest>(m_hash: &[u8], em_bits: u64, salt: &[u8]) -> Result<Vec<u8>> {
    let hlen = D::output_size();
    let em_len = em_bits.div_ceil(8) as usize;
    if em_len < hlen + salt.len() + 2 {
        return Err(Error::MessageTooLong);
    }

    let mut m_prime = vec![0u8; 8];
    m_prime.extend_from_slice(m_hash);
    m_prime.extend_from_slice(salt);
    let h = D::digest(&m_prime);

    let ps_len = em_len - salt.len() - hlen - 2;
    let mut db = vec![0u8; ps_len];
    db.push(0x01);
    db.extend_from_slice(salt);

    let db_mask = mgf1::<D>(&h, em_len - hlen - 1)?;
    let mut masked_db: Vec<u8> = db.iter().zip(db_mask.iter()).map(|(a, b)| a ^ b).collect();

    let unused_bits = (8 * em_len as u64) - em_bits;
    if unused_bits > 0 {
        masked_db[0] &= 0xffu8 >> unused_bits;
    }

    let mut em = Vec::with_capacity(em_len + hlen + 1);
    em.extend_from_slice(&masked_db);
    em.extend_from_slice(&h);
    em.push(TRAILER_FIELD);
    Ok(em)
}

fn emsa_pss_verify<D: Digest>(m_hash: &[u8], em: &mut [u8], em_bits: u64, salt_len: usize) -> bool {
    let hlen = D::output_size();
    let em_len = em_bits.div_ceil(8) as usize;
    if em.len() != em_len || em_len < hlen + salt_len + 2 {
        return false;
    }
    if em[em_len - 1] != TRAILER_FIELD {
        return false;
    }

    let unused_bits = (8 * em_len as u64) - em_bits;
    let top_mask = !(0xffu8 >> unused_bits) & 0xff;
    if unused_bits > 0 && em[0] & top_mask != 0 {
        return false;
    }

    let masked_db_len = em_len - hlen - 1;
    let masked_db = &em[..masked_db_len];
    let h = &em[masked_db_len..masked_db_len + hlen];

    let db_mask = match mgf1::<D>(h, masked_db_len) {
        Ok(mask) => mask,
        Err(_) => return false,
    };
    let mut db: Vec<u8> = masked_db
        .iter()
        .zip(db_mask.iter())
        .map(|(a, b)| a ^ b)
        .collect();
    if unused_bits > 0 {
        db[0] &= 0xffu8 >> unused_bits;
    }

    let ps_len = em_len - salt_len - hlen - 2;
    if db[..ps_len].iter().any(|&b| b != 0) || db[ps_len] != 0x01 {
        return false;
    }
    let salt = &db[ps_len + 1..];

    let mut m_prime = vec![0u8; 8];
    m_prime.extend_from_slice(m_hash);
    m_prime.extend_from_slice(salt);
    let h_prime = D::digest(&m_prime);

    bool::from(h_prime.as_slice().ct_eq(h))
}
