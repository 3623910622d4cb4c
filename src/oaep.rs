//! RSAES-OAEP encryption (PKCS#1 Appendix A.2.1 / RFC 8017 §7.1).

use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;

use digest::Digest;
use num_bigint_dig::BigUint;
use rand_core::CryptoRngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::errors::{Error, Result};
use crate::key::{RsaPrivateKey, RsaPublicKey};
use crate::mgf::mgf1;

/// RSAES-OAEP, parameterized by the hash `D` (used both for `lHash` and as
/// the default MGF1 hash) and an optional label.
pub struct Oaep<D: Digest> {
    pub label: Vec<u8>,
    _hash: PhantomData<D>,
}

impl<D: Digest> Oaep<D> {
    pub fn new() -> Self {
        Oaep {
            label: Vec::new(),
            _hash: PhantomData,
        }
    }

    pub fn new_with_label(label: impl Into<Vec<u8>>) -> Self {
        Oaep {
            label: label.into(),
            _hash: PhantomData,
        }
    }

    fn hlen() -> usize {
        D::output_size()
    }

    fn l_hash(&self) -> Vec<u8> {
        D::digest(&self.label).to_vec()
    }

    /// Encrypts `msg` under `pub_key`.
    pub fn encrypt(
        &self,
        rng: &mut impl CryptoRngCore,
        pub_key: &RsaPublicKey,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        let k = pub_key.byte_len();
        let hlen = Self::hlen();
        if msg.len() > k.saturating_sub(2 * hlen + 2) {
            return Err(Error::MessageTooLong);
        }

        let l_hash = self.l_hash();
        let ps_len = k - msg.len() - 2 * hlen - 2;
        let mut db = Vec::with_capacity(k - hlen - 1);
        db.extend_from_slice(&l_hash);
        db.extend(core::iter::repeat(0u8).take(ps_len));
        db.push(0x01);
        db.extend_from_slice(msg);

        let mut seed = vec![0u8; hlen];
        rng.fill_bytes(&mut seed);

        let db_mask = mgf1::<D>(&seed, k - hlen - 1)?;
        let masked_db: Vec<u8> = db.iter().zip(db_mask.iter()).map(|(a, b)| a ^ b).collect();

        let seed_mask = mgf1::<D>(&masked_db, hlen)?;
        let masked_seed: Vec<u8> = seed
            .iter()
            .zip(seed_mask.iter())
            .map(|(a, b)| a ^ b)
            .collect();

        let mut em = Vec::with_capacity(k);
        em.push(0x00);
        em.extend_from_slice(&masked_seed);
        em.extend_from_slice(&masked_db);

        let m = BigUint::from_bytes_be(&em);
        pub_key.encrypt_basic(&m)
    }

    /// Decrypts an OAEP ciphertext. Every integrity failure collapses to a
    /// single [`Error::Decryption`], and equivalent work is performed on
    /// every path, to avoid a padding oracle.
    pub fn decrypt(&self, priv_key: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let k = priv_key.public_key().byte_len();
        let hlen = Self::hlen();
        if ciphertext.len() != k || k < 2 * hlen + 2 {
            return Err(Error::Decryption);
        }

        let em = priv_key.decrypt_basic(ciphertext)?;

        let y = em[0];
        let masked_seed = &em[1..1 + hlen];
        let masked_db = &em[1 + hlen..];

        let seed_mask = mgf1::<D>(masked_db, hlen)?;
        let seed: Vec<u8> = masked_seed
            .iter()
            .zip(seed_mask.iter())
            .map(|(a, b)| a ^ b)
            .collect();

        let db_mask = mgf1::<D>(&seed, k - hlen - 1)?;
        let db: Vec<u8> = masked_db
            .iter()
            .zip(db_mask.iter())
            .map(|(a, b)| a ^ b)
            .collect();

        let l_hash = self.l_hash();
        let lhash_ok: Choice = db[..hlen].ct_eq(&l_hash);

        // Find the 0x01 separator after the zero run, without branching on
        // secret data: scan the whole buffer, remembering the first index
        // whose byte is 0x01 while every byte before it has been 0x00.
        let mut found_one_index: u64 = 0;
        let mut found_one: Choice = Choice::from(0);
        let mut still_zero: Choice = Choice::from(1);
        for (i, &b) in db[hlen..].iter().enumerate() {
            let is_zero = Choice::from((b == 0) as u8);
            let is_one = Choice::from((b == 1) as u8);
            let this_is_separator = still_zero & is_one;
            found_one_index.conditional_assign(&(i as u64), this_is_separator & !found_one);
            found_one |= this_is_separator;
            still_zero &= is_zero;
        }

        if !bool::from(lhash_ok & found_one & Choice::from((y == 0) as u8)) {
            return Err(Error::Decryption);
        }

        Ok(db[hlen + found_one_index as usize + 1..].to_vec())
    }
}

impl<D: Digest> Default for Oaep<D> {
    fn default() -> Self {
        Self::new()
    }
}
