//! PKCS#1 v1.5 padding: the raw primitive (demo-only, **not** secure for
//! arbitrary messages), padded encryption, and padded signing.

use alloc::vec;
use alloc::vec::Vec;
use digest::Digest;
use num_bigint_dig::BigUint;
use rand_core::CryptoRngCore;
use subtle::{Choice, ConstantTimeEq};

use crate::errors::{Error, Result};
use crate::key::{RsaPrivateKey, RsaPublicKey};
use crate::prefix::Prefix;

/// Marker type selecting PKCS#1 v1.5 padded encryption.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pkcs1v15Encrypt;

/// Marker type selecting PKCS#1 v1.5 padded signing, parameterized by the
/// digest algorithm's ASN.1 prefix and output length.
#[derive(Debug, Clone)]
pub struct Pkcs1v15Sign {
    pub prefix: Prefix,
    pub hash_len: usize,
}

impl Pkcs1v15Sign {
    pub fn new<D: Digest>(oid: crate::oid::Oid) -> Self {
        Pkcs1v15Sign {
            prefix: Prefix::for_oid_and_len(oid, D::output_size()),
            hash_len: D::output_size(),
        }
    }
}

/// Fills `buf` with non-zero random bytes, resampling zero bytes — the
/// PKCS#1 v1.5 padding string `PS` must contain no zero octets.
fn non_zero_random_bytes(rng: &mut impl CryptoRngCore, buf: &mut [u8]) {
    rng.fill_bytes(buf);
    for b in buf.iter_mut() {
        while *b == 0 {
            let mut one = [0u8; 1];
            rng.fill_bytes(&mut one);
            *b = one[0];
        }
    }
}

/// `EM = 0x00 || 0x02 || PS || 0x00 || M`, `PS` random non-zero bytes filling
/// out to exactly `k` octets, `k` the modulus octet length.
pub fn pkcs1v15_encrypt_pad(rng: &mut impl CryptoRngCore, k: usize, msg: &[u8]) -> Result<Vec<u8>> {
    if msg.len() + 11 > k {
        return Err(Error::MessageTooLong);
    }
    let ps_len = k - msg.len() - 3;
    let mut em = vec![0u8; k];
    em[1] = 0x02;
    non_zero_random_bytes(rng, &mut em[2..2 + ps_len]);
    em[2 + ps_len] = 0x00;
    em[3 + ps_len..].copy_from_slice(msg);
    Ok(em)
}

/// Reverses [`pkcs1v15_encrypt_pad`]. Reports a single undifferentiated
/// [`Error::Decryption`] on any structural failure to avoid a padding
/// oracle.
pub fn pkcs1v15_encrypt_unpad(em: &[u8]) -> Result<Vec<u8>> {
    if em.len() < 11 || em[0] != 0x00 || em[1] != 0x02 {
        return Err(Error::Decryption);
    }
    match em[2..].iter().position(|&b| b == 0) {
        Some(zero_at) if zero_at >= 8 => Ok(em[2 + zero_at + 1..].to_vec()),
        _ => Err(Error::Decryption),
    }
}

/// Encrypts `msg` under `pub_key` with PKCS#1 v1.5 padding.
pub fn encrypt(
    rng: &mut impl CryptoRngCore,
    pub_key: &RsaPublicKey,
    msg: &[u8],
) -> Result<Vec<u8>> {
    let k = pub_key.byte_len();
    let em = pkcs1v15_encrypt_pad(rng, k, msg)?;
    let m = BigUint::from_bytes_be(&em);
    pub_key.encrypt_basic(&m)
}

/// Decrypts a PKCS#1 v1.5 padded ciphertext.
pub fn decrypt(priv_key: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let k = priv_key.public_key().byte_len();
    if ciphertext.len() != k {
        return Err(Error::Decryption);
    }
    let em = priv_key.decrypt_basic(ciphertext)?;
    pkcs1v15_encrypt_unpad(&em)
}

/// Builds `EM = 0x00 || 0x01 || PS(0xff) || 0x00 || DigestInfo(hash)` and
/// signs it. `digest` must already be the `hash_len`-byte output of the
/// scheme's hash.
pub fn sign(
    priv_key: &RsaPrivateKey,
    scheme: &Pkcs1v15Sign,
    digest: &[u8],
) -> Result<Vec<u8>> {
    if digest.len() != scheme.hash_len {
        return Err(Error::InputNotHashed);
    }
    let k = priv_key.public_key().byte_len();
    let t = scheme.prefix.with_digest(digest);
    if t.len() + 11 > k {
        return Err(Error::MessageTooLong);
    }
    let ps_len = k - t.len() - 3;
    let mut em = vec![0u8; k];
    em[1] = 0x01;
    em[2..2 + ps_len].fill(0xff);
    em[2 + ps_len] = 0x00;
    em[3 + ps_len..].copy_from_slice(&t);

    let m = BigUint::from_bytes_be(&em);
    let s = priv_key.decrypt_primitive(&m)?;
    crate::arith::i2osp_unsigned(&s, Some(k))
}

/// Verifies a PKCS#1 v1.5 signature. Never errors on a bad signature —
/// structural mismatches simply return `false`; only RSA-range violations
/// on the underlying primitive propagate as an error.
pub fn verify(
    pub_key: &RsaPublicKey,
    scheme: &Pkcs1v15Sign,
    digest: &[u8],
    signature: &[u8],
) -> Result<bool> {
    let k = pub_key.byte_len();
    if signature.len() != k {
        return Ok(false);
    }
    let s = BigUint::from_bytes_be(signature);
    let m = pub_key.encrypt_primitive(&s)?;
    let em = match crate::arith::i2osp_unsigned(&m, Some(k)) {
        Ok(bytes) => bytes,
        Err(_) => return Ok(false),
    };

    let t = scheme.prefix.with_digest(digest);
    if t.len() + 11 > k {
        return Ok(false);
    }
    let ps_len = k - t.len() - 3;
    let mut expected = vec![0u8; k];
    expected[1] = 0x01;
    expected[2..2 + ps_len].fill(0xff);
    expected[2 + ps_len] = 0x00;
    expected[3 + ps_len..].copy_from_slice(&t);

    Ok(bool::from(em.ct_eq(&expected)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sha1::Sha1;

    fn test_key(rng: &mut impl CryptoRngCore) -> RsaPrivateKey {
        RsaPrivateKey::generate(rng, 512).unwrap()
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let mut rng = ChaCha8Rng::from_seed([10u8; 32]);
        let key = test_key(&mut rng);
        let msg = b"hello pkcs1v15";
        let ct = encrypt(&mut rng, key.public_key(), msg).unwrap();
        let pt = decrypt(&key, &ct).unwrap();
        assert_eq!(pt, msg);
    }

    #[test]
    fn message_too_long_rejected() {
        let mut rng = ChaCha8Rng::from_seed([11u8; 32]);
        let key = test_key(&mut rng);
        let msg = [0u8; 100];
        assert!(encrypt(&mut rng, key.public_key(), &msg).is_err());
    }

    #[test]
    fn sign_verify_roundtrip() {
        let mut rng = ChaCha8Rng::from_seed([12u8; 32]);
        let key = test_key(&mut rng);
        let scheme = Pkcs1v15Sign::new::<Sha1>(crate::oid::id_sha1());
        let digest = Sha1::digest(b"message");
        let sig = sign(&key, &scheme, &digest).unwrap();
        assert!(verify(key.public_key(), &scheme, &digest, &sig).unwrap());
    }

    #[test]
    fn verify_rejects_flipped_signature_byte() {
        let mut rng = ChaCha8Rng::from_seed([13u8; 32]);
        let key = test_key(&mut rng);
        let scheme = Pkcs1v15Sign::new::<Sha1>(crate::oid::id_sha1());
        let digest = Sha1::digest(b"message");
        let mut sig = sign(&key, &scheme, &digest).unwrap();
        let last = sig.len() - 1;
        sig[last] ^= 0x01;
        assert!(!verify(key.public_key(), &scheme, &digest, &sig).unwrap());
    }
}
