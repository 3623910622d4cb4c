//! PKCS#1 DER encode/decode for RSA public and private keys, plus a
//! base64-wrapped ASCII form for on-disk storage.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use num_bigint_dig::BigInt;

use crate::asn1::{decode, encode, Asn1Value};
use crate::errors::{Error, Result};
use crate::key::{RsaPrivateKey, RsaPublicKey};

const PEM_LINE_WIDTH: usize = 70;

impl RsaPublicKey {
    /// `SEQUENCE { INTEGER n, INTEGER e }`.
    pub fn to_pkcs1_der(&self) -> Vec<u8> {
        encode(&Asn1Value::Seq(vec![
            Asn1Value::Int(BigInt::from(self.n().clone())),
            Asn1Value::Int(BigInt::from(self.e().clone())),
        ]))
    }

    pub fn from_pkcs1_der(der: &[u8]) -> Result<Self> {
        let (value, end) = decode(der, 0)?;
        if end != der.len() {
            return Err(Error::Asn1("trailing bytes after public key"));
        }
        let items = value.as_seq()?;
        if items.len() != 2 {
            return Err(Error::Asn1("RSAPublicKey must have exactly 2 fields"));
        }
        let n = items[0].as_int()?;
        let e = items[1].as_int()?;
        if n.sign() == num_bigint_dig::Sign::Minus || e.sign() == num_bigint_dig::Sign::Minus {
            return Err(Error::Asn1("RSAPublicKey fields must be non-negative"));
        }
        RsaPublicKey::new(
            n.to_biguint().ok_or(Error::InvalidModulus)?,
            e.to_biguint().ok_or(Error::InvalidExponent)?,
        )
    }

    pub fn to_pkcs1_pem(&self) -> String {
        wrap_pem(&self.to_pkcs1_der(), "RSA PUBLIC KEY")
    }

    pub fn from_pkcs1_pem(pem: &str) -> Result<Self> {
        Self::from_pkcs1_der(&unwrap_pem(pem, "RSA PUBLIC KEY")?)
    }
}

impl RsaPrivateKey {
    /// `SEQUENCE { INTEGER version=0, n, e, d, p, q, dp, dq, qinv }`.
    /// Rejects multi-prime keys (this crate only models two-prime RSA).
    pub fn to_pkcs1_der(&self) -> Vec<u8> {
        encode(&Asn1Value::Seq(vec![
            Asn1Value::Int(BigInt::from(0i64)),
            Asn1Value::Int(BigInt::from(self.n().clone())),
            Asn1Value::Int(BigInt::from(self.e().clone())),
            Asn1Value::Int(BigInt::from(self.d().clone())),
            Asn1Value::Int(BigInt::from(self.primes().0.clone())),
            Asn1Value::Int(BigInt::from(self.primes().1.clone())),
            Asn1Value::Int(BigInt::from(self.dp().clone())),
            Asn1Value::Int(BigInt::from(self.dq().clone())),
            Asn1Value::Int(BigInt::from(self.qinv().clone())),
        ]))
    }

    pub fn from_pkcs1_der(der: &[u8]) -> Result<Self> {
        let (value, end) = decode(der, 0)?;
        if end != der.len() {
            return Err(Error::Asn1("trailing bytes after private key"));
        }
        let items = value.as_seq()?;
        if items.len() != 9 {
            return Err(Error::Asn1(
                "RSAPrivateKey must have exactly 9 fields (multi-prime keys are unsupported)",
            ));
        }
        let version = items[0].as_int()?;
        if version != &BigInt::from(0i64) {
            return Err(Error::Asn1("unsupported RSAPrivateKey version"));
        }
        let n = items[1].as_int()?.to_biguint().ok_or(Error::InvalidModulus)?;
        let e = items[2].as_int()?.to_biguint().ok_or(Error::InvalidExponent)?;
        let d = items[3].as_int()?.to_biguint().ok_or(Error::InvalidExponent)?;
        let p = items[4].as_int()?.to_biguint().ok_or(Error::InvalidPrime)?;
        let q = items[5].as_int()?.to_biguint().ok_or(Error::InvalidPrime)?;
        // dp, dq, qinv (items[6..9]) are recomputed by from_components rather
        // than trusted from the wire, so a tampered DER can't desync them
        // from d/p/q.
        RsaPrivateKey::from_components(n, e, d, p, q)
    }

    pub fn to_pkcs1_pem(&self) -> String {
        wrap_pem(&self.to_pkcs1_der(), "RSA PRIVATE KEY")
    }

    pub fn from_pkcs1_pem(pem: &str) -> Result<Self> {
        Self::from_pkcs1_der(&unwrap_pem(pem, "RSA PRIVATE KEY")?)
    }
}

fn wrap_pem(der: &[u8], label: &str) -> String {
    use base64::Engine;
    let encoded = base64::engine::general_purpose::STANDARD.encode(der);
    let mut out = String::new();
    out.push_str(&alloc::format!("-----BEGIN {label}-----\n"));
    for chunk in encoded.as_bytes().chunks(PEM_LINE_WIDTH) {
        out.push_str(core::str::from_utf8(chunk).expect("base64 output is ASCII"));
        out.push('\n');
    }
    out.push_str(&alloc::format!("-----END {label}-----\n"));
    out
}

fn unwrap_pem(pem: &str, label: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    let begin = alloc::format!("-----BEGIN {label}-----");
    let end = alloc::format!("-----END {label}-----");
    let body = pem
        .split(&begin)
        .nth(1)
        .and_then(|rest| rest.split(&end).next())
        .ok_or(Error::Asn1("PEM header/footer not found"))?;
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|_| Error::Asn1("invalid base64 in PEM body"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn public_key_der_roundtrip() {
        let mut rng = ChaCha8Rng::from_seed([40u8; 32]);
        let key = RsaPrivateKey::generate(&mut rng, 512).unwrap();
        let pub_key = key.public_key().clone();
        let der = pub_key.to_pkcs1_der();
        let decoded = RsaPublicKey::from_pkcs1_der(&der).unwrap();
        assert_eq!(decoded, pub_key);
    }

    #[test]
    fn private_key_der_roundtrip() {
        let mut rng = ChaCha8Rng::from_seed([41u8; 32]);
        let key = RsaPrivateKey::generate(&mut rng, 512).unwrap();
        let der = key.to_pkcs1_der();
        let decoded = RsaPrivateKey::from_pkcs1_der(&der).unwrap();
        assert_eq!(decoded.n(), key.n());
        assert_eq!(decoded.d(), key.d());
    }

    #[test]
    fn public_key_pem_roundtrip() {
        let mut rng = ChaCha8Rng::from_seed([42u8; 32]);
        let key = RsaPrivateKey::generate(&mut rng, 512).unwrap();
        let pub_key = key.public_key().clone();
        let pem = pub_key.to_pkcs1_pem();
        assert!(pem.starts_with("-----BEGIN RSA PUBLIC KEY-----\n"));
        let decoded = RsaPublicKey::from_pkcs1_pem(&pem).unwrap();
        assert_eq!(decoded, pub_key);
    }

    #[test]
    fn rejects_multiprime_version() {
        let bad = encode(&Asn1Value::Seq(alloc::vec![
            Asn1Value::Int(BigInt::from(1i64)),
            Asn1Value::Int(BigInt::from(1i64)),
        ]));
        assert!(RsaPrivateKey::from_pkcs1_der(&bad).is_err());
    }
}
