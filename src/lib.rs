#![allow(unused_variables, unused_mut, unused_imports, dead_code)]
#![cfg_attr(not(feature = "std"), no_std)]

//! A from-scratch RSA/DSA toolkit: bignum modular arithmetic, probable- and
//! provable-prime generation, a hand-built ASN.1 DER codec, and the RSA/DSA
//! schemes built on top of them.
//!
//! # Supported schemes
//!
//! - [PKCS#1 v1.5 encryption](pkcs1v15) and [signatures](pkcs1v15)
//! - [RSAES-OAEP encryption](oaep)
//! - [RSASSA-PSS signatures](pss)
//! - [DSA](dsa) signatures over the same modular/prime primitives
//!
//! Hash implementations are an external collaborator reached through
//! [`digest::Digest`]; this crate does not implement any hash function
//! itself.

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub use rand_core;
pub use signature;

pub mod arith;
pub mod asn1;
pub mod dsa;
pub mod errors;
pub mod fingerprint;
#[cfg(feature = "hazmat")]
pub mod hazmat;
pub mod hash;
pub mod key;
pub mod mgf;
pub mod modular;
pub mod oaep;
pub mod oid;
pub mod pkcs1_der;
pub mod pkcs1v15;
pub mod primes;
pub mod pss;
pub mod randomart;

mod algorithms;
#[cfg(test)]
mod dummy_rng;
mod prefix;

#[cfg(feature = "sha1")]
pub use sha1;
#[cfg(feature = "sha2")]
pub use sha2;
#[cfg(feature = "sha3")]
pub use sha3;

pub use crate::{
    errors::{Error, Result},
    key::{RsaPrivateKey, RsaPublicKey},
    oaep::Oaep,
    pkcs1v15::{Pkcs1v15Encrypt, Pkcs1v15Sign},
    prefix::Prefix,
    pss::Pss,
};
