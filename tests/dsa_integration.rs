//! End-to-end DSA domain generation, keygen, signing and verification
//! through the public API.

use num_integer::Integer;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::Sha256;

use rsa_toolkit::dsa::{self, DsaDomainParams, DsaPrivateKey};

#[test]
fn domain_generation_satisfies_fips_structure() {
    let mut rng = ChaCha8Rng::from_seed([200u8; 32]);
    let domain = DsaDomainParams::generate(&mut rng, 256, 64).unwrap();
    assert_eq!(domain.p().bits(), 256);
    assert_eq!(domain.q().bits(), 64);
    assert!((domain.p() - num_bigint_dig::BigUint::from(1u64)).is_multiple_of(domain.q()));
}

#[test]
fn sign_and_verify_roundtrip() {
    let mut rng = ChaCha8Rng::from_seed([201u8; 32]);
    let domain = DsaDomainParams::generate(&mut rng, 256, 64).unwrap();
    let key = DsaPrivateKey::generate(&mut rng, domain.clone());

    let msg = b"vote: yes";
    let sig = key.sign::<Sha256>(&mut rng, msg);
    assert!(dsa::verify::<Sha256>(&domain, key.y(), msg, &sig).unwrap());
}

#[test]
fn verify_rejects_signature_from_a_different_key() {
    let mut rng = ChaCha8Rng::from_seed([202u8; 32]);
    let domain = DsaDomainParams::generate(&mut rng, 256, 64).unwrap();
    let key_a = DsaPrivateKey::generate(&mut rng, domain.clone());
    let key_b = DsaPrivateKey::generate(&mut rng, domain.clone());

    let msg = b"vote: yes";
    let sig = key_a.sign::<Sha256>(&mut rng, msg);
    assert!(!dsa::verify::<Sha256>(&domain, key_b.y(), msg, &sig).unwrap());
}

#[test]
fn verify_rejects_out_of_range_signature_components() {
    let mut rng = ChaCha8Rng::from_seed([203u8; 32]);
    let domain = DsaDomainParams::generate(&mut rng, 256, 64).unwrap();
    let key = DsaPrivateKey::generate(&mut rng, domain.clone());
    let mut sig = key.sign::<Sha256>(&mut rng, b"hello");
    sig.r = domain.q().clone();
    assert!(!dsa::verify::<Sha256>(&domain, key.y(), b"hello", &sig).unwrap());
}
