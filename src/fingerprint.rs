//! Key fingerprinting: DER-encode a key, hash it, and present the digest as
//! hex, base64, and a drunken-bishop randomart box.

use alloc::format;
use alloc::string::String;

use crate::hash::HashAlg;
use crate::key::RsaPublicKey;
use crate::randomart::visualize;

/// The rendered fingerprint of a key: hex digest, base64 digest, and a
/// randomart box, each labeled with the key type and hash name.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    pub key_type: String,
    pub hash_name: String,
    pub hex: String,
    pub base64: String,
    pub randomart: String,
}

/// Computes the fingerprint of an RSA public key under `alg`: the key's
/// PKCS#1 DER encoding is hashed, and the digest drives both the textual
/// forms and the randomart header/footer.
pub fn print_fingerprint(key: &RsaPublicKey, alg: &HashAlg, hash_name: &str) -> Fingerprint {
    let der = key.to_pkcs1_der();
    let digest = alg.hash(&der);

    let hex = digest.iter().map(|b| format!("{b:02x}")).collect::<alloc::vec::Vec<_>>().join(":");

    use base64::Engine;
    let base64 = base64::engine::general_purpose::STANDARD.encode(&digest);

    let key_type = format!("RSA {}", key.bit_len());
    let randomart = visualize(
        &digest,
        Some(&format!("{key_type}")),
        Some(&format!("{}", hash_name.to_ascii_uppercase())),
    );

    Fingerprint {
        key_type,
        hash_name: String::from(hash_name),
        hex,
        base64,
        randomart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[cfg(feature = "sha2")]
    #[test]
    fn fingerprint_is_deterministic_for_a_fixed_key() {
        let mut rng = ChaCha8Rng::from_seed([60u8; 32]);
        let key = crate::key::RsaPrivateKey::generate(&mut rng, 512).unwrap();
        let alg = crate::hash::sha256();
        let a = print_fingerprint(key.public_key(), &alg, "sha256");
        let b = print_fingerprint(key.public_key(), &alg, "sha256");
        assert_eq!(a.hex, b.hex);
        assert_eq!(a.randomart, b.randomart);
        assert_eq!(a.hex.len(), 32 * 3 - 1); // 32 hex-pairs joined by ':'
    }
}
