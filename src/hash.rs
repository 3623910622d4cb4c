//! The hash collaborator boundary: a named adapter over a `digest::Digest`
//! implementation, carrying its OID, output length, and advertised
//! security-strength fields, for call sites (DSA, fingerprinting) that pick
//! a hash algorithm at runtime rather than as a static type parameter.

use alloc::vec::Vec;

use crate::oid::{self, Oid};

/// Which domain-bound class a hash falls into, for the advisory
/// "message too long" warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DomainBound {
    /// 512-bit block hashes: practical bound 2^61 bytes.
    Block512,
    /// 1024-bit block hashes: practical bound 2^125 bytes.
    Block1024,
    /// Sponge-based (SHA-3/SHAKE): no practical message-length bound.
    Unbounded,
}

/// A named hash algorithm: OID, output length in bytes, collision-resistance
/// strength in bits, length-extension resistance in bits (0 if none), and
/// the function that computes it.
pub struct HashAlg {
    oid: fn() -> Oid,
    hlen: usize,
    collision_resist: u32,
    extension_resist: u32,
    domain: DomainBound,
    invoke: fn(&[u8]) -> Vec<u8>,
}

impl HashAlg {
    pub fn oid(&self) -> Oid {
        (self.oid)()
    }

    pub fn hlen(&self) -> usize {
        self.hlen
    }

    /// Collision-resistance strength in bits — spec's "security strength".
    pub fn security_strength(&self) -> u32 {
        self.collision_resist
    }

    pub fn extension_resist(&self) -> u32 {
        self.extension_resist
    }

    pub fn hash(&self, message: &[u8]) -> Vec<u8> {
        self.warn_if_over_domain_bound(message.len());
        (self.invoke)(message)
    }

    fn warn_if_over_domain_bound(&self, msg_len: usize) {
        let over = match self.domain {
            DomainBound::Block512 => msg_len >= (1usize << 61),
            DomainBound::Block1024 => msg_len >= (1usize << 61), // saturates on 64-bit usize well below 2^125
            DomainBound::Unbounded => false,
        };
        if over {
            #[cfg(feature = "log")]
            log::warn!("message too long, hash insecure");
        }
    }
}

macro_rules! hash_alg {
    ($name:ident, $oid_fn:path, $digest:ty, $hlen:expr, $collision:expr, $extension:expr, $domain:expr) => {
        pub fn $name() -> HashAlg {
            fn invoke(message: &[u8]) -> Vec<u8> {
                use digest::Digest;
                <$digest>::digest(message).to_vec()
            }
            HashAlg {
                oid: $oid_fn,
                hlen: $hlen,
                collision_resist: $collision,
                extension_resist: $extension,
                domain: $domain,
                invoke,
            }
        }
    };
}

#[cfg(feature = "sha1")]
hash_alg!(
    sha1,
    oid::id_sha1,
    sha1::Sha1,
    20,
    62,
    0,
    DomainBound::Block512
);

#[cfg(feature = "sha2")]
hash_alg!(
    sha224,
    oid::id_sha224,
    sha2::Sha224,
    28,
    112,
    32,
    DomainBound::Block512
);
#[cfg(feature = "sha2")]
hash_alg!(
    sha256,
    oid::id_sha256,
    sha2::Sha256,
    32,
    128,
    0,
    DomainBound::Block512
);
#[cfg(feature = "sha2")]
hash_alg!(
    sha384,
    oid::id_sha384,
    sha2::Sha384,
    48,
    192,
    128,
    DomainBound::Block1024
);
#[cfg(feature = "sha2")]
hash_alg!(
    sha512,
    oid::id_sha512,
    sha2::Sha512,
    64,
    256,
    0,
    DomainBound::Block1024
);
#[cfg(feature = "sha2")]
hash_alg!(
    sha512_224,
    oid::id_sha512_224,
    sha2::Sha512_224,
    28,
    112,
    288,
    DomainBound::Block1024
);
#[cfg(feature = "sha2")]
hash_alg!(
    sha512_256,
    oid::id_sha512_256,
    sha2::Sha512_256,
    32,
    128,
    256,
    DomainBound::Block1024
);

#[cfg(feature = "sha3")]
hash_alg!(
    sha3_224,
    oid::id_sha3_224,
    sha3::Sha3_224,
    28,
    112,
    448,
    DomainBound::Unbounded
);
#[cfg(feature = "sha3")]
hash_alg!(
    sha3_256,
    oid::id_sha3_256,
    sha3::Sha3_256,
    32,
    128,
    512,
    DomainBound::Unbounded
);
#[cfg(feature = "sha3")]
hash_alg!(
    sha3_384,
    oid::id_sha3_384,
    sha3::Sha3_384,
    48,
    192,
    768,
    DomainBound::Unbounded
);
#[cfg(feature = "sha3")]
hash_alg!(
    sha3_512,
    oid::id_sha3_512,
    sha3::Sha3_512,
    64,
    256,
    1024,
    DomainBound::Unbounded
);

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "sha1")]
    #[test]
    fn sha1_adapter_matches_known_digest() {
        let h = sha1();
        let digest = h.hash(b"abc");
        assert_eq!(h.hlen(), 20);
        assert_eq!(digest.len(), 20);
    }

    #[cfg(feature = "sha2")]
    #[test]
    fn sha256_oid_matches_table() {
        assert_eq!(sha256().oid().to_dotted(), "2.16.840.1.101.3.4.2.1");
    }
}
