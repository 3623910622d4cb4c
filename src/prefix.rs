//! The DigestInfo ASN.1 prefix PKCS#1 v1.5 signing prepends to a digest:
//! `SEQUENCE { SEQUENCE { OID, NULL }, OCTET STRING digest }`, with the
//! OCTET STRING's length/content left for the caller to append.

use alloc::vec::Vec;

use crate::asn1::{encode, Asn1Value};
use crate::hash::HashAlg;

/// The encoded `SEQUENCE { AlgorithmIdentifier, OCTET STRING(len) }` header,
/// stopping right before the digest bytes themselves.
#[derive(Debug, Clone)]
pub struct Prefix(Vec<u8>);

impl Prefix {
    /// Builds the DigestInfo prefix for a given hash algorithm and digest
    /// length (the hash's own `hlen`, passed explicitly so callers that
    /// already know it don't need a `HashAlg` value in hand).
    pub fn for_hash(alg: &HashAlg) -> Self {
        Self::for_oid_and_len(alg.oid(), alg.hlen())
    }

    pub fn for_oid_and_len(oid: crate::oid::Oid, digest_len: usize) -> Self {
        let alg_id = Asn1Value::Seq(vec![Asn1Value::Oid(oid), Asn1Value::Null]);
        let digest_info_without_digest =
            encode(&Asn1Value::Seq(vec![alg_id, Asn1Value::OctetString(alloc::vec![0u8; digest_len])]));
        // `digest_info_without_digest` ends in the placeholder digest bytes;
        // strip them so callers append the real digest in constant-time-safe
        // fashion without re-deriving the header.
        let split_at = digest_info_without_digest.len() - digest_len;
        Prefix(digest_info_without_digest[..split_at].to_vec())
    }

    /// The full DigestInfo header bytes, not including the digest itself.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Concatenates the header with the actual digest bytes.
    pub fn with_digest(&self, digest: &[u8]) -> Vec<u8> {
        let mut out = self.0.clone();
        out.extend_from_slice(digest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "sha1")]
    #[test]
    fn sha1_digestinfo_prefix_matches_rfc8017() {
        let alg = crate::hash::sha1();
        let prefix = Prefix::for_hash(&alg);
        let digest = [0xaau8; 20];
        let full = prefix.with_digest(&digest);
        // RFC 8017 Appendix A.2.4's well-known SHA-1 DigestInfo prefix.
        let expected_prefix: [u8; 15] = [
            0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02, 0x1a, 0x05, 0x00, 0x04,
            0x14,
        ];
        assert_eq!(&full[..15], &expected_prefix);
        assert_eq!(&full[15..], &digest);
    }
}
