//! Object identifiers: a sequence of arcs paired with a human description,
//! plus the fixed table of OIDs this crate's wire formats reference.

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;

/// An object identifier: numeric arcs plus a human-readable description.
/// Composition (`subnode`) appends a further arc.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    arcs: Vec<u64>,
    desc: String,
}

impl Oid {
    pub fn new(arcs: &[u64], desc: &str) -> Self {
        Oid {
            arcs: arcs.to_vec(),
            desc: desc.to_owned(),
        }
    }

    pub fn from_arcs(arcs: Vec<u64>) -> Self {
        Oid {
            arcs,
            desc: String::new(),
        }
    }

    pub fn arcs(&self) -> &[u64] {
        &self.arcs
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// Appends one arc, producing a child OID with its own description.
    pub fn subnode(&self, arc: u64, desc: &str) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Oid {
            arcs,
            desc: desc.to_owned(),
        }
    }

    /// Returns the OID's owning (parent) node, if it has more than two arcs.
    pub fn parent_node(&self) -> Option<Oid> {
        if self.arcs.len() <= 2 {
            return None;
        }
        Some(Oid {
            arcs: self.arcs[..self.arcs.len() - 1].to_vec(),
            desc: String::new(),
        })
    }

    /// Dotted-decimal rendering, e.g. `"1.2.840.113549.1.1.1"`.
    pub fn to_dotted(&self) -> String {
        let mut s = String::new();
        for (i, arc) in self.arcs.iter().enumerate() {
            if i > 0 {
                s.push('.');
            }
            s.push_str(&alloc::format!("{arc}"));
        }
        s
    }
}

macro_rules! oid {
    ($($arc:expr),+ ; $desc:expr) => {
        Oid::new(&[$($arc),+], $desc)
    };
}

// PKCS#1 (RFC 8017) algorithm identifiers.
pub fn rsa_encryption() -> Oid {
    oid!(1, 2, 840, 113549, 1, 1, 1; "rsaEncryption")
}
pub fn rsaes_oaep() -> Oid {
    oid!(1, 2, 840, 113549, 1, 1, 7; "rsaesOaep")
}
pub fn mgf1() -> Oid {
    oid!(1, 2, 840, 113549, 1, 1, 8; "mgf1")
}
pub fn p_specified() -> Oid {
    oid!(1, 2, 840, 113549, 1, 1, 9; "pSpecified")
}
pub fn rsassa_pss() -> Oid {
    oid!(1, 2, 840, 113549, 1, 1, 10; "rsassaPss")
}

// Hash OIDs.
pub fn id_md5() -> Oid {
    oid!(1, 2, 840, 113549, 2, 5; "MD5")
}
pub fn id_sha1() -> Oid {
    oid!(1, 3, 14, 3, 2, 26; "SHA1")
}
pub fn id_sha224() -> Oid {
    oid!(2, 16, 840, 1, 101, 3, 4, 2, 4; "SHA224")
}
pub fn id_sha256() -> Oid {
    oid!(2, 16, 840, 1, 101, 3, 4, 2, 1; "SHA256")
}
pub fn id_sha384() -> Oid {
    oid!(2, 16, 840, 1, 101, 3, 4, 2, 2; "SHA384")
}
pub fn id_sha512() -> Oid {
    oid!(2, 16, 840, 1, 101, 3, 4, 2, 3; "SHA512")
}
pub fn id_sha512_224() -> Oid {
    oid!(2, 16, 840, 1, 101, 3, 4, 2, 5; "SHA512-224")
}
pub fn id_sha512_256() -> Oid {
    oid!(2, 16, 840, 1, 101, 3, 4, 2, 6; "SHA512-256")
}
pub fn id_sha3_224() -> Oid {
    oid!(2, 16, 840, 1, 101, 3, 4, 2, 7; "SHA3-224")
}
pub fn id_sha3_256() -> Oid {
    oid!(2, 16, 840, 1, 101, 3, 4, 2, 8; "SHA3-256")
}
pub fn id_sha3_384() -> Oid {
    oid!(2, 16, 840, 1, 101, 3, 4, 2, 9; "SHA3-384")
}
pub fn id_sha3_512() -> Oid {
    oid!(2, 16, 840, 1, 101, 3, 4, 2, 10; "SHA3-512")
}
pub fn id_shake128() -> Oid {
    oid!(2, 16, 840, 1, 101, 3, 4, 2, 11; "SHAKE128")
}
pub fn id_shake256() -> Oid {
    oid!(2, 16, 840, 1, 101, 3, 4, 2, 12; "SHAKE256")
}

/// ANSI X9.57 `id-dsa`.
pub fn id_dsa() -> Oid {
    oid!(1, 2, 840, 10040, 4, 1; "id-dsa")
}
