//! A small, strict ASN.1 DER codec covering the tag subset PKCS#1 and DSA
//! key material actually use: BOOLEAN, INTEGER, NULL, OCTET STRING,
//! UTF8String, OBJECT IDENTIFIER, SEQUENCE, and context-tagged values.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use num_bigint_dig::BigInt;

use crate::arith::{i2osp, os2ip};
use crate::errors::{Error, Result};
use crate::oid::Oid;

const TAG_BOOLEAN: u8 = 0x01;
const TAG_INTEGER: u8 = 0x02;
const TAG_OCTET_STRING: u8 = 0x04;
const TAG_NULL: u8 = 0x05;
const TAG_OID: u8 = 0x06;
const TAG_UTF8_STRING: u8 = 0x0c;
const TAG_SEQUENCE: u8 = 0x30;

const CONSTRUCTED: u8 = 0x20;
const CLASS_CONTEXT: u8 = 0x80;

/// The ASN.1 value universe this codec dispatches over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asn1Value {
    Null,
    Bool(bool),
    Int(BigInt),
    OctetString(Vec<u8>),
    Utf8(String),
    Oid(Oid),
    Seq(Vec<Asn1Value>),
    ContextTagged {
        tag: u32,
        class: u8,
        constructed: bool,
        payload: Vec<u8>,
    },
}

fn encode_identifier(class: u8, constructed: bool, tag: u32) -> Vec<u8> {
    let cons_bit = if constructed { CONSTRUCTED } else { 0 };
    if tag < 31 {
        vec![class | cons_bit | tag as u8]
    } else {
        let mut out = vec![class | cons_bit | 0x1f];
        let mut digits = vec![(tag & 0x7f) as u8];
        let mut rest = tag >> 7;
        while rest != 0 {
            digits.push((rest & 0x7f) as u8 | 0x80);
            rest >>= 7;
        }
        digits.reverse();
        out.extend(digits);
        out
    }
}

fn encode_length(len: usize) -> Vec<u8> {
    if len < 128 {
        vec![len as u8]
    } else {
        let mut body = Vec::new();
        let mut n = len;
        while n != 0 {
            body.push((n & 0xff) as u8);
            n >>= 8;
        }
        body.reverse();
        let mut out = vec![0x80 | body.len() as u8];
        out.extend(body);
        out
    }
}

fn decode_identifier(input: &[u8], index: usize) -> Result<(u8, bool, u32, usize)> {
    let first = *input.get(index).ok_or(Error::Asn1("truncated identifier"))?;
    let class = first & 0xc0;
    let constructed = first & CONSTRUCTED != 0;
    let low = first & 0x1f;
    if low != 0x1f {
        return Ok((class, constructed, low as u32, index + 1));
    }
    let mut tag: u32 = 0;
    let mut i = index + 1;
    let mut first_digit = true;
    loop {
        let byte = *input.get(i).ok_or(Error::Asn1("truncated identifier"))?;
        if first_digit && byte & 0x7f == 0 {
            return Err(Error::Asn1("non-minimal high-tag-number encoding"));
        }
        first_digit = false;
        if tag.leading_zeros() < 7 {
            return Err(Error::Asn1("tag overflow"));
        }
        tag = (tag << 7) | (byte & 0x7f) as u32;
        i += 1;
        if byte & 0x80 == 0 {
            break;
        }
    }
    if tag < 31 {
        return Err(Error::Asn1("non-minimal high-tag-number encoding"));
    }
    Ok((class, constructed, tag, i))
}

fn decode_length(input: &[u8], index: usize) -> Result<(usize, usize)> {
    let first = *input.get(index).ok_or(Error::Asn1("truncated length"))?;
    if first & 0x80 == 0 {
        return Ok((first as usize, index + 1));
    }
    let count = (first & 0x7f) as usize;
    if count == 0 {
        return Err(Error::Asn1("indefinite length not supported"));
    }
    let bytes = input
        .get(index + 1..index + 1 + count)
        .ok_or(Error::Asn1("truncated length"))?;
    if bytes[0] == 0 {
        return Err(Error::Asn1("non-minimal length encoding"));
    }
    let mut len: usize = 0;
    for &b in bytes {
        len = len
            .checked_shl(8)
            .and_then(|v| v.checked_add(b as usize))
            .ok_or(Error::Asn1("length overflow"))?;
    }
    if len < 128 {
        return Err(Error::Asn1("long-form length that fits in short form"));
    }
    Ok((len, index + 1 + count))
}

/// Encodes a single value to DER.
pub fn encode(value: &Asn1Value) -> Vec<u8> {
    match value {
        Asn1Value::Null => vec![TAG_NULL, 0x00],
        Asn1Value::Bool(b) => {
            let mut out = vec![TAG_BOOLEAN];
            out.extend(encode_length(1));
            out.push(if *b { 0xff } else { 0x00 });
            out
        }
        Asn1Value::Int(n) => {
            let body = i2osp(n, None).expect("i2osp with no fixed length cannot fail");
            let mut out = vec![TAG_INTEGER];
            out.extend(encode_length(body.len()));
            out.extend(body);
            out
        }
        Asn1Value::OctetString(bytes) => {
            let mut out = vec![TAG_OCTET_STRING];
            out.extend(encode_length(bytes.len()));
            out.extend_from_slice(bytes);
            out
        }
        Asn1Value::Utf8(s) => {
            let mut out = vec![TAG_UTF8_STRING];
            out.extend(encode_length(s.len()));
            out.extend_from_slice(s.as_bytes());
            out
        }
        Asn1Value::Oid(oid) => {
            let body = encode_oid_body(oid);
            let mut out = vec![TAG_OID];
            out.extend(encode_length(body.len()));
            out.extend(body);
            out
        }
        Asn1Value::Seq(items) => {
            let mut body = Vec::new();
            for item in items {
                body.extend(encode(item));
            }
            let mut out = vec![TAG_SEQUENCE];
            out.extend(encode_length(body.len()));
            out.extend(body);
            out
        }
        Asn1Value::ContextTagged {
            tag,
            class,
            constructed,
            payload,
        } => {
            let mut out = encode_identifier(*class | CLASS_CONTEXT, *constructed, *tag);
            out.extend(encode_length(payload.len()));
            out.extend_from_slice(payload);
            out
        }
    }
}

fn encode_oid_body(oid: &Oid) -> Vec<u8> {
    let arcs = oid.arcs();
    assert!(arcs.len() >= 2, "OID must have at least two arcs");
    let mut body = Vec::new();
    let first = arcs[0] * 40 + arcs[1];
    encode_base128(first, &mut body);
    for &arc in &arcs[2..] {
        encode_base128(arc, &mut body);
    }
    body
}

fn encode_base128(mut value: u64, out: &mut Vec<u8>) {
    let mut digits = vec![(value & 0x7f) as u8];
    value >>= 7;
    while value != 0 {
        digits.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    digits.reverse();
    out.extend(digits);
}

fn decode_oid_body(body: &[u8]) -> Result<Vec<u64>> {
    if body.is_empty() {
        return Err(Error::Asn1("empty OID body"));
    }
    let mut arcs = Vec::new();
    let mut value: u64 = 0;
    for &b in body {
        if value.leading_zeros() < 7 {
            return Err(Error::Asn1("OID arc overflow"));
        }
        value = (value << 7) | (b & 0x7f) as u64;
        if b & 0x80 == 0 {
            arcs.push(value);
            value = 0;
        }
    }
    if arcs.is_empty() {
        return Err(Error::Asn1("truncated OID"));
    }
    let first = arcs[0];
    let (a, b) = if first < 40 {
        (0, first)
    } else if first < 80 {
        (1, first - 40)
    } else {
        (2, first - 80)
    };
    let mut out = vec![a, b];
    out.extend_from_slice(&arcs[1..]);
    if out.len() < 2 {
        return Err(Error::Asn1("OID with fewer than two arcs"));
    }
    Ok(out)
}

/// Decodes one DER value starting at `index`. Returns the value and the
/// index just past it, so nested decodes compose by index threading.
pub fn decode(input: &[u8], index: usize) -> Result<(Asn1Value, usize)> {
    let (class, constructed, tag, body_start) = decode_identifier(input, index)?;
    let (len, content_start) = decode_length(input, body_start)?;
    let content = input
        .get(content_start..content_start + len)
        .ok_or(Error::Asn1("truncated content"))?;
    let end = content_start + len;

    if class & CLASS_CONTEXT != 0 {
        return Ok((
            Asn1Value::ContextTagged {
                tag,
                class: class & !CLASS_CONTEXT,
                constructed,
                payload: content.to_vec(),
            },
            end,
        ));
    }

    let value = match tag as u8 {
        TAG_NULL => {
            if !content.is_empty() {
                return Err(Error::Asn1("NULL with non-empty content"));
            }
            Asn1Value::Null
        }
        TAG_BOOLEAN => {
            if content.len() != 1 {
                return Err(Error::Asn1("BOOLEAN must be one octet"));
            }
            Asn1Value::Bool(content[0] != 0)
        }
        TAG_INTEGER => {
            if content.is_empty() {
                return Err(Error::Asn1("INTEGER with empty content"));
            }
            Asn1Value::Int(os2ip(content))
        }
        TAG_OCTET_STRING => Asn1Value::OctetString(content.to_vec()),
        TAG_UTF8_STRING => {
            let s = core::str::from_utf8(content)
                .map_err(|_| Error::Asn1("invalid UTF-8 in UTF8String"))?;
            Asn1Value::Utf8(String::from(s))
        }
        TAG_OID => {
            let arcs = decode_oid_body(content)?;
            Asn1Value::Oid(Oid::from_arcs(arcs))
        }
        t if t == (TAG_SEQUENCE & 0x1f) && constructed => {
            let mut items = Vec::new();
            let mut i = 0;
            while i < content.len() {
                let (item, next) = decode(content, i)?;
                if next > content.len() {
                    return Err(Error::Asn1("sequence child overran declared length"));
                }
                items.push(item);
                i = next;
            }
            Asn1Value::Seq(items)
        }
        _ => return Err(Error::Asn1("unsupported tag")),
    };
    Ok((value, end))
}

/// Convenience wrapper: encode a list of values as a SEQUENCE.
pub fn encode_sequence(items: Vec<Asn1Value>) -> Vec<u8> {
    encode(&Asn1Value::Seq(items))
}

/// Convenience wrapper: decode a SEQUENCE and return its children.
pub fn decode_sequence(input: &[u8], index: usize) -> Result<(Vec<Asn1Value>, usize)> {
    match decode(input, index)? {
        (Asn1Value::Seq(items), end) => Ok((items, end)),
        _ => Err(Error::Asn1("expected SEQUENCE")),
    }
}

impl Asn1Value {
    pub fn as_int(&self) -> Result<&BigInt> {
        match self {
            Asn1Value::Int(n) => Ok(n),
            _ => Err(Error::Asn1("expected INTEGER")),
        }
    }

    pub fn as_seq(&self) -> Result<&[Asn1Value]> {
        match self {
            Asn1Value::Seq(items) => Ok(items),
            _ => Err(Error::Asn1("expected SEQUENCE")),
        }
    }

    pub fn as_oid(&self) -> Result<&Oid> {
        match self {
            Asn1Value::Oid(oid) => Ok(oid),
            _ => Err(Error::Asn1("expected OBJECT IDENTIFIER")),
        }
    }

    pub fn as_octet_string(&self) -> Result<&[u8]> {
        match self {
            Asn1Value::OctetString(bytes) => Ok(bytes),
            _ => Err(Error::Asn1("expected OCTET STRING")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oid_2_1_1_encodes_exactly() {
        let oid = Oid::new(&[2, 1, 1], "");
        let encoded = encode(&Asn1Value::Oid(oid));
        assert_eq!(encoded, vec![0x06, 0x03, 0x51, 0x01, 0x01]);
    }

    #[test]
    fn roundtrip_integer() {
        let v = Asn1Value::Int(BigInt::from(-12345i64));
        let enc = encode(&v);
        let (dec, end) = decode(&enc, 0).unwrap();
        assert_eq!(dec, v);
        assert_eq!(end, enc.len());
    }

    #[test]
    fn roundtrip_sequence() {
        let v = Asn1Value::Seq(vec![
            Asn1Value::Int(BigInt::from(1i64)),
            Asn1Value::Bool(true),
            Asn1Value::Null,
            Asn1Value::OctetString(vec![1, 2, 3]),
        ]);
        let enc = encode(&v);
        let (dec, end) = decode(&enc, 0).unwrap();
        assert_eq!(dec, v);
        assert_eq!(end, enc.len());
    }

    #[test]
    fn roundtrip_utf8_and_oid() {
        let oid = Oid::new(&[1, 2, 840, 113549, 1, 1, 1], "rsaEncryption");
        let v = Asn1Value::Seq(vec![Asn1Value::Utf8(String::from("hi")), Asn1Value::Oid(oid)]);
        let enc = encode(&v);
        let (dec, _) = decode(&enc, 0).unwrap();
        assert_eq!(dec, v);
    }

    #[test]
    fn truncated_input_errors() {
        assert!(decode(&[0x02, 0x05, 0x01], 0).is_err());
    }

    #[test]
    fn non_minimal_length_errors() {
        // length octets: long form encoding "5" as 0x81 0x05 — must be rejected
        let bytes = [0x02u8, 0x81, 0x05, 0x01, 0x02, 0x03, 0x04, 0x05];
        assert!(decode(&bytes, 0).is_err());
    }

    #[test]
    fn non_minimal_high_tag_number_errors() {
        // SEQUENCE (universal tag 16) spelled out in long form: identifier
        // byte 0x3f (class+constructed+0x1f) followed by continuation byte
        // 0x10 (tag 16, no continuation bit) — must be rejected since 16 < 31
        // fits in the short form.
        let bytes = [0x3fu8, 0x10, 0x00];
        assert!(decode(&bytes, 0).is_err());
    }

    #[test]
    fn high_tag_number_with_leading_zero_digit_errors() {
        // First base-128 digit of 0x00 is a non-minimal leading zero.
        let bytes = [0x1fu8, 0x80, 0x01, 0x00];
        assert!(decode(&bytes, 0).is_err());
    }

    #[test]
    fn high_tag_number_above_short_form_roundtrips() {
        let v = Asn1Value::ContextTagged {
            tag: 40,
            class: 0,
            constructed: false,
            payload: vec![],
        };
        let enc = encode(&v);
        let (dec, _) = decode(&enc, 0).unwrap();
        assert_eq!(dec, v);
    }

    #[test]
    fn oid_arc_overflow_errors() {
        // OID body whose first base-128 group never terminates within a
        // u64's worth of 7-bit digits.
        let mut body = vec![0x81u8; 11];
        body.push(0x01);
        assert!(decode_oid_body(&body).is_err());
    }

    #[test]
    fn context_tagged_roundtrip() {
        let v = Asn1Value::ContextTagged {
            tag: 0,
            class: 0,
            constructed: true,
            payload: encode(&Asn1Value::Int(BigInt::from(0i64))),
        };
        let enc = encode(&v);
        let (dec, _) = decode(&enc, 0).unwrap();
        assert_eq!(dec, v);
    }
}
