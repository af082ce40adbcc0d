//! # Key-pair text encoding
//!
//! Serializes RSA key material to PEM: the public half as a
//! SubjectPublicKeyInfo (`PUBLIC KEY`), the private half as PKCS#1
//! `RSAPrivateKey` (`RSA PRIVATE KEY`). Integers are unsigned big-endian byte
//! strings; this module only encodes them, it never does RSA arithmetic.
//!
//! [`import_public_key`] reads a `PUBLIC KEY` block back into an
//! [`RsaKeyPair`] with no private half.

mod der;

pub use der::{encode_integer, encode_length};

use crate::consts::PEM_LINE_WIDTH;
use crate::error::EtmError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use der::{
    encode_tlv, DerReader, RSA_ENCRYPTION_OID, TAG_BIT_STRING, TAG_NULL, TAG_OID, TAG_SEQUENCE,
};
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

const PUBLIC_LABEL: &str = "PUBLIC KEY";
const PRIVATE_LABEL: &str = "RSA PRIVATE KEY";

/// Private CRT components, wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RsaPrivateParts {
    pub d: Vec<u8>,
    pub p: Vec<u8>,
    pub q: Vec<u8>,
    pub dp: Vec<u8>,
    pub dq: Vec<u8>,
    pub qinv: Vec<u8>,
}

/// Compares every component without an early exit; only lengths may differ
/// observably.
impl ConstantTimeEq for RsaPrivateParts {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.d.ct_eq(&other.d)
            & self.p.ct_eq(&other.p)
            & self.q.ct_eq(&other.q)
            & self.dp.ct_eq(&other.dp)
            & self.dq.ct_eq(&other.dq)
            & self.qinv.ct_eq(&other.qinv)
    }
}

impl std::fmt::Debug for RsaPrivateParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RsaPrivateParts { .. }")
    }
}

/// RSA key material. `private` is `None` for a public-only key.
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub modulus: Vec<u8>,
    pub public_exponent: Vec<u8>,
    pub private: Option<RsaPrivateParts>,
}

impl RsaKeyPair {
    pub fn public(modulus: impl Into<Vec<u8>>, public_exponent: impl Into<Vec<u8>>) -> Self {
        Self {
            modulus: modulus.into(),
            public_exponent: public_exponent.into(),
            private: None,
        }
    }

    pub const fn has_private(&self) -> bool {
        self.private.is_some()
    }
}

/// SubjectPublicKeyInfo PEM for the public half of `pair`.
pub fn export_public_key(pair: &RsaKeyPair) -> String {
    let mut rsa_public = Vec::new();
    encode_integer(&mut rsa_public, &pair.modulus);
    encode_integer(&mut rsa_public, &pair.public_exponent);

    let mut bit_string = vec![0x00]; // no unused bits
    encode_tlv(&mut bit_string, TAG_SEQUENCE, &rsa_public);

    let mut algorithm = Vec::new();
    encode_tlv(&mut algorithm, TAG_OID, &RSA_ENCRYPTION_OID);
    encode_tlv(&mut algorithm, TAG_NULL, &[]);

    let mut spki = Vec::new();
    encode_tlv(&mut spki, TAG_SEQUENCE, &algorithm);
    encode_tlv(&mut spki, TAG_BIT_STRING, &bit_string);

    let mut der = Vec::new();
    encode_tlv(&mut der, TAG_SEQUENCE, &spki);
    armor(PUBLIC_LABEL, &der)
}

/// PKCS#1 PEM for the full key pair.
///
/// # Errors
///
/// [`EtmError::NoPrivateKeyMaterial`] when `pair` is public-only.
pub fn export_private_key(pair: &RsaKeyPair) -> Result<String, EtmError> {
    let private = pair.private.as_ref().ok_or(EtmError::NoPrivateKeyMaterial)?;

    let mut fields = zeroize::Zeroizing::new(Vec::new());
    encode_integer(&mut fields, &[0x00]); // version
    for part in [
        &pair.modulus,
        &pair.public_exponent,
        &private.d,
        &private.p,
        &private.q,
        &private.dp,
        &private.dq,
        &private.qinv,
    ] {
        encode_integer(&mut fields, part);
    }

    let mut der = zeroize::Zeroizing::new(Vec::new());
    encode_tlv(&mut der, TAG_SEQUENCE, &fields);
    Ok(armor(PRIVATE_LABEL, &der))
}

/// Private PEM when the pair has private material, public PEM otherwise.
pub fn export_key(pair: &RsaKeyPair) -> String {
    export_private_key(pair).unwrap_or_else(|_| export_public_key(pair))
}

/// Parse a `PUBLIC KEY` PEM block into a public-only [`RsaKeyPair`].
///
/// # Errors
///
/// [`EtmError::Encoding`] for a missing/mismatched armor line, bad Base64,
/// malformed DER or a non-RSA algorithm identifier.
pub fn import_public_key(pem: &str) -> Result<RsaKeyPair, EtmError> {
    let der = unarmor(PUBLIC_LABEL, pem)?;

    let mut outer = DerReader::new(&der);
    let mut spki = DerReader::new(outer.read(TAG_SEQUENCE)?);
    if !outer.is_empty() {
        return Err(EtmError::Encoding("trailing data after SubjectPublicKeyInfo".into()));
    }

    let mut algorithm = DerReader::new(spki.read(TAG_SEQUENCE)?);
    if algorithm.read(TAG_OID)? != RSA_ENCRYPTION_OID {
        return Err(EtmError::Encoding("not an rsaEncryption key".into()));
    }

    let bit_string = spki.read(TAG_BIT_STRING)?;
    let key_bytes = match bit_string {
        [0x00, rest @ ..] => rest,
        _ => return Err(EtmError::Encoding("public key BIT STRING has unused bits".into())),
    };

    let mut key_seq = DerReader::new(key_bytes);
    let mut fields = DerReader::new(key_seq.read(TAG_SEQUENCE)?);
    let modulus = fields.read_unsigned()?;
    let public_exponent = fields.read_unsigned()?;
    Ok(RsaKeyPair::public(modulus, public_exponent))
}

fn armor(label: &str, der: &[u8]) -> String {
    let body = STANDARD.encode(der);
    let mut out = format!("-----BEGIN {label}-----\n");
    // Base64 output is ASCII, so byte chunks are valid str slices.
    for line in body.as_bytes().chunks(PEM_LINE_WIDTH) {
        out.push_str(&String::from_utf8_lossy(line));
        out.push('\n');
    }
    out.push_str(&format!("-----END {label}-----\n"));
    out
}

fn unarmor(label: &str, pem: &str) -> Result<Vec<u8>, EtmError> {
    let begin = format!("-----BEGIN {label}-----");
    let end = format!("-----END {label}-----");

    let mut lines = pem.lines().map(str::trim).skip_while(|l| l.is_empty());
    if lines.next() != Some(begin.as_str()) {
        return Err(EtmError::Encoding(format!("missing `{begin}` line")));
    }
    let mut body = String::new();
    for line in lines.by_ref() {
        if line == end {
            return Ok(STANDARD.decode(body)?);
        }
        body.push_str(line);
    }
    Err(EtmError::Encoding(format!("missing `{end}` line")))
}
