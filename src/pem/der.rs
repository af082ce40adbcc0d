//! src/pem/der.rs
//! The handful of DER pieces RSA key export needs: lengths, unsigned
//! INTEGERs, constructed TLVs, and a forward-only reader for import.

use crate::error::EtmError;

pub(crate) const TAG_INTEGER: u8 = 0x02;
pub(crate) const TAG_BIT_STRING: u8 = 0x03;
pub(crate) const TAG_NULL: u8 = 0x05;
pub(crate) const TAG_OID: u8 = 0x06;
pub(crate) const TAG_SEQUENCE: u8 = 0x30;

/// 1.2.840.113549.1.1.1 (rsaEncryption)
pub(crate) const RSA_ENCRYPTION_OID: [u8; 9] = [0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01];

/// Short form below 0x80, otherwise `0x80 | n` followed by `n` big-endian bytes.
pub fn encode_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}

/// Unsigned big-endian magnitude as a DER INTEGER.
///
/// Leading zero bytes are stripped, zero (or empty input) becomes a single
/// `0x00`, and a `0x00` is prepended when the top bit is set so the value
/// stays non-negative.
pub fn encode_integer(out: &mut Vec<u8>, magnitude: &[u8]) {
    out.push(TAG_INTEGER);
    let start = magnitude.iter().position(|&b| b != 0);
    match start {
        None => {
            encode_length(out, 1);
            out.push(0);
        }
        Some(i) => {
            let digits = &magnitude[i..];
            if digits[0] & 0x80 != 0 {
                encode_length(out, digits.len() + 1);
                out.push(0);
            } else {
                encode_length(out, digits.len());
            }
            out.extend_from_slice(digits);
        }
    }
}

pub(crate) fn encode_tlv(out: &mut Vec<u8>, tag: u8, content: &[u8]) {
    out.push(tag);
    encode_length(out, content.len());
    out.extend_from_slice(content);
}

/// Forward-only DER reader over a borrowed buffer.
pub(crate) struct DerReader<'a> {
    rest: &'a [u8],
}

impl<'a> DerReader<'a> {
    pub(crate) const fn new(input: &'a [u8]) -> Self {
        Self { rest: input }
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    fn byte(&mut self) -> Result<u8, EtmError> {
        let (&b, rest) = self
            .rest
            .split_first()
            .ok_or_else(|| EtmError::Encoding("truncated DER".into()))?;
        self.rest = rest;
        Ok(b)
    }

    fn length(&mut self) -> Result<usize, EtmError> {
        let first = self.byte()?;
        if first & 0x80 == 0 {
            return Ok(first.into());
        }
        let count = usize::from(first & 0x7f);
        if count == 0 || count > std::mem::size_of::<usize>() {
            return Err(EtmError::Encoding(format!("unsupported DER length form 0x{first:02x}")));
        }
        let mut len = 0usize;
        for _ in 0..count {
            len = (len << 8) | usize::from(self.byte()?);
        }
        Ok(len)
    }

    /// Read one element, which must carry `tag`, and return its content.
    pub(crate) fn read(&mut self, tag: u8) -> Result<&'a [u8], EtmError> {
        let found = self.byte()?;
        if found != tag {
            return Err(EtmError::Encoding(format!(
                "expected DER tag 0x{tag:02x}, found 0x{found:02x}"
            )));
        }
        let len = self.length()?;
        if len > self.rest.len() {
            return Err(EtmError::Encoding("DER length exceeds input".into()));
        }
        let (content, rest) = self.rest.split_at(len);
        self.rest = rest;
        Ok(content)
    }

    /// Read an INTEGER and return its magnitude without the sign pad byte.
    pub(crate) fn read_unsigned(&mut self) -> Result<Vec<u8>, EtmError> {
        let content = self.read(TAG_INTEGER)?;
        match content {
            [] => Err(EtmError::Encoding("empty DER INTEGER".into())),
            [0, rest @ ..] if !rest.is_empty() => Ok(rest.to_vec()),
            _ => Ok(content.to_vec()),
        }
    }
}
