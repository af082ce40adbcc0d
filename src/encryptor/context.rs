//! src/encryptor/context.rs
//! Incremental Encrypt-then-MAC state: CBC chain, running HMAC and the
//! partial block carried between `update` calls.
//!
//! Output layout produced across the calls is always
//! `IV ‖ CBC(plaintext ‖ PKCS#7) ‖ HMAC-SHA256(IV ‖ ciphertext)`.

use crate::aliases::{Block16, HmacSha256, Iv16};
use crate::consts::BLOCK_LEN;
use crate::crypto::cbc::cbc_encrypt_blocks;
use crate::crypto::kdf::subkeys::SubkeyPair;
use crate::crypto::rng::SecureRandom;
use crate::error::EtmError;
use aes::Aes256Enc;
use hmac::Mac;
use zeroize::Zeroizing;

pub struct EncryptionContext {
    cipher: Aes256Enc,
    hmac: HmacSha256,
    iv: Iv16,
    chain: Block16,
    carry: Zeroizing<Block16>,
    carry_len: usize,
}

impl EncryptionContext {
    /// Derive subkeys from `master_key` and draw a fresh IV from [`SecureRandom`].
    pub fn new(master_key: &[u8]) -> Result<Self, EtmError> {
        let subkeys = SubkeyPair::derive(master_key)?;
        let iv = SecureRandom::global().array::<BLOCK_LEN>()?;
        Self::from_parts(&subkeys, iv)
    }

    /// Fixed-IV construction for known-answer tests. A reused IV under the same
    /// key leaks plaintext equality.
    #[cfg(test)]
    pub(crate) fn with_iv(master_key: &[u8], iv: Iv16) -> Result<Self, EtmError> {
        let subkeys = SubkeyPair::derive(master_key)?;
        Self::from_parts(&subkeys, iv)
    }

    fn from_parts(subkeys: &SubkeyPair, iv: Iv16) -> Result<Self, EtmError> {
        let mut hmac = subkeys.mac()?;
        hmac.update(&iv);
        Ok(Self {
            cipher: subkeys.encryptor(),
            hmac,
            iv,
            chain: iv,
            carry: Zeroizing::new([0u8; BLOCK_LEN]),
            carry_len: 0,
        })
    }

    /// The IV, which must be written before any ciphertext.
    pub fn iv(&self) -> &Iv16 {
        &self.iv
    }

    /// Encrypt as many whole blocks of `carry ‖ input` as possible and append
    /// them to `out`. The remainder (< 16 bytes) waits for the next call.
    pub fn update(&mut self, mut input: &[u8], out: &mut Vec<u8>) {
        if self.carry_len > 0 {
            let take = (BLOCK_LEN - self.carry_len).min(input.len());
            self.carry[self.carry_len..self.carry_len + take].copy_from_slice(&input[..take]);
            self.carry_len += take;
            input = &input[take..];

            if self.carry_len < BLOCK_LEN {
                return;
            }
            let block = *self.carry;
            self.seal(&block, out);
            self.carry_len = 0;
        }

        let whole = input.len() - input.len() % BLOCK_LEN;
        self.seal(&input[..whole], out);

        let rest = &input[whole..];
        self.carry[..rest.len()].copy_from_slice(rest);
        self.carry_len = rest.len();
    }

    /// Pad the carried bytes, emit the final block and append the tag.
    ///
    /// An empty carry still yields a full block of padding, so zero-length
    /// plaintext encrypts to exactly one block.
    pub fn finalize(mut self, out: &mut Vec<u8>) {
        let pad = (BLOCK_LEN - self.carry_len) as u8;
        let mut last = *self.carry;
        last[self.carry_len..].fill(pad);
        self.seal(&last, out);

        out.extend_from_slice(&self.hmac.finalize().into_bytes());
    }

    fn seal(&mut self, plaintext: &[u8], out: &mut Vec<u8>) {
        if plaintext.is_empty() {
            return;
        }
        let start = out.len();
        out.extend_from_slice(plaintext);
        cbc_encrypt_blocks(&self.cipher, &mut self.chain, &mut out[start..]);
        self.hmac.update(&out[start..]);
    }
}
