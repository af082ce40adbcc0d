//! src/decryptor/stream/context.rs
//! Incremental decryption with a trailing window.
//!
//! Ciphertext is fed in arbitrary pieces. Everything except the last
//! [`TRAILING_WINDOW_LEN`] bytes (candidate tag + final padded block) is
//! authenticated into the running HMAC and decrypted as soon as it arrives.
//! The window is only opened in [`finish`](DecryptionContext::finish), after
//! the tag has been verified, so a truncated stream can never end cleanly.
//!
//! Blocks released by [`update`](DecryptionContext::update) are not yet
//! authenticated. The stream functions only drive this context over an
//! envelope the verifier has already accepted; direct callers must do the same
//! or hold the output until `finish` succeeds.

use crate::aliases::{Block16, HmacSha256, Iv16};
use crate::consts::{BLOCK_LEN, IV_LEN, TAG_LEN, TRAILING_WINDOW_LEN};
use crate::crypto::cbc::cbc_decrypt_blocks;
use crate::crypto::kdf::subkeys::SubkeyPair;
use crate::decryptor::stream::trailer::{check_block_alignment, strip_pkcs7, verify_tag};
use crate::error::EtmError;
use aes::Aes256Dec;
use hmac::Mac;
use zeroize::Zeroizing;

pub struct DecryptionContext {
    cipher: Aes256Dec,
    hmac: HmacSha256,
    chain: Block16,
    pending: Vec<u8>,
    released: u64,
}

impl DecryptionContext {
    /// Derive subkeys from `master_key` and start authenticating at `iv`.
    pub fn new(master_key: &[u8], iv: &Iv16) -> Result<Self, EtmError> {
        let subkeys = SubkeyPair::derive(master_key)?;
        let mut hmac = subkeys.mac()?;
        hmac.update(iv);
        Ok(Self {
            cipher: subkeys.decryptor(),
            hmac,
            chain: *iv,
            pending: Vec::new(),
            released: 0,
        })
    }

    /// Bytes of ciphertext currently held back.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Plaintext bytes released so far (excluding the final block).
    pub fn released(&self) -> u64 {
        self.released
    }

    /// Feed ciphertext; append whatever plaintext may leave the window to `out`.
    pub fn update(&mut self, input: &[u8], out: &mut Vec<u8>) {
        self.pending.extend_from_slice(input);
        if self.pending.len() <= TRAILING_WINDOW_LEN {
            return;
        }

        let excess = self.pending.len() - TRAILING_WINDOW_LEN;
        let ready = excess - excess % BLOCK_LEN;
        if ready == 0 {
            return;
        }

        self.hmac.update(&self.pending[..ready]);
        let start = out.len();
        out.extend_from_slice(&self.pending[..ready]);
        cbc_decrypt_blocks(&self.cipher, &mut self.chain, &mut out[start..]);
        self.pending.drain(..ready);
        self.released += ready as u64;
    }

    /// End of stream: verify the tag, then release the final block without
    /// its padding.
    pub fn finish(mut self, out: &mut Vec<u8>) -> Result<(), EtmError> {
        if self.pending.len() < TAG_LEN {
            // Nothing is ever released while the window is this small, so the
            // whole envelope is IV ‖ pending.
            return Err(EtmError::MalformedEnvelope {
                len: IV_LEN + self.pending.len(),
                min: IV_LEN + TAG_LEN,
            });
        }

        let split = self.pending.len() - TAG_LEN;
        let (ciphertext, tag) = self.pending.split_at(split);
        self.hmac.update(ciphertext);
        verify_tag(self.hmac, tag)?;

        // Whatever was released earlier was whole blocks and left at least one
        // block behind, so the window alone decides alignment.
        check_block_alignment(ciphertext.len() as u64)?;

        let mut tail = Zeroizing::new(ciphertext.to_vec());
        cbc_decrypt_blocks(&self.cipher, &mut self.chain, &mut tail);

        let last_start = tail.len() - BLOCK_LEN;
        let mut last = [0u8; BLOCK_LEN];
        last.copy_from_slice(&tail[last_start..]);
        let keep = strip_pkcs7(&last)?;

        out.extend_from_slice(&tail[..last_start + keep]);
        Ok(())
    }
}
