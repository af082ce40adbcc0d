//! src/decryptor/stream/verifier.rs
//! First pass of streaming decryption: check a whole envelope without
//! producing plaintext.
//!
//! The verifier runs every check the release pass would (length, tag, block
//! alignment, final-block padding) in bounded memory. Only the last cipher
//! block is ever decrypted, and it is wiped before returning, so a failing
//! envelope yields an error and nothing else.

use crate::aliases::{Block16, HmacSha256, Iv16};
use crate::consts::{BLOCK_LEN, IV_LEN, MIN_ENVELOPE_LEN, TAG_LEN, TRAILING_WINDOW_LEN};
use crate::crypto::cbc::cbc_decrypt_blocks;
use crate::crypto::kdf::subkeys::SubkeyPair;
use crate::decryptor::stream::trailer::{check_block_alignment, strip_pkcs7, verify_tag};
use crate::error::EtmError;
use aes::Aes256Dec;
use hmac::Mac;
use zeroize::Zeroizing;

pub struct EnvelopeVerifier {
    cipher: Aes256Dec,
    hmac: HmacSha256,
    /// Last ciphertext block already folded into `hmac` (the IV before any).
    previous: Block16,
    pending: Vec<u8>,
    authenticated: u64,
}

impl EnvelopeVerifier {
    pub fn new(master_key: &[u8], iv: &Iv16) -> Result<Self, EtmError> {
        let subkeys = SubkeyPair::derive(master_key)?;
        let mut hmac = subkeys.mac()?;
        hmac.update(iv);
        Ok(Self {
            cipher: subkeys.decryptor(),
            hmac,
            previous: *iv,
            pending: Vec::new(),
            authenticated: 0,
        })
    }

    /// Feed ciphertext; whole blocks outside the trailing window go into the MAC.
    pub fn update(&mut self, input: &[u8]) {
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
        self.previous.copy_from_slice(&self.pending[ready - BLOCK_LEN..ready]);
        self.pending.drain(..ready);
        self.authenticated += ready as u64;
    }

    /// End of stream: succeed only if the envelope would decrypt cleanly.
    pub fn finish(mut self) -> Result<(), EtmError> {
        if self.pending.len() < TAG_LEN {
            return Err(EtmError::MalformedEnvelope {
                len: IV_LEN + self.pending.len(),
                min: MIN_ENVELOPE_LEN,
            });
        }

        let split = self.pending.len() - TAG_LEN;
        let (ciphertext, tag) = self.pending.split_at(split);
        self.hmac.update(ciphertext);
        verify_tag(self.hmac, tag)?;
        check_block_alignment(self.authenticated + ciphertext.len() as u64)?;

        // Blocks only leave the window while 48 bytes stay behind, so the final
        // block is always still pending here.
        let last_start = ciphertext.len() - BLOCK_LEN;
        let mut chain = if last_start >= BLOCK_LEN {
            let mut block = [0u8; BLOCK_LEN];
            block.copy_from_slice(&ciphertext[last_start - BLOCK_LEN..last_start]);
            block
        } else {
            self.previous
        };
        let mut last = Zeroizing::new([0u8; BLOCK_LEN]);
        last.copy_from_slice(&ciphertext[last_start..]);
        cbc_decrypt_blocks(&self.cipher, &mut chain, &mut last[..]);
        strip_pkcs7(&last)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encryptor::encrypt::encrypt_with_iv;

    fn check(envelope: &[u8], key: &[u8], piece: usize) -> Result<(), EtmError> {
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&envelope[..IV_LEN]);
        let mut verifier = EnvelopeVerifier::new(key, &iv)?;
        for chunk in envelope[IV_LEN..].chunks(piece) {
            verifier.update(chunk);
            assert!(verifier.pending.len() < TRAILING_WINDOW_LEN + BLOCK_LEN);
        }
        verifier.finish()
    }

    #[test]
    fn accepts_valid_envelopes_at_any_piece_size() {
        let key = [3u8; 32];
        for len in [0usize, 1, 15, 16, 17, 47, 48, 100, 1000] {
            let envelope = encrypt_with_iv(&vec![0x5A; len], &key, [9u8; 16]).unwrap();
            for piece in [1, 7, 16, 48, 4096] {
                assert!(check(&envelope, &key, piece).is_ok(), "len {len}, piece {piece}");
            }
        }
    }

    #[test]
    fn rejects_any_flipped_bit_in_block_aligned_plaintext() {
        let key = [3u8; 32];
        let envelope = encrypt_with_iv(&[0u8; 160], &key, [9u8; 16]).unwrap();
        for pos in [0, 16, 100, envelope.len() - 33, envelope.len() - 1] {
            let mut tampered = envelope.clone();
            tampered[pos] ^= 0x01;
            assert!(
                matches!(check(&tampered, &key, 64), Err(EtmError::AuthenticationFailed)),
                "pos {pos}"
            );
        }
    }

    #[test]
    fn short_stream_is_malformed() {
        let key = [3u8; 32];
        let envelope = encrypt_with_iv(b"abc", &key, [9u8; 16]).unwrap();
        assert!(matches!(
            check(&envelope[..40], &key, 8),
            Err(EtmError::MalformedEnvelope { len: 40, min: 48 })
        ));
    }
}
