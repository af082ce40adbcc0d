//! src/crypto/cbc.rs
//! AES-256-CBC chaining over whole blocks, in place.
//!
//! The chain value carries across calls, so a stream can be processed in any
//! number of block-aligned pieces and produce the same bytes as one big call.

use crate::aliases::Block16;
use crate::consts::BLOCK_LEN;
use crate::utils::xor_blocks;
use aes::cipher::{BlockDecrypt, BlockEncrypt};
use aes::{Aes256Dec, Aes256Enc, Block as AesBlock};

/// Encrypt `data` in place. `chain` starts as the IV and ends as the last
/// ciphertext block.
///
/// `data.len()` must be a multiple of [`BLOCK_LEN`]; a trailing partial block
/// is left untouched.
#[inline]
pub fn cbc_encrypt_blocks(cipher: &Aes256Enc, chain: &mut Block16, data: &mut [u8]) {
    debug_assert_eq!(data.len() % BLOCK_LEN, 0);
    for chunk in data.chunks_exact_mut(BLOCK_LEN) {
        let mut block = AesBlock::default();
        xor_blocks(chunk, &chain[..], &mut block);
        cipher.encrypt_block(&mut block);
        chunk.copy_from_slice(&block);
        chain.copy_from_slice(&block);
    }
}

/// Decrypt `data` in place. Mirror of [`cbc_encrypt_blocks`].
#[inline]
pub fn cbc_decrypt_blocks(cipher: &Aes256Dec, chain: &mut Block16, data: &mut [u8]) {
    debug_assert_eq!(data.len() % BLOCK_LEN, 0);
    for chunk in data.chunks_exact_mut(BLOCK_LEN) {
        let mut ciphertext = [0u8; BLOCK_LEN];
        ciphertext.copy_from_slice(chunk);

        let mut block = AesBlock::from(ciphertext);
        cipher.decrypt_block(&mut block);
        xor_blocks(&block, &chain[..], chunk);

        *chain = ciphertext;
    }
}
