//! src/decryptor/stream/trailer.rs
//! Trailer processing: tag verification and final-block padding removal.
//! Shared by the in-memory and streaming decryptors.

use crate::aliases::{Block16, HmacSha256};
use crate::consts::BLOCK_LEN;
use crate::error::EtmError;
use hmac::Mac;
use subtle::ConstantTimeEq;
use tracing::warn;

/// Finish `hmac` and compare against the received tag in constant time.
#[inline]
pub fn verify_tag(hmac: HmacSha256, received: &[u8]) -> Result<(), EtmError> {
    hmac.verify_slice(received).map_err(|_| {
        warn!("envelope tag mismatch");
        EtmError::AuthenticationFailed
    })
}

/// Check the authenticated ciphertext covers at least one whole block and
/// nothing but whole blocks.
#[inline]
pub fn check_block_alignment(ciphertext_len: u64) -> Result<(), EtmError> {
    if ciphertext_len == 0 {
        return Err(EtmError::IncompleteDecryption(
            "no ciphertext blocks before the tag".into(),
        ));
    }
    let trailing = ciphertext_len % BLOCK_LEN as u64;
    if trailing != 0 {
        return Err(EtmError::IncompleteDecryption(format!(
            "ciphertext ends mid-block ({trailing} trailing bytes)"
        )));
    }
    Ok(())
}

/// Validate PKCS#7 padding on the final decrypted block and return how many
/// of its bytes are plaintext.
#[inline]
pub fn strip_pkcs7(block: &Block16) -> Result<usize, EtmError> {
    let padding = block[BLOCK_LEN - 1];

    if padding == 0 || padding as usize > BLOCK_LEN {
        return Err(EtmError::IncompleteDecryption(
            "final block padding not consumed".into(),
        ));
    }

    let padding_start = BLOCK_LEN - padding as usize;
    let expected = [padding; BLOCK_LEN];
    if !bool::from(block[padding_start..].ct_eq(&expected[padding_start..])) {
        return Err(EtmError::IncompleteDecryption(
            "final block padding not consumed".into(),
        ));
    }

    Ok(padding_start)
}
