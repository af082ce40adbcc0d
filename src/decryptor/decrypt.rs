//! src/decryptor/decrypt.rs
//! In-memory envelope decryption: verify the tag first, decrypt second.

use crate::consts::{BLOCK_LEN, IV_LEN, MIN_ENVELOPE_LEN, TAG_LEN};
use crate::crypto::cbc::cbc_decrypt_blocks;
use crate::crypto::kdf::subkeys::SubkeyPair;
use crate::decryptor::stream::trailer::{check_block_alignment, strip_pkcs7, verify_tag};
use crate::error::EtmError;
use hmac::Mac;
use zeroize::Zeroizing;

/// Decrypt an `IV ‖ ciphertext ‖ tag` envelope produced by [`encrypt`](crate::encrypt).
///
/// The tag is checked in constant time over the whole envelope before any
/// block is decrypted; on failure no plaintext exists anywhere.
///
/// # Errors
///
/// - [`EtmError::MalformedEnvelope`] if the input is shorter than 48 bytes
/// - [`EtmError::InvalidKey`] if the key is empty or not 32 bytes
/// - [`EtmError::AuthenticationFailed`] on any tag mismatch (wrong key, tampering, truncation)
/// - [`EtmError::IncompleteDecryption`] if authenticated ciphertext is not whole,
///   correctly padded blocks
pub fn decrypt(envelope: &[u8], master_key: &[u8]) -> Result<Vec<u8>, EtmError> {
    if envelope.len() < MIN_ENVELOPE_LEN {
        return Err(EtmError::MalformedEnvelope {
            len: envelope.len(),
            min: MIN_ENVELOPE_LEN,
        });
    }

    let (iv, rest) = envelope.split_at(IV_LEN);
    let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);

    let subkeys = SubkeyPair::derive(master_key)?;
    let mut hmac = subkeys.mac()?;
    hmac.update(iv);
    hmac.update(ciphertext);
    verify_tag(hmac, tag)?;

    check_block_alignment(ciphertext.len() as u64)?;

    let mut chain = [0u8; IV_LEN];
    chain.copy_from_slice(iv);
    let mut plaintext = Zeroizing::new(ciphertext.to_vec());
    cbc_decrypt_blocks(&subkeys.decryptor(), &mut chain, &mut plaintext);

    let last_start = plaintext.len() - BLOCK_LEN;
    let mut last = [0u8; BLOCK_LEN];
    last.copy_from_slice(&plaintext[last_start..]);
    let keep = strip_pkcs7(&last)?;

    plaintext.truncate(last_start + keep);
    Ok(std::mem::take(&mut *plaintext))
}
