//! src/encryptor/encrypt.rs
//! In-memory envelope encryption.

use crate::consts::{BLOCK_LEN, IV_LEN, TAG_LEN};
use crate::encryptor::context::EncryptionContext;
use crate::error::EtmError;

/// Encrypt `plaintext` under the 32-byte `master_key`.
///
/// Returns `IV(16) ‖ ciphertext ‖ tag(32)` with a fresh random IV, so encrypting
/// the same input twice never yields the same envelope.
///
/// # Errors
///
/// - [`EtmError::InvalidKey`] if the key is empty or not 32 bytes
/// - [`EtmError::Entropy`] if the OS random source fails
///
/// # Example
///
/// ```
/// use etmcrypt_rs::{decrypt, encrypt};
///
/// let key = [0x11u8; 32];
/// let envelope = encrypt(b"hello world", &key)?;
/// assert_eq!(envelope.len(), 64);
/// assert_eq!(decrypt(&envelope, &key)?, b"hello world");
/// # Ok::<(), etmcrypt_rs::EtmError>(())
/// ```
pub fn encrypt(plaintext: &[u8], master_key: &[u8]) -> Result<Vec<u8>, EtmError> {
    seal(EncryptionContext::new(master_key)?, plaintext)
}

/// Deterministic variant with a caller-chosen IV, for known-answer tests.
#[cfg(test)]
pub(crate) fn encrypt_with_iv(
    plaintext: &[u8],
    master_key: &[u8],
    iv: crate::aliases::Iv16,
) -> Result<Vec<u8>, EtmError> {
    seal(EncryptionContext::with_iv(master_key, iv)?, plaintext)
}

fn seal(mut ctx: EncryptionContext, plaintext: &[u8]) -> Result<Vec<u8>, EtmError> {
    let padded = plaintext.len() + BLOCK_LEN - plaintext.len() % BLOCK_LEN;
    let mut out = Vec::with_capacity(IV_LEN + padded + TAG_LEN);
    out.extend_from_slice(ctx.iv());
    ctx.update(plaintext, &mut out);
    ctx.finalize(&mut out);
    debug_assert_eq!(out.len(), IV_LEN + padded + TAG_LEN);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decrypt;

    #[test]
    fn fixed_iv_is_deterministic() {
        let key = [0x03u8; 32];
        let iv = [0x02u8; 16];
        let a = encrypt_with_iv(b"hello", &key, iv).unwrap();
        let b = encrypt_with_iv(b"hello", &key, iv).unwrap();
        assert_eq!(a, b);
        assert_eq!(&a[..16], &iv);
        assert_eq!(decrypt(&a, &key).unwrap(), b"hello");
    }

    #[test]
    fn fixed_iv_changes_with_key() {
        let iv = [0u8; 16];
        let a = encrypt_with_iv(b"hello", &[1u8; 32], iv).unwrap();
        let b = encrypt_with_iv(b"hello", &[2u8; 32], iv).unwrap();
        assert_ne!(a[16..], b[16..]);
    }
}
