//! # String API
//!
//! UTF-8 text in, printable ciphertext out. Envelopes are binary, so they are
//! always presented as text: standard Base64 when `base64` is `true`, lowercase
//! hex otherwise. The same flag must be used to decrypt.

use crate::error::EtmError;
use crate::{decrypt, encrypt};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encrypt `text` and render the envelope as Base64 (`base64 = true`) or hex.
///
/// ```
/// use etmcrypt_rs::{decrypt_string, encrypt_string};
///
/// let key = [0x11u8; 32];
/// let sealed = encrypt_string("hello world", &key, true)?;
/// assert_eq!(decrypt_string(&sealed, &key, true)?, "hello world");
/// # Ok::<(), etmcrypt_rs::EtmError>(())
/// ```
pub fn encrypt_string(text: &str, master_key: &[u8], base64: bool) -> Result<String, EtmError> {
    let envelope = encrypt(text.as_bytes(), master_key)?;
    Ok(if base64 {
        STANDARD.encode(&envelope)
    } else {
        hex::encode(&envelope)
    })
}

/// Decode a Base64/hex envelope, decrypt it and return the UTF-8 plaintext.
///
/// # Errors
///
/// [`EtmError::Encoding`] if the text is not valid Base64/hex or the decrypted
/// bytes are not UTF-8, plus everything [`decrypt`] can return.
pub fn decrypt_string(text: &str, master_key: &[u8], base64: bool) -> Result<String, EtmError> {
    let trimmed = text.trim();
    let envelope = if base64 {
        STANDARD.decode(trimmed)?
    } else {
        hex::decode(trimmed)?
    };
    let plaintext = decrypt(&envelope, master_key)?;
    Ok(String::from_utf8(plaintext)?)
}
