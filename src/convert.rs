//! src/convert.rs
//! Key rotation: re-encrypt an envelope under a new master key.
//!
//! Decrypted plaintext flows straight from the decrypting stream into an
//! [`EncryptingWriter`], one chunk at a time, so memory stays bounded by the
//! chunk window regardless of input size.

use crate::decryptor::decrypt_stream_with;
use crate::decryptor::stream::blocking::{release, verify_seekable};
use crate::encryptor::EncryptingWriter;
use crate::error::EtmError;
use crate::file_ops::ensure_distinct;
use crate::options::StreamOptions;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Decrypt `source` with `old_key` and write a fresh envelope (new IV, new
/// subkeys) for `new_key` into `destination`.
///
/// The old envelope is verified in full before the first byte of the new one
/// is written, so if it fails to authenticate `destination` receives nothing.
///
/// ```
/// use etmcrypt_rs::{decrypt, encrypt, rekey_stream};
///
/// let old_key = [1u8; 32];
/// let new_key = [2u8; 32];
/// let sealed = encrypt(b"rotate me", &old_key)?;
///
/// let mut rotated = Vec::new();
/// rekey_stream(&sealed[..], &mut rotated, &old_key, &new_key)?;
/// assert_eq!(decrypt(&rotated, &new_key)?, b"rotate me");
/// # Ok::<(), etmcrypt_rs::EtmError>(())
/// ```
pub fn rekey_stream<R, W>(
    source: R,
    destination: W,
    old_key: &[u8],
    new_key: &[u8],
) -> Result<(), EtmError>
where
    R: Read,
    W: Write,
{
    rekey_stream_with(source, destination, old_key, new_key, &StreamOptions::default())
}

pub fn rekey_stream_with<R, W>(
    source: R,
    destination: W,
    old_key: &[u8],
    new_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: Read,
    W: Write,
{
    let mut writer = EncryptingWriter::new(destination, new_key)?;
    decrypt_stream_with(source, &mut writer, old_key, options)?;
    writer.finish()?;
    debug!("rekey_stream finished");
    Ok(())
}

/// Path form of [`rekey_stream`].
///
/// `src` and `dst` must be different files (`InvalidInput` otherwise). `src` is
/// verified under `old_key` before `dst` is created.
pub fn rekey_file(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    old_key: &[u8],
    new_key: &[u8],
) -> Result<(), EtmError> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    debug!(src = %src.display(), dst = %dst.display(), "rekey_file");

    ensure_distinct(src, dst)?;
    let options = StreamOptions::default();
    let mut input = File::open(src)?;
    verify_seekable(&mut input, old_key, &options)?;

    let mut writer = EncryptingWriter::new(File::create(dst)?, new_key)?;
    release(&mut input, &mut writer, old_key, &options)?;
    writer.finish()?;
    Ok(())
}
