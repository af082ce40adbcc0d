//! # File API
//!
//! Path-based wrappers around the stream adapter. Every function returns the
//! real failure cause instead of a success flag, so "file not found" and
//! "tampered ciphertext" stay distinguishable.
//!
//! `src` and `dst` must name different files; the same file under any path
//! (symlink, hard link) is rejected with [`ErrorKind::InvalidInput`] before
//! anything is opened for writing. Decryption verifies the whole source before
//! `dst` is created, so a rejected envelope leaves `dst` untouched. When an
//! operation fails after `dst` was created, whatever was written so far is
//! flushed and left on disk; deleting it is up to the caller.

use crate::decryptor::stream::blocking::{release, verify_seekable};
use crate::decryptor::stream::nonblocking::{release_async, verify_seekable_async};
use crate::encryptor::{encrypt_stream_async_with, encrypt_stream_with};
use crate::error::EtmError;
use crate::options::{flush_after, flush_after_async, StreamOptions};
use std::fs::{File, Metadata};
use std::io::{self, ErrorKind};
use std::path::Path;
use tracing::debug;

/// Encrypt the file at `src` into a new envelope file at `dst`.
pub fn encrypt_file(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    master_key: &[u8],
) -> Result<(), EtmError> {
    encrypt_file_with(src, dst, master_key, &StreamOptions::default())
}

pub fn encrypt_file_with(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    debug!(src = %src.display(), dst = %dst.display(), "encrypt_file");

    ensure_distinct(src, dst)?;
    let input = File::open(src)?;
    let output = File::create(dst)?;
    encrypt_stream_with(input, output, master_key, options)
}

/// Decrypt the envelope file at `src` into `dst`.
pub fn decrypt_file(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    master_key: &[u8],
) -> Result<(), EtmError> {
    decrypt_file_with(src, dst, master_key, &StreamOptions::default())
}

pub fn decrypt_file_with(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    debug!(src = %src.display(), dst = %dst.display(), "decrypt_file");

    ensure_distinct(src, dst)?;
    let mut input = File::open(src)?;
    verify_seekable(&mut input, master_key, options)?;

    let mut output = File::create(dst)?;
    let outcome = release(&mut input, &mut output, master_key, options);
    flush_after(&mut output, outcome)
}

pub async fn encrypt_file_async(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    master_key: &[u8],
) -> Result<(), EtmError> {
    encrypt_file_async_with(src, dst, master_key, &StreamOptions::default()).await
}

pub async fn encrypt_file_async_with(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    debug!(src = %src.display(), dst = %dst.display(), "encrypt_file_async");

    ensure_distinct_async(src, dst).await?;
    let input = tokio::fs::File::open(src).await?;
    let output = tokio::fs::File::create(dst).await?;
    encrypt_stream_async_with(input, output, master_key, options).await
}

pub async fn decrypt_file_async(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    master_key: &[u8],
) -> Result<(), EtmError> {
    decrypt_file_async_with(src, dst, master_key, &StreamOptions::default()).await
}

pub async fn decrypt_file_async_with(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    debug!(src = %src.display(), dst = %dst.display(), "decrypt_file_async");

    ensure_distinct_async(src, dst).await?;
    let mut input = tokio::fs::File::open(src).await?;
    verify_seekable_async(&mut input, master_key, options).await?;

    let mut output = tokio::fs::File::create(dst).await?;
    let outcome = release_async(&mut input, &mut output, master_key, options).await;
    flush_after_async(&mut output, outcome).await
}

/// Fail with `InvalidInput` when `dst` already exists and is the same file as
/// `src`. A missing `dst` always passes; a missing `src` surfaces as `NotFound`
/// from the later open.
pub(crate) fn ensure_distinct(src: &Path, dst: &Path) -> Result<(), EtmError> {
    let dst_meta = match std::fs::metadata(dst) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    let src_meta = match std::fs::metadata(src) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    if same_file(src, dst, &src_meta, &dst_meta)? {
        return Err(same_file_error(src));
    }
    Ok(())
}

async fn ensure_distinct_async(src: &Path, dst: &Path) -> Result<(), EtmError> {
    let dst_meta = match tokio::fs::metadata(dst).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    let src_meta = match tokio::fs::metadata(src).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    if same_file(src, dst, &src_meta, &dst_meta)? {
        return Err(same_file_error(src));
    }
    Ok(())
}

#[cfg(unix)]
fn same_file(_src: &Path, _dst: &Path, a: &Metadata, b: &Metadata) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;
    Ok(a.dev() == b.dev() && a.ino() == b.ino())
}

#[cfg(not(unix))]
fn same_file(src: &Path, dst: &Path, _a: &Metadata, _b: &Metadata) -> io::Result<bool> {
    Ok(std::fs::canonicalize(src)? == std::fs::canonicalize(dst)?)
}

fn same_file_error(src: &Path) -> EtmError {
    EtmError::Io(io::Error::new(
        ErrorKind::InvalidInput,
        format!("source and destination are the same file: {}", src.display()),
    ))
}
