//! src/generator.rs
//! Files filled with random bytes from the process-wide source.

use crate::crypto::rng::SecureRandom;
use crate::error::EtmError;
use crate::options::{flush_after, flush_after_async, StreamOptions};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;
use zeroize::Zeroizing;

/// Target size of a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSize {
    Kilobytes(u64),
    Megabytes(u64),
    Gigabytes(u64),
}

impl FileSize {
    /// Size in bytes, saturating on overflow.
    pub const fn bytes(self) -> u64 {
        match self {
            Self::Kilobytes(n) => n.saturating_mul(1 << 10),
            Self::Megabytes(n) => n.saturating_mul(1 << 20),
            Self::Gigabytes(n) => n.saturating_mul(1 << 30),
        }
    }
}

/// Create `path` and fill it with `size` bytes from [`SecureRandom`].
///
/// The file must not already exist; an existing path fails with
/// [`EtmError::Io`] of kind `AlreadyExists` and is left untouched. Returns the
/// number of bytes written. On cancellation or error the partial file is
/// flushed and kept.
pub fn generate_random_file(
    path: impl AsRef<Path>,
    size: FileSize,
    options: &StreamOptions,
) -> Result<u64, EtmError> {
    let path = path.as_ref();
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    debug!(path = %path.display(), bytes = size.bytes(), "generate_random_file");

    let outcome = fill_sync(&mut file, size.bytes(), options);
    flush_after(&mut file, outcome)
}

fn fill_sync<W: Write>(out: &mut W, total: u64, options: &StreamOptions) -> Result<u64, EtmError> {
    let mut buf = Zeroizing::new(vec![0u8; options.chunk_size()]);
    let mut written = 0u64;
    while written < total {
        options.check_cancelled()?;
        let n = next_len(total - written, buf.len());
        SecureRandom::global().fill(&mut buf[..n])?;
        out.write_all(&buf[..n])?;
        written += n as u64;
        options.report(written);
    }
    Ok(written)
}

/// Async counterpart of [`generate_random_file`].
pub async fn generate_random_file_async(
    path: impl AsRef<Path>,
    size: FileSize,
    options: &StreamOptions,
) -> Result<u64, EtmError> {
    let path = path.as_ref();
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    debug!(path = %path.display(), bytes = size.bytes(), "generate_random_file_async");

    let outcome = fill_async(&mut file, size.bytes(), options).await;
    flush_after_async(&mut file, outcome).await
}

async fn fill_async<W>(out: &mut W, total: u64, options: &StreamOptions) -> Result<u64, EtmError>
where
    W: AsyncWrite + Unpin,
{
    let mut buf = Zeroizing::new(vec![0u8; options.chunk_size()]);
    let mut written = 0u64;
    while written < total {
        options.check_cancelled()?;
        let n = next_len(total - written, buf.len());
        SecureRandom::global().fill(&mut buf[..n])?;
        out.write_all(&buf[..n]).await?;
        written += n as u64;
        options.report(written);
    }
    Ok(written)
}

fn next_len(remaining: u64, chunk: usize) -> usize {
    usize::try_from(remaining).map_or(chunk, |r| r.min(chunk))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_in_bytes() {
        assert_eq!(FileSize::Kilobytes(3).bytes(), 3 * 1024);
        assert_eq!(FileSize::Megabytes(2).bytes(), 2 * 1024 * 1024);
        assert_eq!(FileSize::Gigabytes(1).bytes(), 1 << 30);
        assert_eq!(FileSize::Gigabytes(u64::MAX).bytes(), u64::MAX);
    }

    #[test]
    fn last_chunk_is_short() {
        assert_eq!(next_len(100, 64), 64);
        assert_eq!(next_len(10, 64), 10);
    }

    #[test]
    fn fills_exact_length() {
        let mut sink = Vec::new();
        let written = fill_sync(&mut sink, 70_000, &StreamOptions::new()).unwrap();
        assert_eq!(written, 70_000);
        assert_eq!(sink.len(), 70_000);
        assert!(sink.iter().any(|&b| b != 0));
    }
}
