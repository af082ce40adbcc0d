//! src/decryptor/stream/nonblocking.rs
//! Suspend-capable streaming decryption over tokio I/O.

use crate::consts::{BLOCK_LEN, TRAILING_WINDOW_LEN};
use crate::decryptor::read::read_iv_async;
use crate::decryptor::stream::context::DecryptionContext;
use crate::decryptor::stream::verifier::EnvelopeVerifier;
use crate::error::EtmError;
use crate::options::{flush_after_async, StreamOptions};
use crate::utils::read_full_async;
use std::io::SeekFrom;
use tokio::io::{AsyncRead, AsyncSeek, AsyncSeekExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;
use zeroize::Zeroizing;

pub async fn decrypt_stream_async<R, W>(
    source: R,
    destination: W,
    master_key: &[u8],
) -> Result<(), EtmError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    decrypt_stream_async_with(source, destination, master_key, &StreamOptions::default()).await
}

/// Async counterpart of [`decrypt_stream_with`](super::decrypt_stream_with):
/// the ciphertext is spooled and verified before any plaintext is written.
pub async fn decrypt_stream_async_with<R, W>(
    mut source: R,
    mut destination: W,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let outcome = spool_and_release(&mut source, &mut destination, master_key, options).await;
    flush_after_async(&mut destination, outcome).await
}

pub async fn decrypt_seekable_async<R, W>(
    source: R,
    destination: W,
    master_key: &[u8],
) -> Result<(), EtmError>
where
    R: AsyncRead + AsyncSeek + Unpin,
    W: AsyncWrite + Unpin,
{
    decrypt_seekable_async_with(source, destination, master_key, &StreamOptions::default()).await
}

/// Async counterpart of [`decrypt_seekable_with`](super::decrypt_seekable_with).
pub async fn decrypt_seekable_async_with<R, W>(
    mut source: R,
    mut destination: W,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: AsyncRead + AsyncSeek + Unpin,
    W: AsyncWrite + Unpin,
{
    let outcome = match verify_seekable_async(&mut source, master_key, options).await {
        Ok(()) => release_async(&mut source, &mut destination, master_key, options).await,
        Err(e) => Err(e),
    };
    flush_after_async(&mut destination, outcome).await
}

async fn spool_and_release<R, W>(
    source: &mut R,
    destination: &mut W,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut spool = tokio::fs::File::from_std(tempfile::tempfile()?);
    verify_async(source, &mut spool, master_key, options).await?;
    spool.flush().await?;
    spool.seek(SeekFrom::Start(0)).await?;
    release_async(&mut spool, destination, master_key, options).await
}

pub(crate) async fn verify_seekable_async<R>(
    source: &mut R,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    let start = source.stream_position().await?;
    verify_async(source, &mut tokio::io::sink(), master_key, options).await?;
    source.seek(SeekFrom::Start(start)).await?;
    Ok(())
}

async fn verify_async<R, S>(
    source: &mut R,
    copy: &mut S,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: AsyncRead + Unpin,
    S: AsyncWrite + Unpin,
{
    let iv = read_iv_async(source).await?;
    let mut verifier = EnvelopeVerifier::new(master_key, &iv)?;
    copy.write_all(&iv).await?;

    let chunk = options.chunk_size();
    let mut ciphertext = vec![0u8; chunk];
    loop {
        options.check_cancelled()?;

        let n = read_full_async(source, &mut ciphertext).await?;
        verifier.update(&ciphertext[..n]);
        copy.write_all(&ciphertext[..n]).await?;

        if n < chunk {
            break;
        }
    }

    verifier.finish()?;
    debug!("envelope verified");
    Ok(())
}

pub(crate) async fn release_async<R, W>(
    source: &mut R,
    destination: &mut W,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let iv = read_iv_async(source).await?;
    let mut ctx = DecryptionContext::new(master_key, &iv)?;

    let chunk = options.chunk_size();
    let mut ciphertext = vec![0u8; chunk];
    let mut plaintext = Zeroizing::new(Vec::with_capacity(chunk + TRAILING_WINDOW_LEN + BLOCK_LEN));
    let mut processed = 0u64;

    debug!(chunk, "decrypt_stream_async started");
    loop {
        options.check_cancelled()?;

        let n = read_full_async(source, &mut ciphertext).await?;
        plaintext.clear();
        ctx.update(&ciphertext[..n], &mut plaintext);
        destination.write_all(&plaintext).await?;

        processed += n as u64;
        options.report(processed);

        if n < chunk {
            break;
        }
    }

    let released = ctx.released();
    plaintext.clear();
    ctx.finish(&mut plaintext)?;
    destination.write_all(&plaintext).await?;

    debug!(bytes = released + plaintext.len() as u64, "decrypt_stream_async finished");
    Ok(())
}
