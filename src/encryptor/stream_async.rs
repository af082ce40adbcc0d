//! src/encryptor/stream_async.rs
//! Suspend-capable streaming encryption over tokio I/O.
//!
//! Same envelope and chunking as [`encrypt_stream`](super::encrypt_stream); the
//! only await points are the reads and writes.

use crate::consts::{BLOCK_LEN, TAG_LEN};
use crate::encryptor::context::EncryptionContext;
use crate::error::EtmError;
use crate::options::{flush_after_async, StreamOptions};
use crate::utils::read_full_async;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::debug;
use zeroize::Zeroizing;

pub async fn encrypt_stream_async<R, W>(
    source: R,
    destination: W,
    master_key: &[u8],
) -> Result<(), EtmError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    encrypt_stream_async_with(source, destination, master_key, &StreamOptions::default()).await
}

pub async fn encrypt_stream_async_with<R, W>(
    mut source: R,
    mut destination: W,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let outcome = run(&mut source, &mut destination, master_key, options).await;
    flush_after_async(&mut destination, outcome).await
}

async fn run<R, W>(
    source: &mut R,
    destination: &mut W,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut ctx = EncryptionContext::new(master_key)?;
    destination.write_all(ctx.iv()).await?;

    let chunk = options.chunk_size();
    let mut plaintext = Zeroizing::new(vec![0u8; chunk]);
    let mut ciphertext = Vec::with_capacity(chunk + BLOCK_LEN + TAG_LEN);
    let mut processed = 0u64;

    debug!(chunk, "encrypt_stream_async started");
    loop {
        options.check_cancelled()?;

        let n = read_full_async(source, &mut plaintext).await?;
        ciphertext.clear();
        ctx.update(&plaintext[..n], &mut ciphertext);
        destination.write_all(&ciphertext).await?;

        processed += n as u64;
        options.report(processed);

        if n < chunk {
            break;
        }
    }

    ciphertext.clear();
    ctx.finalize(&mut ciphertext);
    destination.write_all(&ciphertext).await?;

    debug!(bytes = processed, "encrypt_stream_async finished");
    Ok(())
}
