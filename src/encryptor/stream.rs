//! src/encryptor/stream.rs
//! Bounded-memory streaming encryption over `std::io`.

use crate::consts::{BLOCK_LEN, TAG_LEN};
use crate::encryptor::context::EncryptionContext;
use crate::error::EtmError;
use crate::options::{flush_after, StreamOptions};
use crate::utils::read_full;
use std::io::{Read, Write};
use tracing::debug;
use zeroize::Zeroizing;

/// Encrypt everything `source` yields into `destination` with default [`StreamOptions`].
pub fn encrypt_stream<R, W>(source: R, destination: W, master_key: &[u8]) -> Result<(), EtmError>
where
    R: Read,
    W: Write,
{
    encrypt_stream_with(source, destination, master_key, &StreamOptions::default())
}

/// Encrypt `source` into `destination` one chunk at a time.
///
/// One IV is drawn for the whole stream and written first; the tag follows the
/// last ciphertext block. Memory use is a couple of chunk buffers regardless of
/// input size.
///
/// `destination` is flushed on every exit path. On failure whatever was already
/// written stays there; cleaning it up is the caller's call.
pub fn encrypt_stream_with<R, W>(
    mut source: R,
    mut destination: W,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: Read,
    W: Write,
{
    let outcome = run(&mut source, &mut destination, master_key, options);
    flush_after(&mut destination, outcome)
}

fn run<R, W>(
    source: &mut R,
    destination: &mut W,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: Read,
    W: Write,
{
    let mut ctx = EncryptionContext::new(master_key)?;
    destination.write_all(ctx.iv())?;

    let chunk = options.chunk_size();
    let mut plaintext = Zeroizing::new(vec![0u8; chunk]);
    let mut ciphertext = Vec::with_capacity(chunk + BLOCK_LEN + TAG_LEN);
    let mut processed = 0u64;

    debug!(chunk, "encrypt_stream started");
    loop {
        options.check_cancelled()?;

        let n = read_full(source, &mut plaintext)?;
        ciphertext.clear();
        ctx.update(&plaintext[..n], &mut ciphertext);
        destination.write_all(&ciphertext)?;

        processed += n as u64;
        options.report(processed);

        if n < chunk {
            break;
        }
    }

    ciphertext.clear();
    ctx.finalize(&mut ciphertext);
    destination.write_all(&ciphertext)?;

    debug!(bytes = processed, "encrypt_stream finished");
    Ok(())
}
