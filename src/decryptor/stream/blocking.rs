//! src/decryptor/stream/blocking.rs
//! Bounded-memory streaming decryption over `std::io`.
//!
//! Two passes: the envelope is verified end to end first, then read again and
//! decrypted. Seekable sources are simply rewound; anything else is spooled
//! into an anonymous temporary file on the first pass.

use crate::consts::{BLOCK_LEN, TRAILING_WINDOW_LEN};
use crate::decryptor::read::read_iv;
use crate::decryptor::stream::context::DecryptionContext;
use crate::decryptor::stream::verifier::EnvelopeVerifier;
use crate::error::EtmError;
use crate::options::{flush_after, StreamOptions};
use crate::utils::read_full;
use std::io::{self, Read, Seek, SeekFrom, Write};
use tracing::debug;
use zeroize::Zeroizing;

/// Decrypt an envelope stream from `source` into `destination` with default
/// [`StreamOptions`].
pub fn decrypt_stream<R, W>(source: R, destination: W, master_key: &[u8]) -> Result<(), EtmError>
where
    R: Read,
    W: Write,
{
    decrypt_stream_with(source, destination, master_key, &StreamOptions::default())
}

/// Decrypt `source` into `destination` one chunk at a time.
///
/// The ciphertext is copied to an anonymous temporary file while its tag,
/// alignment and padding are checked; plaintext is written only once all of
/// them pass, so on error `destination` has received nothing. Memory stays
/// bounded by the chunk size. `destination` is flushed on every exit path.
pub fn decrypt_stream_with<R, W>(
    mut source: R,
    mut destination: W,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: Read,
    W: Write,
{
    let outcome = spool_and_release(&mut source, &mut destination, master_key, options);
    flush_after(&mut destination, outcome)
}

/// [`decrypt_stream`] for a source that can be rewound; no temporary file.
pub fn decrypt_seekable<R, W>(source: R, destination: W, master_key: &[u8]) -> Result<(), EtmError>
where
    R: Read + Seek,
    W: Write,
{
    decrypt_seekable_with(source, destination, master_key, &StreamOptions::default())
}

/// Verify the envelope from the current position of `source`, seek back, then
/// decrypt into `destination`.
///
/// The envelope must not change between the two passes.
pub fn decrypt_seekable_with<R, W>(
    mut source: R,
    mut destination: W,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: Read + Seek,
    W: Write,
{
    let outcome = verify_seekable(&mut source, master_key, options)
        .and_then(|()| release(&mut source, &mut destination, master_key, options));
    flush_after(&mut destination, outcome)
}

fn spool_and_release<R, W>(
    source: &mut R,
    destination: &mut W,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: Read,
    W: Write,
{
    let mut spool = tempfile::tempfile()?;
    verify(source, &mut spool, master_key, options)?;
    spool.seek(SeekFrom::Start(0))?;
    release(&mut spool, destination, master_key, options)
}

/// First pass over a seekable source; leaves it where it started.
pub(crate) fn verify_seekable<R>(
    source: &mut R,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: Read + Seek,
{
    let start = source.stream_position()?;
    verify(source, &mut io::sink(), master_key, options)?;
    source.seek(SeekFrom::Start(start))?;
    Ok(())
}

/// Read the whole envelope through an [`EnvelopeVerifier`], copying every byte
/// read into `copy`.
fn verify<R, S>(
    source: &mut R,
    copy: &mut S,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: Read,
    S: Write,
{
    let iv = read_iv(source)?;
    let mut verifier = EnvelopeVerifier::new(master_key, &iv)?;
    copy.write_all(&iv)?;

    let chunk = options.chunk_size();
    let mut ciphertext = vec![0u8; chunk];
    loop {
        options.check_cancelled()?;

        let n = read_full(source, &mut ciphertext)?;
        verifier.update(&ciphertext[..n]);
        copy.write_all(&ciphertext[..n])?;

        if n < chunk {
            break;
        }
    }

    verifier.finish()?;
    debug!("envelope verified");
    Ok(())
}

/// Second pass: decrypt an envelope that has already been verified.
pub(crate) fn release<R, W>(
    source: &mut R,
    destination: &mut W,
    master_key: &[u8],
    options: &StreamOptions,
) -> Result<(), EtmError>
where
    R: Read,
    W: Write,
{
    let iv = read_iv(source)?;
    let mut ctx = DecryptionContext::new(master_key, &iv)?;

    let chunk = options.chunk_size();
    let mut ciphertext = vec![0u8; chunk];
    let mut plaintext = Zeroizing::new(Vec::with_capacity(chunk + TRAILING_WINDOW_LEN + BLOCK_LEN));
    let mut processed = 0u64;

    debug!(chunk, "decrypt_stream started");
    loop {
        options.check_cancelled()?;

        let n = read_full(source, &mut ciphertext)?;
        plaintext.clear();
        ctx.update(&ciphertext[..n], &mut plaintext);
        destination.write_all(&plaintext)?;

        processed += n as u64;
        options.report(processed);

        if n < chunk {
            break;
        }
    }

    let released = ctx.released();
    plaintext.clear();
    ctx.finish(&mut plaintext)?;
    destination.write_all(&plaintext)?;

    debug!(bytes = released + plaintext.len() as u64, "decrypt_stream finished");
    Ok(())
}
