//! src/decryptor/read.rs
//! Envelope prefix parsing for the streaming paths.

use crate::aliases::Iv16;
use crate::consts::{IV_LEN, MIN_ENVELOPE_LEN};
use crate::error::EtmError;
use crate::utils::{read_full, read_full_async};
use std::io::Read;
use tokio::io::AsyncRead;

fn short_envelope(len: usize) -> EtmError {
    EtmError::MalformedEnvelope {
        len,
        min: MIN_ENVELOPE_LEN,
    }
}

/// Read the 16-byte IV that opens every envelope.
///
/// A stream that ends first is malformed, not an I/O error.
#[inline]
pub fn read_iv<R>(reader: &mut R) -> Result<Iv16, EtmError>
where
    R: Read,
{
    let mut iv = [0u8; IV_LEN];
    let n = read_full(reader, &mut iv)?;
    if n < IV_LEN {
        return Err(short_envelope(n));
    }
    Ok(iv)
}

/// Async counterpart of [`read_iv`].
pub async fn read_iv_async<R>(reader: &mut R) -> Result<Iv16, EtmError>
where
    R: AsyncRead + Unpin,
{
    let mut iv = [0u8; IV_LEN];
    let n = read_full_async(reader, &mut iv).await?;
    if n < IV_LEN {
        return Err(short_envelope(n));
    }
    Ok(iv)
}
