// ============================================================================
// FILE: src/utils.rs
// ============================================================================

//! Utility functions used across the library.

use std::io::{ErrorKind, Read};

/// XORs two 16-byte blocks and writes the result to `output`.
///
/// Used by the CBC chaining in both directions.
///
/// # Panics (by contract)
///
/// Panics if any of the three slices is shorter than 16 bytes. All callers pass
/// whole AES blocks, so this never happens in correct usage.
#[inline(always)]
pub const fn xor_blocks(block_a: &[u8], block_b: &[u8], output: &mut [u8]) {
    let mut i = 0;
    while i < 16 {
        output[i] = block_a[i] ^ block_b[i];
        i += 1;
    }
}

/// Reads until `buf` is full or the reader reports end-of-stream.
///
/// Returns the number of bytes read; anything less than `buf.len()` means EOF.
/// `Interrupted` reads are retried, every other error propagates.
pub fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Async counterpart of [`read_full`].
pub async fn read_full_async<R>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: tokio::io::AsyncRead + Unpin + ?Sized,
{
    use tokio::io::AsyncReadExt;

    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]).await {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader that hands out at most three bytes per call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.0.len().min(buf.len()).min(3);
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn read_full_gathers_short_reads() {
        let data = [7u8; 20];
        let mut buf = [0u8; 16];
        let n = read_full(&mut Trickle(&data), &mut buf).unwrap();
        assert_eq!(n, 16);
        assert_eq!(buf, [7u8; 16]);
    }

    #[test]
    fn read_full_reports_eof() {
        let mut buf = [0u8; 16];
        let n = read_full(&mut Cursor::new(b"abc"), &mut buf).unwrap();
        assert_eq!(n, 3);
        assert_eq!(&buf[..3], b"abc");
    }

    #[test]
    fn xor_blocks_self_is_zero() {
        let block = [0x55u8; 16];
        let mut out = [0xffu8; 16];
        xor_blocks(&block, &block, &mut out);
        assert_eq!(out, [0u8; 16]);
    }
}
