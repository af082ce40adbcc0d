//! src/encryptor/write.rs
//! `io::Write` adapter that encrypts everything written through it.

use crate::encryptor::context::EncryptionContext;
use crate::error::EtmError;
use std::io::{self, Write};

/// Wraps a writer; plaintext goes in through [`Write`], an envelope comes out
/// of `inner`.
///
/// The IV is written lazily on the first `write`/`finish`. Call
/// [`finish`](EncryptingWriter::finish) to emit the final block and the tag;
/// dropping the writer without it leaves a truncated envelope that will never
/// authenticate.
///
/// Once `inner` returns an error the cipher state no longer matches what was
/// written, so every later `write` and `finish` fails too.
pub struct EncryptingWriter<W: Write> {
    inner: W,
    ctx: EncryptionContext,
    scratch: Vec<u8>,
    header_written: bool,
    failed: bool,
}

impl<W: Write> EncryptingWriter<W> {
    pub fn new(inner: W, master_key: &[u8]) -> Result<Self, EtmError> {
        Ok(Self {
            inner,
            ctx: EncryptionContext::new(master_key)?,
            scratch: Vec::new(),
            header_written: false,
            failed: false,
        })
    }

    fn check_healthy(&self) -> io::Result<()> {
        if self.failed {
            return Err(io::Error::other(
                "an earlier write failed; the envelope cannot be completed",
            ));
        }
        Ok(())
    }

    /// Record a failed write to `inner` before passing the result on.
    fn track(&mut self, result: io::Result<()>) -> io::Result<()> {
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    fn write_header(&mut self) -> io::Result<()> {
        if !self.header_written {
            let result = self.inner.write_all(self.ctx.iv());
            self.track(result)?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Emit padding and tag, flush, and hand back the inner writer.
    pub fn finish(mut self) -> Result<W, EtmError> {
        self.check_healthy()?;
        self.write_header()?;
        self.scratch.clear();
        self.ctx.finalize(&mut self.scratch);
        let result = self.inner.write_all(&self.scratch);
        if result.is_err() {
            self.failed = true;
        }
        result?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for EncryptingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.check_healthy()?;
        self.write_header()?;
        self.scratch.clear();
        self.ctx.update(buf, &mut self.scratch);
        let result = self.inner.write_all(&self.scratch);
        self.track(result)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
