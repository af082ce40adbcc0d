//! # Stream Options
//!
//! Knobs shared by every chunked operation (stream encrypt/decrypt, file
//! helpers, rekeying, random-file generation): chunk window, cancellation and
//! progress reporting.

use crate::consts::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};
use crate::error::EtmError;
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

/// Progress callback, called after every chunk with the cumulative number of
/// input bytes processed so far.
pub type ProgressFn = Arc<dyn Fn(u64) + Send + Sync>;

/// Chunking, cancellation and progress for streaming operations.
///
/// Cheap to clone; clones share the same token and callback.
///
/// ```
/// use etmcrypt_rs::StreamOptions;
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let options = StreamOptions::new()
///     .with_chunk_size(256 * 1024)
///     .with_cancellation(token.clone())
///     .with_progress(|bytes| println!("{bytes} bytes done"));
/// assert_eq!(options.chunk_size(), 256 * 1024);
/// ```
#[derive(Clone)]
pub struct StreamOptions {
    chunk_size: usize,
    cancel: Option<CancellationToken>,
    progress: Option<ProgressFn>,
}

impl StreamOptions {
    /// Defaults: 64 KiB chunks, no cancellation, no progress callback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            cancel: None,
            progress: None,
        }
    }

    /// Set the chunk window, clamped to [`MIN_CHUNK_SIZE`]..=[`MAX_CHUNK_SIZE`]
    /// and rounded down to whole AES blocks.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        let clamped = chunk_size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE);
        self.chunk_size = clamped - clamped % crate::consts::BLOCK_LEN;
        self
    }

    /// Check `token` between chunks; once cancelled the operation flushes its
    /// destination and fails with [`EtmError::Cancelled`].
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[must_use]
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(progress));
        self
    }

    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    pub(crate) fn check_cancelled(&self) -> Result<(), EtmError> {
        if self.is_cancelled() {
            tracing::warn!("stream operation cancelled");
            return Err(EtmError::Cancelled);
        }
        Ok(())
    }

    pub(crate) fn report(&self, processed: u64) {
        if let Some(progress) = &self.progress {
            progress(processed);
        }
    }
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StreamOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamOptions")
            .field("chunk_size", &self.chunk_size)
            .field("cancellable", &self.cancel.is_some())
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Flush `destination` no matter how `outcome` went. The operation's own
/// error wins over a flush error.
pub(crate) fn flush_after<W, T>(destination: &mut W, outcome: Result<T, EtmError>) -> Result<T, EtmError>
where
    W: Write + ?Sized,
{
    let flushed = destination.flush();
    let value = outcome?;
    flushed?;
    Ok(value)
}

/// Async counterpart of [`flush_after`].
pub(crate) async fn flush_after_async<W, T>(
    destination: &mut W,
    outcome: Result<T, EtmError>,
) -> Result<T, EtmError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let flushed = destination.flush().await;
    let value = outcome?;
    flushed?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn chunk_size_is_clamped_and_block_aligned() {
        assert_eq!(StreamOptions::new().with_chunk_size(1).chunk_size(), MIN_CHUNK_SIZE);
        assert_eq!(
            StreamOptions::new().with_chunk_size(usize::MAX).chunk_size(),
            MAX_CHUNK_SIZE
        );
        assert_eq!(StreamOptions::new().with_chunk_size(10_007).chunk_size(), 10_000);
    }

    #[test]
    fn cancellation_is_observed() {
        let token = CancellationToken::new();
        let options = StreamOptions::new().with_cancellation(token.clone());
        assert!(options.check_cancelled().is_ok());
        token.cancel();
        assert!(matches!(options.check_cancelled(), Err(EtmError::Cancelled)));
    }

    #[test]
    fn progress_reaches_callback() {
        let seen = Arc::new(AtomicU64::new(0));
        let sink = Arc::clone(&seen);
        let options = StreamOptions::new().with_progress(move |n| sink.store(n, Ordering::SeqCst));
        options.report(42);
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn flush_error_does_not_mask_operation_error() {
        let mut sink = Vec::new();
        let out: Result<(), _> = flush_after(&mut sink, Err(EtmError::AuthenticationFailed));
        assert!(matches!(out, Err(EtmError::AuthenticationFailed)));
    }
}
