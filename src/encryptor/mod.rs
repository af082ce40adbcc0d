// src/encryptor/mod.rs

//! Encryption side of the engine.
//!
//! Core API: [`encrypt`] for in-memory envelopes, [`encrypt_stream`] /
//! [`encrypt_stream_async`] for bounded-memory streaming.
//! Building block: [`EncryptionContext`], the incremental CBC + HMAC state both
//! paths share, and [`EncryptingWriter`] which wraps it in `io::Write`.

pub(crate) mod context;
pub(crate) mod encrypt;
pub(crate) mod stream;
pub(crate) mod stream_async;
pub(crate) mod write;

pub use context::EncryptionContext;
pub use encrypt::encrypt;
pub use stream::{encrypt_stream, encrypt_stream_with};
pub use stream_async::{encrypt_stream_async, encrypt_stream_async_with};
pub use write::EncryptingWriter;
