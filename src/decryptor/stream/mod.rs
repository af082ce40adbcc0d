// src/decryptor/stream/mod.rs
pub(crate) mod blocking;
pub(crate) mod context;
pub(crate) mod nonblocking;
pub(crate) mod trailer;
pub(crate) mod verifier;

pub use blocking::{decrypt_seekable, decrypt_seekable_with, decrypt_stream, decrypt_stream_with};
pub use context::DecryptionContext;
pub use nonblocking::{
    decrypt_seekable_async, decrypt_seekable_async_with, decrypt_stream_async,
    decrypt_stream_async_with,
};
