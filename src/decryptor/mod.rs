// src/decryptor/mod.rs

//! Decryption side of the engine.
//!
//! Core API: [`decrypt`] verifies the whole envelope before releasing a byte;
//! [`decrypt_stream`] / [`decrypt_stream_async`] do the same job in bounded
//! memory by verifying in a first pass and decrypting in a second.

pub(crate) mod decrypt;
pub(crate) mod read;
pub(crate) mod stream;

pub use decrypt::decrypt;
pub use stream::{
    decrypt_seekable, decrypt_seekable_async, decrypt_seekable_async_with, decrypt_seekable_with,
    decrypt_stream, decrypt_stream_async, decrypt_stream_async_with, decrypt_stream_with,
    DecryptionContext,
};
