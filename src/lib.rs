// src/lib.rs

//! Encrypt-then-MAC symmetric encryption: AES-256-CBC with PKCS#7 padding,
//! authenticated by HMAC-SHA256 over `IV ‖ ciphertext`, keyed by two subkeys
//! derived from one 32-byte master key.
//!
//! Envelope layout: `IV (16) ‖ ciphertext (N·16) ‖ tag (32)`.
//!
//! ```
//! let key = [0x11u8; 32];
//! let sealed = etmcrypt_rs::encrypt(b"hello world", &key)?;
//! assert_eq!(sealed.len(), 64);
//! assert_eq!(etmcrypt_rs::decrypt(&sealed, &key)?, b"hello world");
//! # Ok::<(), etmcrypt_rs::EtmError>(())
//! ```

pub mod aliases;
#[cfg(feature = "batch-ops")]
pub mod batch_ops;
pub mod builders;
pub mod consts;
pub mod convert;
pub mod crypto;
pub mod decryptor;
pub mod encryptor;
pub mod error;
pub mod file_ops;
pub mod generator;
pub mod options;
pub mod pem;
pub mod text;
pub mod utils;

// Engine
pub use decryptor::{
    decrypt, decrypt_seekable, decrypt_seekable_async, decrypt_seekable_async_with,
    decrypt_seekable_with, decrypt_stream, decrypt_stream_async, decrypt_stream_async_with,
    decrypt_stream_with, DecryptionContext,
};
pub use encryptor::{
    encrypt, encrypt_stream, encrypt_stream_async, encrypt_stream_async_with, encrypt_stream_with,
    EncryptingWriter, EncryptionContext,
};
pub use error::EtmError;
pub use options::{ProgressFn, StreamOptions};

// Keys and randomness
pub use builders::pbkdf2_builder::Pbkdf2Builder;
pub use crypto::kdf::pbkdf2::derive_secure_pbkdf2_key;
pub use crypto::kdf::subkeys::SubkeyPair;
pub use crypto::rng::SecureRandom;

// Facade
pub use convert::{rekey_file, rekey_stream, rekey_stream_with};
pub use file_ops::{
    decrypt_file, decrypt_file_async, decrypt_file_async_with, decrypt_file_with, encrypt_file,
    encrypt_file_async, encrypt_file_async_with, encrypt_file_with,
};
pub use generator::{generate_random_file, generate_random_file_async, FileSize};
pub use pem::{export_key, export_private_key, export_public_key, import_public_key, RsaKeyPair, RsaPrivateParts};
pub use text::{decrypt_string, encrypt_string};

#[cfg(feature = "batch-ops")]
pub use batch_ops::{decrypt_batch, encrypt_batch};
