//! # Error Types
//!
//! This module defines the error type used throughout the library.
//! All operations return [`Result<T, EtmError>`](EtmError); no failure is ever
//! collapsed into a bare `bool`, so callers can tell a missing file from a
//! tampered ciphertext.

use thiserror::Error;

/// The error type for all encryption, decryption, randomness and encoding operations.
#[derive(Error, Debug)]
pub enum EtmError {
    /// The master key is empty or not exactly [`KEY_LEN`](crate::consts::KEY_LEN) bytes.
    ///
    /// Keys are never truncated or zero-padded to fit.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The envelope is shorter than `IV ‖ Tag` and cannot be parsed at all.
    #[error("malformed envelope: {len} bytes, need at least {min}")]
    MalformedEnvelope {
        /// Observed envelope length.
        len: usize,
        /// Minimum valid envelope length.
        min: usize,
    },

    /// The authentication tag did not match. No plaintext was released.
    ///
    /// The message is deliberately fixed: it says nothing about where the
    /// mismatch happened.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Authenticated ciphertext ended before the final padded block was consumed.
    #[error("incomplete decryption: {0}")]
    IncompleteDecryption(String),

    /// I/O error from the underlying reader, writer or file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A private-key export was requested for a public-only key pair.
    #[error("key pair holds no private key material")]
    NoPrivateKeyMaterial,

    /// A random-number bound was misused (`max < min`).
    #[error("invalid range: max ({max}) is less than min ({min})")]
    InvalidRange {
        /// Requested lower bound.
        min: i64,
        /// Requested upper bound.
        max: i64,
    },

    /// The operating system entropy source failed.
    #[error("entropy source failure: {0}")]
    Entropy(#[from] rand::rand_core::OsError),

    /// Passphrase key derivation was misconfigured.
    #[error("KDF error: {0}")]
    Kdf(String),

    /// Text presentation (Base64, hex, UTF-8 or PEM) could not be decoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The caller's cancellation token fired between chunks.
    #[error("operation cancelled")]
    Cancelled,
}

impl From<base64::DecodeError> for EtmError {
    fn from(err: base64::DecodeError) -> Self {
        EtmError::Encoding(format!("invalid Base64: {err}"))
    }
}

impl From<hex::FromHexError> for EtmError {
    fn from(err: hex::FromHexError) -> Self {
        EtmError::Encoding(format!("invalid hex: {err}"))
    }
}

impl From<std::string::FromUtf8Error> for EtmError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        EtmError::Encoding(format!("plaintext is not valid UTF-8: {err}"))
    }
}
