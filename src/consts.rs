//! # Constants
//!
//! Envelope geometry, streaming window bounds, random-buffer sizing and KDF
//! parameters used throughout the library.

/// AES block length in bytes.
pub const BLOCK_LEN: usize = 16;

/// Initialization vector length (one AES block).
pub const IV_LEN: usize = BLOCK_LEN;

/// HMAC-SHA256 tag length.
pub const TAG_LEN: usize = 32;

/// Required master key length (AES-256 / HMAC-SHA256 key).
pub const KEY_LEN: usize = 32;

/// Smallest byte count that can possibly be an envelope: `IV ‖ Tag`.
///
/// Anything shorter is rejected as malformed before any cryptography runs.
pub const MIN_ENVELOPE_LEN: usize = IV_LEN + TAG_LEN;

/// Bytes the streaming decryptor holds back until end-of-stream:
/// the candidate tag plus the final (padded) ciphertext block.
pub const TRAILING_WINDOW_LEN: usize = TAG_LEN + BLOCK_LEN;

/// Default streaming chunk size (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Lower bound for a caller-chosen chunk size (8 KiB).
pub const MIN_CHUNK_SIZE: usize = 8 * 1024;

/// Upper bound for a caller-chosen chunk size (1 MiB).
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// Size of the [`SecureRandom`](crate::SecureRandom) refill buffer.
///
/// Must stay a multiple of 8 so integer draws never straddle a refill.
pub const RANDOM_BUFFER_SIZE: usize = 1024;

/// Minimum allowed PBKDF2 iteration count.
pub const PBKDF2_MIN_ITER: u32 = 1;

/// Maximum allowed PBKDF2 iteration count.
///
/// Set to `5_000_000` to keep derivation time bounded.
pub const PBKDF2_MAX_ITER: u32 = 5_000_000;

/// Default PBKDF2 iteration count for passphrase-derived master keys.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 300_000;

/// Default salt size (16 bytes).
pub const DEFAULT_SALT_SIZE: usize = 16;

/// Base64 characters per PEM body line.
pub const PEM_LINE_WIDTH: usize = 64;
