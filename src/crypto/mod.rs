// src/crypto/mod.rs

//! Low-level crypto primitives.
//!
//! - [`cbc`]: AES-256-CBC chaining over whole blocks
//! - [`kdf`]: subkey expansion and passphrase derivation
//! - [`rng`]: the process-wide [`SecureRandom`](rng::SecureRandom) source
//!
//! HMAC types are defined in `aliases.rs`.

pub mod cbc;
pub mod kdf;
pub mod rng;
