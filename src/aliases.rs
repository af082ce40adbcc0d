//! # Type Aliases
//!
//! Semantic names for the fixed-size buffers and primitives used across the crate.
//!
//! ## Type Categories
//!
//! ### HMAC Primitives
//! - [`HmacSha256`] - subkey expansion and envelope authentication
//! - [`HmacSha512`] - PBKDF2 passphrase derivation
//!
//! ### Secrets (zeroized on drop)
//! - [`Aes256Key32`] - 32-byte AES-256 / HMAC subkey
//! - [`MasterKey32`] - 32-byte master key produced by the passphrase KDF
//!
//! ### Public values
//! - [`Block16`] - one AES block
//! - [`Iv16`] - 16-byte initialization vector
//! - [`Salt16`] - 16-byte KDF salt
//! - [`Tag32`] - 32-byte HMAC-SHA256 tag

use crate::consts::DEFAULT_SALT_SIZE;
use hmac::Hmac;
use sha2::{Sha256, Sha512};
use zeroize::Zeroizing;

pub type HmacSha256 = Hmac<Sha256>;
pub type HmacSha512 = Hmac<Sha512>;

pub type Aes256Key32 = Zeroizing<[u8; 32]>;
pub type MasterKey32 = Zeroizing<[u8; 32]>;

pub type Block16 = [u8; 16]; // one AES block
pub type Iv16 = [u8; 16];
pub type Salt16 = [u8; DEFAULT_SALT_SIZE];
pub type Tag32 = [u8; 32];
