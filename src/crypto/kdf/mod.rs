//! # Key Derivation
//!
//! - [`subkeys`] - splits one master key into independent encryption and
//!   authentication subkeys (runs on every encrypt/decrypt)
//! - [`pbkdf2`] - PBKDF2-HMAC-SHA512 for turning a passphrase into a master key
//!
//! The engine itself only ever runs [`subkeys`]. Passphrases must go through
//! [`pbkdf2`] (or [`Pbkdf2Builder`](crate::Pbkdf2Builder)) explicitly first.

pub mod pbkdf2;
pub mod subkeys;
