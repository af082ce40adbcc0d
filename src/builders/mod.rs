//! # Builders
//!
//! Fluent configuration for operations with more than a couple of knobs.
//!
//! - [`pbkdf2_builder`] - passphrase to master key via PBKDF2-HMAC-SHA512
//!
//! Stream knobs live in [`StreamOptions`](crate::StreamOptions).

pub mod pbkdf2_builder;
