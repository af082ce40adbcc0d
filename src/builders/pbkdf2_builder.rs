//! src/builders/pbkdf2_builder.rs
//! PBKDF2-HMAC-SHA512 builder for turning passphrases into master keys.

use crate::aliases::{MasterKey32, Salt16};
use crate::consts::{DEFAULT_PBKDF2_ITERATIONS, PBKDF2_MAX_ITER, PBKDF2_MIN_ITER};
use crate::crypto::kdf::pbkdf2::derive_secure_pbkdf2_key;
use crate::crypto::rng::SecureRandom;
use crate::error::EtmError;
use zeroize::Zeroizing;

/// PBKDF2-HMAC-SHA512 key derivation builder.
///
/// Strong defaults: a 16-byte salt from [`SecureRandom`] and
/// [`DEFAULT_PBKDF2_ITERATIONS`] iterations. The salt is not secret but must be
/// stored next to the envelope to derive the same key again.
///
/// ```
/// use etmcrypt_rs::{decrypt, encrypt, Pbkdf2Builder};
///
/// let builder = Pbkdf2Builder::new()?.with_iterations(1_000);
/// let salt = *builder.salt();
/// let key = builder.derive_secure_new("correct horse battery staple")?;
/// let sealed = encrypt(b"payload", &key[..])?;
///
/// let again = Pbkdf2Builder::new()?
///     .with_iterations(1_000)
///     .with_salt(salt)
///     .derive_secure_new("correct horse battery staple")?;
/// assert_eq!(decrypt(&sealed, &again[..])?, b"payload");
/// # Ok::<(), etmcrypt_rs::EtmError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pbkdf2Builder {
    iterations: u32,
    salt: Salt16,
}

impl Pbkdf2Builder {
    /// Builder with a fresh random salt and default iterations. Fails only if
    /// the OS entropy source does.
    pub fn new() -> Result<Self, EtmError> {
        Ok(Self {
            iterations: DEFAULT_PBKDF2_ITERATIONS,
            salt: SecureRandom::global().array()?,
        })
    }

    /// Set the iteration count, clamped to
    /// [`PBKDF2_MIN_ITER`]..=[`PBKDF2_MAX_ITER`].
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations.clamp(PBKDF2_MIN_ITER, PBKDF2_MAX_ITER);
        self
    }

    /// Reuse a stored salt.
    #[must_use]
    pub fn with_salt(mut self, salt: impl Into<Salt16>) -> Self {
        self.salt = salt.into();
        self
    }

    #[must_use]
    pub const fn salt(&self) -> &Salt16 {
        &self.salt
    }

    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Derive into a caller-provided zeroizing buffer.
    #[inline]
    pub fn derive_secure(&self, passphrase: &str, out_key: &mut MasterKey32) -> Result<(), EtmError> {
        derive_secure_pbkdf2_key(passphrase, &self.salt, self.iterations, out_key)
    }

    /// Derive and return a fresh zeroizing key.
    #[inline]
    pub fn derive_secure_new(&self, passphrase: &str) -> Result<MasterKey32, EtmError> {
        let mut key = Zeroizing::new([0u8; 32]);
        self.derive_secure(passphrase, &mut key)?;
        Ok(key)
    }
}
