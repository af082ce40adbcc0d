//! src/crypto/kdf/pbkdf2.rs

use crate::aliases::{HmacSha512, MasterKey32, Salt16};
use crate::consts::{PBKDF2_MAX_ITER, PBKDF2_MIN_ITER};
use crate::error::EtmError;

use pbkdf2::pbkdf2;

/// Derive a 32-byte master key from a passphrase with PBKDF2-HMAC-SHA512,
/// writing straight into the caller's zeroizing buffer.
///
/// The salt is not stored anywhere by this crate; callers persist it next to
/// the envelope if they need to re-derive the key later.
#[inline]
pub fn derive_secure_pbkdf2_key(
    passphrase: &str,
    salt: &Salt16,
    iterations: u32,
    out_key: &mut MasterKey32,
) -> Result<(), EtmError> {
    if !(PBKDF2_MIN_ITER..=PBKDF2_MAX_ITER).contains(&iterations) {
        return Err(EtmError::Kdf(format!(
            "PBKDF2 iterations must be in {PBKDF2_MIN_ITER}..={PBKDF2_MAX_ITER}, got {iterations}"
        )));
    }
    if passphrase.is_empty() {
        return Err(EtmError::Kdf("empty passphrase".into()));
    }

    pbkdf2::<HmacSha512>(passphrase.as_bytes(), salt, iterations, &mut out_key[..])
        .map_err(|e| EtmError::Kdf(format!("PBKDF2 failed: {e}")))?;
    Ok(())
}
