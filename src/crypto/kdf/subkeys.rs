//! src/crypto/kdf/subkeys.rs
//! Master key → {encryption subkey, authentication subkey}
//!
//! Each subkey is `HMAC-SHA256(master_key, label ‖ 0x01)` with a distinct label,
//! i.e. a single-block HKDF-Expand. Encryption and decryption run the exact same
//! derivation, so the two directions always agree.

use crate::aliases::{Aes256Key32, HmacSha256};
use crate::consts::KEY_LEN;
use crate::error::EtmError;
use aes::cipher::KeyInit;
use aes::{Aes256Dec, Aes256Enc};
use hmac::Mac;
use zeroize::Zeroizing;

const ENCRYPTION_LABEL: &[u8] = b"etmcrypt-rs encryption key";
const AUTHENTICATION_LABEL: &[u8] = b"etmcrypt-rs authentication key";

/// Reject anything but a [`KEY_LEN`]-byte master key.
pub fn validate_master_key(master_key: &[u8]) -> Result<(), EtmError> {
    if master_key.is_empty() {
        return Err(EtmError::InvalidKey("empty key".into()));
    }
    if master_key.len() != KEY_LEN {
        return Err(EtmError::InvalidKey(format!(
            "expected {KEY_LEN} bytes, got {}",
            master_key.len()
        )));
    }
    Ok(())
}

fn expand(master_key: &[u8], label: &[u8]) -> Result<Aes256Key32, EtmError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(master_key)
        .map_err(|e| EtmError::InvalidKey(format!("HMAC rejected key: {e}")))?;
    mac.update(label);
    mac.update(&[0x01]);

    let mut out = Zeroizing::new([0u8; 32]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// Independent encryption and authentication keys for one call or stream.
///
/// Both halves are zeroized on drop.
pub struct SubkeyPair {
    encryption: Aes256Key32,
    authentication: Aes256Key32,
}

impl SubkeyPair {
    /// Validate `master_key` and derive both subkeys from it.
    pub fn derive(master_key: &[u8]) -> Result<Self, EtmError> {
        validate_master_key(master_key)?;
        Ok(Self {
            encryption: expand(master_key, ENCRYPTION_LABEL)?,
            authentication: expand(master_key, AUTHENTICATION_LABEL)?,
        })
    }

    pub fn encryption_key(&self) -> &[u8; 32] {
        &self.encryption
    }

    pub fn authentication_key(&self) -> &[u8; 32] {
        &self.authentication
    }

    pub fn encryptor(&self) -> Aes256Enc {
        Aes256Enc::new(self.encryption_key().into())
    }

    pub fn decryptor(&self) -> Aes256Dec {
        Aes256Dec::new(self.encryption_key().into())
    }

    /// A fresh HMAC-SHA256 instance keyed with the authentication subkey.
    pub fn mac(&self) -> Result<HmacSha256, EtmError> {
        <HmacSha256 as Mac>::new_from_slice(self.authentication_key())
            .map_err(|e| EtmError::InvalidKey(format!("HMAC rejected key: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subkeys_are_distinct_and_stable() {
        let a = SubkeyPair::derive(&[0x11; 32]).unwrap();
        let b = SubkeyPair::derive(&[0x11; 32]).unwrap();
        assert_ne!(a.encryption_key(), a.authentication_key());
        assert_eq!(a.encryption_key(), b.encryption_key());
        assert_eq!(a.authentication_key(), b.authentication_key());
        assert_ne!(a.encryption_key(), &[0x11; 32]);
    }

    #[test]
    fn different_masters_give_different_subkeys() {
        let a = SubkeyPair::derive(&[0x11; 32]).unwrap();
        let b = SubkeyPair::derive(&[0x12; 32]).unwrap();
        assert_ne!(a.encryption_key(), b.encryption_key());
        assert_ne!(a.authentication_key(), b.authentication_key());
    }

    #[test]
    fn bad_lengths_rejected() {
        for len in [0usize, 1, 16, 31, 33, 64] {
            let key = vec![0xAA; len];
            assert!(
                matches!(SubkeyPair::derive(&key), Err(EtmError::InvalidKey(_))),
                "length {len} accepted"
            );
        }
    }
}
