//! tests/engine_tests.rs
//! In-memory envelope behaviour: round-trips, tampering, truncation, keys

mod common;
use common::{EDGE_LENGTHS, OTHER_KEY, TEST_DATA, TEST_KEY};

use etmcrypt_rs::consts::{BLOCK_LEN, IV_LEN, MIN_ENVELOPE_LEN, TAG_LEN};
use etmcrypt_rs::{decrypt, encrypt, EtmError};
use proptest::prelude::*;
use std::collections::HashSet;

fn expected_envelope_len(plaintext_len: usize) -> usize {
    IV_LEN + (plaintext_len / BLOCK_LEN + 1) * BLOCK_LEN + TAG_LEN
}

// —————————————————————————————————————————————————————————————————————————————
// 1. Round-trip and layout
// —————————————————————————————————————————————————————————————————————————————
#[test]
fn hello_world_scenario() {
    let envelope = encrypt(TEST_DATA, &TEST_KEY).unwrap();
    assert_eq!(envelope.len(), 64, "16 IV + 16 CT + 32 tag");
    assert_eq!(decrypt(&envelope, &TEST_KEY).unwrap(), TEST_DATA);
}

#[test]
fn envelope_lengths_at_block_edges() {
    for &len in EDGE_LENGTHS {
        let plaintext = vec![0xa5u8; len];
        let envelope = encrypt(&plaintext, &TEST_KEY).unwrap();
        assert_eq!(envelope.len(), expected_envelope_len(len), "len = {len}");
        assert_eq!(decrypt(&envelope, &TEST_KEY).unwrap(), plaintext, "len = {len}");
    }
}

#[test]
fn empty_plaintext_is_one_padding_block() {
    let envelope = encrypt(b"", &TEST_KEY).unwrap();
    assert_eq!(envelope.len(), MIN_ENVELOPE_LEN + BLOCK_LEN);
    assert!(decrypt(&envelope, &TEST_KEY).unwrap().is_empty());
}

#[test]
fn ivs_are_unique() {
    let ivs: HashSet<Vec<u8>> = (0..1_000)
        .map(|_| encrypt(TEST_DATA, &TEST_KEY).unwrap()[..IV_LEN].to_vec())
        .collect();
    assert_eq!(ivs.len(), 1_000);
}

#[test]
fn same_plaintext_different_envelopes() {
    let a = encrypt(TEST_DATA, &TEST_KEY).unwrap();
    let b = encrypt(TEST_DATA, &TEST_KEY).unwrap();
    assert_ne!(a, b);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn roundtrip_any_plaintext(plaintext in proptest::collection::vec(any::<u8>(), 0..2048),
                               key in proptest::array::uniform32(any::<u8>())) {
        let envelope = encrypt(&plaintext, &key).unwrap();
        prop_assert_eq!(envelope.len(), expected_envelope_len(plaintext.len()));
        prop_assert_eq!(decrypt(&envelope, &key).unwrap(), plaintext);
    }

    #[test]
    fn any_single_bit_flip_is_rejected(len in 0usize..200, bit in any::<prop::sample::Index>()) {
        let envelope = encrypt(&vec![7u8; len], &TEST_KEY).unwrap();
        let mut tampered = envelope.clone();
        let i = bit.index(tampered.len() * 8);
        tampered[i / 8] ^= 1 << (i % 8);
        prop_assert!(matches!(decrypt(&tampered, &TEST_KEY), Err(EtmError::AuthenticationFailed)));
    }
}

// —————————————————————————————————————————————————————————————————————————————
// 2. Tampering and truncation
// —————————————————————————————————————————————————————————————————————————————
#[test]
fn tamper_each_region() {
    let envelope = encrypt(&[0u8; 100], &TEST_KEY).unwrap();
    for index in [0, IV_LEN - 1, IV_LEN, envelope.len() - TAG_LEN - 1, envelope.len() - 1] {
        let mut tampered = envelope.clone();
        tampered[index] ^= 0x01;
        assert!(
            matches!(decrypt(&tampered, &TEST_KEY), Err(EtmError::AuthenticationFailed)),
            "flip at {index}"
        );
    }
}

#[test]
fn truncation_below_minimum_is_malformed() {
    let envelope = encrypt(TEST_DATA, &TEST_KEY).unwrap();
    for len in [0, 1, 16, 47] {
        assert!(
            matches!(
                decrypt(&envelope[..len], &TEST_KEY),
                Err(EtmError::MalformedEnvelope { min: 48, .. })
            ),
            "len = {len}"
        );
    }
}

#[test]
fn mid_ciphertext_truncation_is_rejected() {
    let envelope = encrypt(&[3u8; 200], &TEST_KEY).unwrap();
    for cut in [1, 5, 16, 17, 100] {
        let truncated = &envelope[..envelope.len() - cut];
        let err = decrypt(truncated, &TEST_KEY).unwrap_err();
        assert!(
            matches!(err, EtmError::AuthenticationFailed | EtmError::IncompleteDecryption(_)),
            "cut {cut}: {err:?}"
        );
    }
}

// —————————————————————————————————————————————————————————————————————————————
// 3. Keys
// —————————————————————————————————————————————————————————————————————————————
#[test]
fn wrong_key_is_authentication_failure() {
    let envelope = encrypt(TEST_DATA, &TEST_KEY).unwrap();
    assert!(matches!(decrypt(&envelope, &OTHER_KEY), Err(EtmError::AuthenticationFailed)));
}

#[test]
fn bad_key_lengths_are_rejected() {
    for len in [0, 1, 16, 31, 33, 64] {
        let key = vec![0x11u8; len];
        assert!(matches!(encrypt(TEST_DATA, &key), Err(EtmError::InvalidKey(_))), "len = {len}");
    }
    let envelope = encrypt(TEST_DATA, &TEST_KEY).unwrap();
    assert!(matches!(decrypt(&envelope, &[0u8; 16]), Err(EtmError::InvalidKey(_))));
}

#[test]
fn error_messages_are_fixed() {
    let envelope = encrypt(TEST_DATA, &TEST_KEY).unwrap();
    let err = decrypt(&envelope, &OTHER_KEY).unwrap_err();
    assert_eq!(err.to_string(), "authentication failed");
}
