//! tests/batch_ops_tests.rs
//! Parallel batches over many in-memory streams

#![cfg(feature = "batch-ops")]

mod common;
use common::{OTHER_KEY, TEST_KEY};

use etmcrypt_rs::{decrypt, decrypt_batch, encrypt, encrypt_batch, EtmError};
use std::io::Cursor;

#[test]
fn batch_roundtrip_sanity_check() {
    let data = [b"hello parallel world"; 4];

    let mut encrypted = data.map(|d| (Cursor::new(d.to_vec()), Vec::new()));
    encrypt_batch(&mut encrypted, &TEST_KEY).unwrap();

    let mut decrypted = encrypted
        .into_iter()
        .map(|(_, buf)| (Cursor::new(buf), Vec::new()))
        .collect::<Vec<_>>();
    decrypt_batch(&mut decrypted, &TEST_KEY).unwrap();

    let results: Vec<_> = decrypted.into_iter().map(|(_, buf)| buf).collect();
    assert_eq!(results, data.as_ref());
}

#[test]
fn batch_empty_batch() {
    let mut batch: Vec<(Cursor<Vec<u8>>, Vec<u8>)> = Vec::new();
    encrypt_batch(&mut batch, &TEST_KEY).unwrap();
    assert!(batch.is_empty());
}

#[test]
fn batch_outputs_use_distinct_ivs() {
    let mut batch: Vec<_> = (0..16).map(|_| (Cursor::new(vec![0u8; 64]), Vec::new())).collect();
    encrypt_batch(&mut batch, &TEST_KEY).unwrap();
    for (_, sealed) in &batch {
        assert_eq!(decrypt(sealed, &TEST_KEY).unwrap(), vec![0u8; 64]);
    }
    let mut ivs: Vec<_> = batch.iter().map(|(_, s)| s[..16].to_vec()).collect();
    ivs.sort();
    ivs.dedup();
    assert_eq!(ivs.len(), 16);
}

#[test]
fn batch_stops_on_bad_entry() {
    let good = encrypt(b"good", &TEST_KEY).unwrap();
    let bad = encrypt(b"bad", &OTHER_KEY).unwrap();
    let mut batch = vec![(Cursor::new(good), Vec::new()), (Cursor::new(bad), Vec::new())];
    assert!(matches!(
        decrypt_batch(&mut batch, &TEST_KEY),
        Err(EtmError::AuthenticationFailed)
    ));
}
