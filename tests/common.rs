//! tests/common.rs
//! Common constants and utilities shared across test files

use etmcrypt_rs::SecureRandom;

/// Master key from the documented "hello world" scenario
#[allow(dead_code)] // Used across multiple test files
pub const TEST_KEY: [u8; 32] = [0x11; 32];

/// A second valid key, for wrong-key and rekey tests
#[allow(dead_code)]
pub const OTHER_KEY: [u8; 32] = [0x22; 32];

/// Common test data strings used across multiple tests
#[allow(dead_code)]
pub const TEST_DATA: &[u8] = b"hello world";

/// Plaintext lengths around every block and window boundary
#[allow(dead_code)]
pub const EDGE_LENGTHS: &[usize] = &[0, 1, 15, 16, 17, 31, 32, 33, 47, 48, 49, 63, 64, 65, 1000];

/// Fresh random bytes from the crate's own source
#[allow(dead_code)]
pub fn random_bytes(len: usize) -> Vec<u8> {
    SecureRandom::global().get_bytes(len).unwrap()
}

/// Route `tracing` output to the test harness; set `RUST_LOG=debug` to see it
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
