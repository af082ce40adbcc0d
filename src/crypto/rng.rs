// src/crypto/rng.rs
//! Process-wide cryptographically strong randomness.
//!
//! [`SecureRandom`] keeps a [`RANDOM_BUFFER_SIZE`]-byte buffer filled from
//! [`OsRng`] and hands integers out of it, refilling synchronously once it is
//! exhausted. The buffer and its offset sit behind one mutex, so any number of
//! threads may draw from [`SecureRandom::global`] at once.
//!
//! Bounded draws reduce a 64-bit sample modulo the range. The resulting bias is
//! at most `range / 2^64` and is not corrected.

use crate::consts::RANDOM_BUFFER_SIZE;
use crate::error::EtmError;
use rand::rngs::OsRng;
use rand::TryRngCore;
use std::sync::{LazyLock, Mutex, PoisonError};
use zeroize::Zeroizing;

const _: () = assert!(RANDOM_BUFFER_SIZE % 8 == 0);

static GLOBAL: LazyLock<SecureRandom> = LazyLock::new(SecureRandom::new);

struct RandomBuffer {
    bytes: Zeroizing<[u8; RANDOM_BUFFER_SIZE]>,
    offset: usize,
}

impl RandomBuffer {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], EtmError> {
        if self.offset + N > RANDOM_BUFFER_SIZE {
            OsRng.try_fill_bytes(&mut self.bytes[..])?;
            self.offset = 0;
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.offset..self.offset + N]);
        self.offset += N;
        Ok(out)
    }
}

/// Buffered OS entropy with integer, float and byte helpers.
pub struct SecureRandom {
    state: Mutex<RandomBuffer>,
}

impl SecureRandom {
    /// Create an independent source. The buffer starts exhausted, so the first
    /// draw triggers the first refill.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RandomBuffer {
                bytes: Zeroizing::new([0u8; RANDOM_BUFFER_SIZE]),
                offset: RANDOM_BUFFER_SIZE,
            }),
        }
    }

    /// The shared process-wide instance, created on first use.
    pub fn global() -> &'static SecureRandom {
        &GLOBAL
    }

    fn take<const N: usize>(&self) -> Result<[u8; N], EtmError> {
        // The buffer is consistent after every statement, so a poisoned lock is safe to reuse.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.take::<N>()
    }

    fn next_u64(&self) -> Result<u64, EtmError> {
        Ok(u64::from_le_bytes(self.take::<8>()?))
    }

    /// A uniformly distributed integer in `[0, i32::MAX]`.
    pub fn next_int(&self) -> Result<i32, EtmError> {
        let raw = u32::from_le_bytes(self.take::<4>()?);
        Ok((raw & 0x7fff_ffff) as i32)
    }

    /// An integer in `[0, max)`. `max == 0` yields `0`; a negative `max` is
    /// [`EtmError::InvalidRange`].
    pub fn next_int_max(&self, max: i32) -> Result<i32, EtmError> {
        self.next_int_range(0, max)
    }

    /// An integer in `[min, max)`. `min == max` yields `min`.
    pub fn next_int_range(&self, min: i32, max: i32) -> Result<i32, EtmError> {
        if max < min {
            return Err(EtmError::InvalidRange {
                min: min.into(),
                max: max.into(),
            });
        }
        let range = (i64::from(max) - i64::from(min)) as u64;
        if range == 0 {
            return Ok(min);
        }
        let offset = (self.next_u64()? % range) as i64;
        Ok((i64::from(min) + offset) as i32)
    }

    /// A double in `[0, 1)` with 53 bits of precision.
    pub fn next_double(&self) -> Result<f64, EtmError> {
        let bits = self.next_u64()? >> 11;
        Ok(bits as f64 / (1u64 << 53) as f64)
    }

    /// Fill `dest` straight from the OS source, bypassing the integer buffer.
    pub fn fill(&self, dest: &mut [u8]) -> Result<(), EtmError> {
        OsRng.try_fill_bytes(dest)?;
        Ok(())
    }

    /// `count` fresh random bytes.
    pub fn get_bytes(&self, count: usize) -> Result<Vec<u8>, EtmError> {
        let mut out = vec![0u8; count];
        self.fill(&mut out)?;
        Ok(out)
    }

    /// A fresh random fixed-size array (IVs, salts, keys).
    pub fn array<const N: usize>(&self) -> Result<[u8; N], EtmError> {
        let mut out = [0u8; N];
        self.fill(&mut out)?;
        Ok(out)
    }
}

impl Default for SecureRandom {
    fn default() -> Self {
        Self::new()
    }
}
