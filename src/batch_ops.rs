//! src/batch_ops.rs
//! Parallel stream encryption/decryption over many `(reader, writer)` pairs.
//!
//! Each pair runs on the rayon pool with its own IV and subkeys; the first
//! error aborts the batch and is returned. Pairs that already finished keep
//! their output.

use crate::decryptor::decrypt_stream;
use crate::encryptor::encrypt_stream;
use crate::error::EtmError;
use rayon::prelude::*;
use std::io::{Read, Write};

pub fn encrypt_batch<R, W>(batch: &mut [(R, W)], master_key: &[u8]) -> Result<(), EtmError>
where
    R: Read + Send,
    W: Write + Send,
{
    batch
        .par_iter_mut()
        .try_for_each(|(src, dst)| encrypt_stream(src, dst, master_key))
}

pub fn decrypt_batch<R, W>(batch: &mut [(R, W)], master_key: &[u8]) -> Result<(), EtmError>
where
    R: Read + Send,
    W: Write + Send,
{
    batch
        .par_iter_mut()
        .try_for_each(|(src, dst)| decrypt_stream(src, dst, master_key))
}
