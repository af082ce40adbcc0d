// benches/roundtrip.rs
//! In-memory round-trip (encrypt → decrypt) benchmarks

use etmcrypt_rs::{decrypt, encrypt};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

const KEY: [u8; 32] = [0x11; 32];

// --- Size constants ---
const KB: usize = 1024;
const MB: usize = 1024 * 1024;

fn format_size(bytes: usize) -> String {
    if bytes >= MB {
        format!("{} MiB", bytes / MB)
    } else if bytes >= KB {
        format!("{} KiB", bytes / KB)
    } else {
        format!("{bytes} B")
    }
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("roundtrip");

    for &size in &[64, KB, 64 * KB, MB] {
        let input = vec![0x41u8; size];

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("size", format_size(size)), &size, |b, _| {
            b.iter(|| {
                let sealed = encrypt(black_box(&input), &KEY).unwrap();
                black_box(decrypt(black_box(&sealed), &KEY).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_decrypt_reject(c: &mut Criterion) {
    let mut sealed = encrypt(&vec![0u8; MB], &KEY).unwrap();
    let last = sealed.len() - 1;
    sealed[last] ^= 1;

    // Rejection cost is one HMAC pass, no block decryption
    c.bench_function("decrypt/reject_tampered_1MiB", |b| {
        b.iter(|| decrypt(black_box(&sealed), &KEY).unwrap_err());
    });
}

criterion_group!(benches, bench_roundtrip, bench_decrypt_reject);
criterion_main!(benches);
