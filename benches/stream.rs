// benches/stream.rs
//! Streaming throughput across chunk sizes, sync and tokio

use etmcrypt_rs::{decrypt_stream_with, encrypt_stream_async, encrypt_stream_with, StreamOptions};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

const KEY: [u8; 32] = [0x11; 32];
const INPUT_LEN: usize = 8 * 1024 * 1024;

fn bench_chunk_sizes(c: &mut Criterion) {
    let input = vec![0x5au8; INPUT_LEN];
    let mut sealed = Vec::with_capacity(INPUT_LEN + 64);
    encrypt_stream_with(&input[..], &mut sealed, &KEY, &StreamOptions::new()).unwrap();

    let mut group = c.benchmark_group("stream");
    group.throughput(Throughput::Bytes(INPUT_LEN as u64));
    group.sample_size(20);

    for chunk in [8 * 1024, 64 * 1024, 1024 * 1024] {
        let options = StreamOptions::new().with_chunk_size(chunk);

        group.bench_with_input(BenchmarkId::new("encrypt", chunk / 1024), &options, |b, o| {
            b.iter(|| {
                let mut out = Vec::with_capacity(INPUT_LEN + 64);
                encrypt_stream_with(black_box(&input[..]), &mut out, &KEY, o).unwrap();
                black_box(out)
            });
        });

        group.bench_with_input(BenchmarkId::new("decrypt", chunk / 1024), &options, |b, o| {
            b.iter(|| {
                let mut out = Vec::with_capacity(INPUT_LEN);
                decrypt_stream_with(black_box(&sealed[..]), &mut out, &KEY, o).unwrap();
                black_box(out)
            });
        });
    }

    group.finish();
}

fn bench_async(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let input = vec![0x5au8; INPUT_LEN];

    let mut group = c.benchmark_group("stream_async");
    group.throughput(Throughput::Bytes(INPUT_LEN as u64));
    group.sample_size(20);
    group.bench_function("encrypt", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let mut out = Vec::with_capacity(INPUT_LEN + 64);
                encrypt_stream_async(black_box(&input[..]), &mut out, &KEY).await.unwrap();
                black_box(out)
            })
        });
    });
    group.finish();
}

criterion_group!(benches, bench_chunk_sizes, bench_async);
criterion_main!(benches);
