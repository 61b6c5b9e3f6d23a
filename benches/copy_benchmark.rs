//! Performance benchmarks for CloneDrive
//!
//! Run with: cargo bench

use clonedrive::config::{Engine, SessionConfig};
use clonedrive::core::CloneSession;
use clonedrive::hash::{HashAlgorithm, StreamingDigest};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

/// Create a test image of the specified size
fn create_test_image(dir: &std::path::Path, name: &str, size: usize) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();

    let chunk_size = 64 * 1024;
    let chunk: Vec<u8> = (0..chunk_size).map(|i| (i % 256) as u8).collect();
    let mut remaining = size;

    while remaining > 0 {
        let to_write = remaining.min(chunk_size);
        file.write_all(&chunk[..to_write]).unwrap();
        remaining -= to_write;
    }

    path
}

fn bench_clone_engines(c: &mut Criterion) {
    let mut group = c.benchmark_group("clone_and_verify");
    group.sample_size(10);

    for size in [1024 * 1024, 16 * 1024 * 1024].iter() {
        let dir = TempDir::new().unwrap();
        let src = create_test_image(dir.path(), "src.img", *size);
        let dst = create_test_image(dir.path(), "dst.img", *size);

        // Four passes over the image per session
        group.throughput(Throughput::Bytes(*size as u64 * 4));

        for engine in [Engine::Buffered, Engine::Pipelined] {
            group.bench_with_input(BenchmarkId::new(format!("{:?}", engine), size), size, |b, _| {
                b.iter(|| {
                    let config = SessionConfig {
                        source: src.clone(),
                        destination: Some(dst.clone()),
                        buffer_size: 4 * 1024 * 1024,
                        chunk_size: 1024 * 1024,
                        engine,
                        ..Default::default()
                    };
                    black_box(CloneSession::new(config).run().unwrap())
                });
            });
        }
    }

    group.finish();
}

fn bench_digest_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest");

    let size = 16 * 1024 * 1024;
    let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();
    group.throughput(Throughput::Bytes(size as u64));

    for algorithm in [HashAlgorithm::Sha1, HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
        group.bench_with_input(BenchmarkId::new(algorithm.name(), size), &data, |b, data| {
            b.iter(|| {
                let mut digest = StreamingDigest::new(algorithm);
                for chunk in data.chunks(1024 * 1024) {
                    digest.update(chunk);
                }
                black_box(digest.finalize())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_clone_engines, bench_digest_algorithms);
criterion_main!(benches);
