use asset_index::{blob_id, AssetIdMap, AssetIndex};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fs;
use std::hint::black_box;

/// Digest throughput for typical asset sizes
fn benchmark_blob_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("blob_id");

    for size in [1usize << 10, 64 << 10, 1 << 20] {
        let content = vec![b'a'; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &content, |b, content| {
            b.iter(|| blob_id(black_box(content)))
        });
    }

    group.finish();
}

/// Startup cost of indexing a tree of small files
fn benchmark_index_build(c: &mut Criterion) {
    let dir = tempfile::TempDir::new().unwrap();
    let mut ids = AssetIdMap::default();
    for i in 0..200 {
        let relative = format!("dir_{}/asset_{i}.json", i % 10);
        let path = dir.path().join(&relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("{{\"asset\": {i}}}")).unwrap();
        ids.insert(format!("A{i}"), relative);
    }

    c.bench_function("index_build_200_files", |b| {
        b.iter(|| AssetIndex::build(black_box(dir.path()), black_box(&ids)).unwrap())
    });
}

criterion_group!(benches, benchmark_blob_id, benchmark_index_build);
criterion_main!(benches);
