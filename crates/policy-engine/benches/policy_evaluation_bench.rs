use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use policy_engine::{evaluate_v1, evaluate_v2, PlatformPolicy, PolicyEngine, SemanticVersion};
use serde_json::json;
use std::hint::black_box;
use std::thread;

fn v(s: &str) -> SemanticVersion {
    SemanticVersion::parse(s).unwrap()
}

/// Pure evaluation against policies with growing exception lists
fn benchmark_status_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("status_evaluation");

    for size in [1u64, 10, 100, 1000] {
        let policy = PlatformPolicy::new(v("1.0.0"))
            .with_latest(v("9.0.0"))
            .with_force_update((0..size).map(|i| SemanticVersion::new(2, i, 0)))
            .with_force_off((0..size).map(|i| SemanticVersion::new(3, i, 0)));
        let client = SemanticVersion::new(3, size / 2, 0);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("v1", size), &policy, |b, policy| {
            b.iter(|| evaluate_v1(black_box(policy), black_box(&client)))
        });
        group.bench_with_input(BenchmarkId::new("v2", size), &policy, |b, policy| {
            b.iter(|| evaluate_v2(black_box(policy), black_box(&client)))
        });
    }

    group.finish();
}

/// Full engine path: snapshot, lookup, parse, evaluate
fn benchmark_engine_status(c: &mut Criterion) {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("versions_status.json");
    std::fs::write(
        &path,
        json!({
            "ios": {
                "minimal_actual_version": "0.1.0",
                "force_update": ["0.1.5"],
                "latest_version": "0.2.1",
                "force_off": ["0.1.4"]
            }
        })
        .to_string(),
    )
    .unwrap();
    let engine = PolicyEngine::open(&path).unwrap();

    c.bench_function("engine_status_v2", |b| {
        b.iter(|| engine.status_v2(black_box("iOS"), black_box("0.1.7")))
    });

    // Readers while a writer keeps swapping the table
    let writer = {
        let engine = engine.clone();
        thread::spawn(move || {
            for i in 0..200 {
                engine
                    .update_config(
                        "ios",
                        json!({
                            "minimal_actual_version": format!("0.{}.0", i % 3),
                            "force_update": [],
                            "latest_version": "0.9.0",
                            "force_off": []
                        }),
                    )
                    .unwrap();
            }
        })
    };
    c.bench_function("engine_status_v2_during_updates", |b| {
        b.iter(|| engine.status_v2(black_box("ios"), black_box("0.1.7")))
    });
    writer.join().unwrap();
}

criterion_group!(benches, benchmark_status_evaluation, benchmark_engine_status);
criterion_main!(benches);
