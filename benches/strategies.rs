use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use sequenza::harness;
use sequenza::services::atomic::Atomic;
use sequenza::services::locked::Locked;
use sequenza::services::owned::Owned;
use sequenza::services::unsync::Unsync;

const NUM_WORKERS: usize = 8;
const CALLS_PER_WORKER: usize = 10_000;

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence_harness");
    // Each iteration is a full harness run; keep the sample count low.
    group.sample_size(10);

    let scale = format!("{}threads x {}iter", NUM_WORKERS, CALLS_PER_WORKER);

    group.bench_function(BenchmarkId::new("unsync (no sync, baseline)", &scale), |b| {
        b.iter(|| {
            let service = Unsync::new().with_name("unsync");
            let report = harness::run(&service, NUM_WORKERS, CALLS_PER_WORKER).unwrap();
            // Loses increments under contention; throughput is the point here.
            black_box(report.max_observed)
        })
    });

    group.bench_function(BenchmarkId::new("atomic (fetch_add)", &scale), |b| {
        b.iter(|| {
            let service = Atomic::new().with_name("atomic");
            let report = harness::run(&service, NUM_WORKERS, CALLS_PER_WORKER).unwrap();
            black_box(report.max_observed)
        })
    });

    group.bench_function(BenchmarkId::new("locked (mutex)", &scale), |b| {
        b.iter(|| {
            let service = Locked::new().with_name("locked");
            let report = harness::run(&service, NUM_WORKERS, CALLS_PER_WORKER).unwrap();
            black_box(report.max_observed)
        })
    });

    group.bench_function(BenchmarkId::new("owned (owner thread)", &scale), |b| {
        b.iter(|| {
            let service = Owned::start().with_name("owned");
            let report = harness::run(&service, NUM_WORKERS, CALLS_PER_WORKER).unwrap();
            service.stop();
            black_box(report.max_observed)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
