//! Benchmarks for the top-K metric vector.
//!
//! Covers the three hot paths: observing through a pre-resolved bucket,
//! resolving a bucket from label values, and collecting a snapshot at
//! varying capacities.
//!
//! Run with: `cargo bench --bench topk_bench -p prometheus-topk`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use prometheus::core::Collector;
use prometheus_topk::{TopKOpts, TopKVec};

fn bench_observe(c: &mut Criterion) {
    let mut group = c.benchmark_group("topk_observe");
    group.throughput(Throughput::Elements(1));

    for buckets in [10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(buckets), &buckets, |b, &buckets| {
            let vec = TopKVec::new(
                TopKOpts::new("bench_observe", "Observe throughput.").buckets(buckets),
                &["key"],
            )
            .unwrap();
            let bucket = vec.with_label_values(&["hot"]);
            b.iter(|| bucket.observe(black_box(1.0)));
        });
    }

    group.finish();
}

fn bench_observe_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("topk_observe_churn");
    group.throughput(Throughput::Elements(1));

    // Every observation targets a different key, so most inserts go through
    // the filter/eviction path instead of the tracked fast path.
    group.bench_function("distinct_keys", |b| {
        let vec = TopKVec::new(
            TopKOpts::new("bench_churn", "Eviction-heavy observe path.").buckets(16),
            &["key"],
        )
        .unwrap();
        let keys: Vec<String> = (0..1024).map(|i| format!("key-{i}")).collect();
        let mut cursor = 0usize;
        b.iter(|| {
            vec.with_label_values(&[keys[cursor % keys.len()].as_str()]).inc();
            cursor = cursor.wrapping_add(1);
        });
    });

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("topk_resolve");
    group.throughput(Throughput::Elements(1));

    group.bench_function("with_label_values", |b| {
        let vec = TopKVec::new(
            TopKOpts::new("bench_resolve", "Bucket resolution.").buckets(10),
            &["region", "method", "path"],
        )
        .unwrap();
        b.iter(|| black_box(vec.with_label_values(&["us", "get", "/index"])));
    });

    group.bench_function("with_label_values_curried", |b| {
        let vec = TopKVec::new(
            TopKOpts::new("bench_resolve_curried", "Bucket resolution via a curried view.")
                .buckets(10),
            &["region", "method", "path"],
        )
        .unwrap();
        let labels = [("region", "us")].into_iter().collect();
        let curried = vec.curry_with(&labels).unwrap();
        b.iter(|| black_box(curried.with_label_values(&["get", "/index"])));
    });

    group.finish();
}

fn bench_collect(c: &mut Criterion) {
    let mut group = c.benchmark_group("topk_collect");

    for buckets in [10, 100] {
        group.throughput(Throughput::Elements(buckets as u64));
        group.bench_with_input(BenchmarkId::from_parameter(buckets), &buckets, |b, &buckets| {
            let vec = TopKVec::new(
                TopKOpts::new("bench_collect", "Snapshot collection.").buckets(buckets),
                &["key"],
            )
            .unwrap();
            for i in 0..buckets {
                vec.with_label_values(&[format!("key-{i}").as_str()]).observe(i as f64 + 1.0);
            }
            b.iter(|| black_box(vec.collect()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_observe, bench_observe_churn, bench_resolve, bench_collect);
criterion_main!(benches);
