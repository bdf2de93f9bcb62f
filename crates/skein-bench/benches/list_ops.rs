//! Criterion micro-benchmarks for the sentinel list.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use skein_test_utils::fixtures::list_from;

/// Benchmark: build a 10K-element list.
fn bench_list_push_10k(c: &mut Criterion) {
    c.bench_function("list_push_10k", |b| {
        b.iter(|| black_box(list_from(0..10_000u64).0.len()));
    });
}

/// Benchmark: walk 10K elements, escaping every third one.
fn bench_list_traverse_escape(c: &mut Criterion) {
    c.bench_function("list_traverse_escape_10k", |b| {
        b.iter_batched(
            || list_from(0..10_000u64),
            |(list, _elements)| {
                list.for_each(|e| {
                    if *e.value() % 3 == 0 {
                        e.escape();
                    }
                });
                black_box(list.len())
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

/// Benchmark: rotate the front element to the back 10K times.
fn bench_list_rotate(c: &mut Criterion) {
    let (list, _elements) = list_from(0..1_000u64);
    c.bench_function("list_rotate_10k", |b| {
        b.iter(|| {
            for _ in 0..10_000 {
                if let Some(front) = list.front() {
                    list.move_to_back(&front);
                }
            }
            black_box(list.version())
        });
    });
}

criterion_group!(
    benches,
    bench_list_push_10k,
    bench_list_traverse_escape,
    bench_list_rotate
);
criterion_main!(benches);
