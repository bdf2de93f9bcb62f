//! Criterion micro-benchmarks for slot arena allocation, churn and traversal.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use skein_arena::SlotArena;
use skein_bench::{churn_arena, sweep_workload};
use skein_test_utils::fixtures::arena_from;

/// Benchmark: push 10K values into a fresh arena, growing as needed.
fn bench_arena_push_10k(c: &mut Criterion) {
    c.bench_function("arena_push_10k", |b| {
        b.iter(|| {
            let mut arena = SlotArena::new();
            for v in 0..10_000u64 {
                arena.push_back(v);
            }
            black_box(arena.len());
        });
    });
}

/// Benchmark: 10K release/push rounds over 1K live values.
fn bench_arena_churn(c: &mut Criterion) {
    c.bench_function("arena_churn_1k_x10k", |b| {
        b.iter(|| black_box(churn_arena(1_000, 10_000).capacity()));
    });
}

/// Benchmark: traverse 10K values, releasing half of them mid-walk.
fn bench_arena_traverse_release(c: &mut Criterion) {
    c.bench_function("arena_traverse_release_10k", |b| {
        b.iter_batched(
            || arena_from(0..10_000u64).0,
            |mut arena| black_box(sweep_workload(&mut arena)),
            criterion::BatchSize::LargeInput,
        );
    });
}

/// Benchmark: read-only iteration over 10K values.
fn bench_arena_iter(c: &mut Criterion) {
    let (arena, _) = arena_from(0..10_000u64);
    c.bench_function("arena_iter_10k", |b| {
        b.iter(|| black_box(arena.iter().map(|(_, v)| *v).sum::<u64>()));
    });
}

criterion_group!(
    benches,
    bench_arena_push_10k,
    bench_arena_churn,
    bench_arena_traverse_release,
    bench_arena_iter
);
criterion_main!(benches);
