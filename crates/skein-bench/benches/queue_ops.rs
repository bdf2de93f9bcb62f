//! Criterion benchmarks for queue throughput and stream fan-out.

use std::hint::black_box;
use std::thread;

use criterion::{criterion_group, criterion_main, Criterion};
use skein_bench::pump_queue;
use skein_sync::{CancelToken, EventStream, UnboundedQueue};

/// Benchmark: 1K items through one queue, same-thread producer and consumer.
fn bench_queue_pump_1k(c: &mut Criterion) {
    let queue = UnboundedQueue::new();
    c.bench_function("queue_pump_1k", |b| {
        b.iter(|| black_box(pump_queue(&queue, 1_000)));
    });
}

/// Benchmark: 1K items with the consumer on its own thread.
fn bench_queue_cross_thread_1k(c: &mut Criterion) {
    c.bench_function("queue_cross_thread_1k", |b| {
        b.iter(|| {
            let queue = UnboundedQueue::new();
            let rx = queue.receiver();
            let consumer = thread::spawn(move || rx.into_iter().sum::<u64>());
            for i in 0..1_000u64 {
                let _ = queue.send(i);
            }
            queue.close();
            black_box(consumer.join().ok())
        });
    });
}

/// Benchmark: publish 100 values to 8 subscribers and drain them.
fn bench_stream_fanout(c: &mut Criterion) {
    let stream = EventStream::new();
    let scope = CancelToken::new();
    let receivers: Vec<_> = (0..8).map(|_| stream.subscribe(&scope, [])).collect();
    c.bench_function("stream_fanout_8x100", |b| {
        b.iter(|| {
            for v in 0..100u64 {
                stream.publish(v);
            }
            let total: u64 = receivers
                .iter()
                .map(|rx| (0..100).filter_map(|_| rx.recv()).sum::<u64>())
                .sum();
            black_box(total)
        });
    });
    scope.cancel();
}

criterion_group!(
    benches,
    bench_queue_pump_1k,
    bench_queue_cross_thread_1k,
    bench_stream_fanout
);
criterion_main!(benches);
