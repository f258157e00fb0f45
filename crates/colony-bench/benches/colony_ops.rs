//! Criterion micro-benchmarks for the ordered colony.

use std::hint::black_box;

use colony::PointerColony;
use colony_bench::{churned, filled, marked};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

/// Benchmark: append 10K elements into a fresh colony.
fn bench_push_back_10k(c: &mut Criterion) {
    c.bench_function("colony_push_back_10k", |b| {
        b.iter(|| {
            let mut colony = PointerColony::new();
            for v in 0..10_000u64 {
                colony.push_back(v);
            }
            black_box(colony.len());
        });
    });
}

/// Benchmark: erase every other element from the front, then refill.
fn bench_erase_refill_10k(c: &mut Criterion) {
    c.bench_function("colony_erase_refill_10k", |b| {
        b.iter_batched(
            || filled(10_000),
            |mut colony| {
                let mut position = 0;
                while position < colony.len() {
                    position = colony.erase(position) + 1;
                }
                for v in 0..5_000u64 {
                    colony.push_back(v);
                }
                black_box(colony.len());
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: iterate 10K elements in order.
fn bench_iterate_10k(c: &mut Criterion) {
    let colony = filled(10_000);
    c.bench_function("colony_iterate_10k", |b| {
        b.iter(|| {
            let sum: u64 = colony.iter().sum();
            black_box(sum);
        });
    });
}

/// Benchmark: clone an append-only colony (single-pass reconstruction).
fn bench_clone_ordered_10k(c: &mut Criterion) {
    let colony = filled(10_000);
    c.bench_function("colony_clone_ordered_10k", |b| {
        b.iter(|| black_box(colony.clone()));
    });
}

/// Benchmark: clone a churned colony (offset-table reconstruction).
fn bench_clone_churned(c: &mut Criterion) {
    let colony = churned(20_000, 42);
    c.bench_function("colony_clone_churned", |b| {
        b.iter(|| black_box(colony.clone()));
    });
}

/// Benchmark: compact 10% marked elements out of 10K.
fn bench_remove_if_10k(c: &mut Criterion) {
    c.bench_function("colony_remove_if_10k", |b| {
        b.iter_batched(
            || marked(10_000, 10),
            |mut colony| black_box(colony.remove_if()),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_push_back_10k,
    bench_erase_refill_10k,
    bench_iterate_10k,
    bench_clone_ordered_10k,
    bench_clone_churned,
    bench_remove_if_10k
);
criterion_main!(benches);
