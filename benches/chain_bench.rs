//! Benchmark for Chain vs a flattened Vec.
//!
//! Compares traversal and offset resolution over a chain of branches
//! against the same elements copied into one contiguous vector.

use chainweave::prelude::*;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn build_branches(size: usize, branch_count: usize) -> Vec<Vec<usize>> {
    (0..branch_count)
        .map(|branch| {
            if branch % 4 == 3 {
                Vec::new()
            } else {
                (0..size / branch_count).map(|index| branch * size + index).collect()
            }
        })
        .collect()
}

// =============================================================================
// Traversal Benchmark
// =============================================================================

fn benchmark_traversal(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("traversal");

    for size in [1000, 10000, 100_000] {
        let branches = build_branches(size, 16);
        let chain = Chain::new(branches.clone());
        let flattened: Vec<usize> = branches.into_iter().flatten().collect();

        group.bench_with_input(BenchmarkId::new("Chain", size), &size, |bencher, _| {
            bencher.iter(|| black_box(chain.iter().sum::<usize>()));
        });

        group.bench_with_input(BenchmarkId::new("Vec", size), &size, |bencher, _| {
            bencher.iter(|| black_box(flattened.iter().sum::<usize>()));
        });
    }

    group.finish();
}

// =============================================================================
// Linear Offset Benchmark
// =============================================================================

fn benchmark_position_for_linear(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("position_for_linear");

    // Below and above the branch count where lookup switches to binary search
    for branch_count in [4, 64, 1024] {
        let chain = Chain::new(build_branches(branch_count * 8, branch_count));
        let count = chain.len();

        group.bench_with_input(
            BenchmarkId::new("Chain", branch_count),
            &branch_count,
            |bencher, _| {
                bencher.iter(|| {
                    for offset in (0..count).step_by(7) {
                        black_box(chain.position_for_linear(black_box(offset)));
                    }
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// Copy-on-Write Benchmark
// =============================================================================

fn benchmark_with_branch(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("with_branch");

    for branch_count in [4, 64] {
        let chain = Chain::new(build_branches(branch_count * 8, branch_count));

        group.bench_with_input(
            BenchmarkId::new("with_branch", branch_count),
            &branch_count,
            |bencher, _| {
                bencher.iter(|| black_box(chain.with_branch(0, vec![black_box(1)])));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("set_branch_unique", branch_count),
            &branch_count,
            |bencher, _| {
                let mut unique = chain.with_branch(0, Vec::new());
                bencher.iter(|| {
                    unique.set_branch(0, vec![black_box(1)]);
                    black_box(unique.len())
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// Criterion Group and Main
// =============================================================================

criterion_group!(
    benches,
    benchmark_traversal,
    benchmark_position_for_linear,
    benchmark_with_branch
);

criterion_main!(benches);
