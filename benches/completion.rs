// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Benchmarks for the completion system.
//!
//! - Directory completion against directories of different sizes
//! - Command name completion
//! - Common prefix calculation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tempfile::TempDir;

use pine::completion::{find_common_prefix, CompletionEngine};

/// Directory with `count` subdirectories named `dir-0000`, `dir-0001`, ...
fn populated_dir(count: usize) -> TempDir {
    let temp = TempDir::new().unwrap();
    for i in 0..count {
        std::fs::create_dir(temp.path().join(format!("dir-{:04}", i))).unwrap();
    }
    temp
}

fn bench_directory_completion(c: &mut Criterion) {
    let mut group = c.benchmark_group("completion/directory");

    for size in [10, 100, 1000] {
        let temp = populated_dir(size);
        let base = temp.path().to_string_lossy().into_owned();

        group.bench_with_input(BenchmarkId::new("first_press", size), &base, |b, base| {
            let mut engine = CompletionEngine::default();
            b.iter(|| {
                engine.reset();
                black_box(engine.complete("/cd dir-", base))
            });
        });

        group.bench_with_input(BenchmarkId::new("single_match", size), &base, |b, base| {
            let mut engine = CompletionEngine::default();
            b.iter(|| {
                engine.reset();
                black_box(engine.complete("/cd dir-0007", base))
            });
        });
    }

    group.finish();
}

fn bench_command_completion(c: &mut Criterion) {
    let mut group = c.benchmark_group("completion/command");

    group.bench_function("slash", |b| {
        let mut engine = CompletionEngine::default();
        b.iter(|| {
            engine.reset();
            black_box(engine.complete("/", "/"))
        });
    });

    group.bench_function("unique", |b| {
        let mut engine = CompletionEngine::default();
        b.iter(|| {
            engine.reset();
            black_box(engine.complete("/he", "/"))
        });
    });

    group.finish();
}

fn bench_common_prefix(c: &mut Criterion) {
    let mut group = c.benchmark_group("completion/common_prefix");

    for size in [2, 100, 10_000] {
        let candidates: Vec<String> = (0..size).map(|i| format!("project-alpha-{}", i)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &candidates, |b, candidates| {
            b.iter(|| black_box(find_common_prefix(candidates)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_directory_completion,
    bench_command_completion,
    bench_common_prefix
);
criterion_main!(benches);
