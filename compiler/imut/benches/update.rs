//! Update benchmarks.
//!
//! Measures a full update on deep and wide states, and the cost of a cache
//! hit on its own.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use imut::{update, PathCache, Update, UpdateOptions, Value};

/// Record nested `depth` levels deep along `child`, with a sibling at every
/// level that the update should leave shared.
fn nested_state(depth: usize) -> Value {
    let mut node = Value::record_from([("leaf", Value::from(0))]);
    for level in (0..depth).rev() {
        node = Value::record_from([
            ("child", node),
            ("sibling", Value::record_from([("level", Value::from(level.to_string()))])),
        ]);
    }
    node
}

fn nested_procedure(depth: usize) -> String {
    format!("s => {{ s{}.leaf = 1 }}", ".child".repeat(depth))
}

/// Record with `width` fields, one of them updated.
fn flat_state(width: usize) -> Value {
    Value::record_from((0..width).map(|i| (format!("f{i}"), Value::from(format!("value {i}")))))
}

fn bench_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("update/nested");
    let options = UpdateOptions::new().freeze_result(false);
    for depth in [10, 20, 40] {
        let state = nested_state(depth);
        let source = nested_procedure(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| update(black_box(&state), &source, None, Some(&options)));
        });
    }
    group.finish();
}

fn bench_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("update/flat");
    let options = UpdateOptions::new().freeze_result(false);
    for width in [10, 100, 1000] {
        let state = flat_state(width);
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            b.iter(|| update(black_box(&state), "s => { s.f0 = 'changed' }", None, Some(&options)));
        });
    }
    group.finish();
}

fn bench_frozen(c: &mut Criterion) {
    let state = nested_state(20);
    let source = nested_procedure(20);
    c.bench_function("update/nested_frozen_20", |b| {
        b.iter(|| {
            Update::new(&source)
                .options(UpdateOptions::new().freeze_result(true))
                .apply(black_box(&state))
        });
    });
}

fn bench_cache_hit(c: &mut Criterion) {
    let cache = PathCache::new();
    let source = nested_procedure(20);
    let _ = cache.compile(&source);
    c.bench_function("compile/cache_hit", |b| {
        b.iter(|| cache.compile(black_box(&source)));
    });
    c.bench_function("compile/uncached", |b| {
        b.iter(|| imut::Compiled::new(black_box(&source)));
    });
}

criterion_group!(benches, bench_nested, bench_flat, bench_frozen, bench_cache_hit);
criterion_main!(benches);
